//! # Voxel World Core
//!
//! This module contains the voxel data of the world and everything that produces it.
//!
//! ## Architecture
//!
//! * **Block**: block types, their storage codes, faces and render materials
//! * **Grid**: one dense, bounds-safe array holding the whole world
//! * **Generation**: seeded terrain, caves and trees written into the grid
//!
//! ## Data Flow
//!
//! 1. Terrain generation fills every column of a fresh grid (in parallel)
//! 2. Vegetation stamps trees onto grass surfaces
//! 3. Meshing reads the finished grid; gameplay edits go through the same accessors
//!
//! ## Bounds
//!
//! The grid never panics on a coordinate. Reads outside return `Air` and writes
//! outside are dropped, which every neighbour probe in the engine relies on.

pub mod block;
pub mod generation;
pub mod grid;
