//! # Environment
//!
//! Everything above the terrain that changes over time without player input:
//!
//! - `day_cycle`: the sun's orbit, light intensity and sky color
//! - `clouds`: a sparse layer of cloud puffs drifting along the x axis
//!
//! Neither reads nor writes the voxel grid.

pub mod clouds;
pub mod day_cycle;

pub use clouds::{CloudLayer, CloudPuff, CloudSettings};
pub use day_cycle::{DayCycle, DayCycleSettings, SunState};
