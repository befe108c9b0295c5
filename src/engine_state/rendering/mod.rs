//! Render-facing data for the voxel engine.
//!
//! The engine does not talk to a graphics API. It produces everything a renderer
//! needs to draw a frame: instance batches per block material (see [`meshing`]),
//! a camera pose, the sun and sky and the cloud layer. Batches are plain `Pod`
//! buffers so they can be uploaded without conversion.

pub mod instance;
pub mod meshing;

// Re-export commonly used types
pub use instance::InstanceTransform;
pub use meshing::{MeshBatch, MeshBuilder, WorldMesh};
