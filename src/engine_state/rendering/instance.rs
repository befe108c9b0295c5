//! Per-instance data handed to the renderer.
//!
//! Every visible voxel is drawn as one instance of a shared unit cube. The only
//! per-instance data is the model matrix placing that cube in the world.

use cgmath::{Matrix4, Point3, Vector3};

/// Model matrix of one cube instance.
///
/// # Memory Layout
/// - Model: 4x4 f32, column major (64 bytes)
///
/// The struct is `Pod`, so a slice of instances can be uploaded as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    /// Column-major model matrix; column 3 holds the translation.
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    /// Size of one instance in bytes.
    pub const SIZE: usize = std::mem::size_of::<InstanceTransform>();

    /// A transform translating the unit cube to a cell position.
    ///
    /// # Arguments
    /// * `cell` - Grid coordinates of the voxel
    ///
    /// # Returns
    /// A new `InstanceTransform` with no rotation or scale
    pub fn at_cell(cell: Point3<i32>) -> Self {
        let translation = Vector3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        InstanceTransform {
            model: Matrix4::from_translation(translation).into(),
        }
    }

    /// The translation part of the model matrix.
    pub fn translation(&self) -> Point3<f32> {
        let column = self.model[3];
        Point3::new(column[0], column[1], column[2])
    }

    /// The cell this instance was placed at.
    pub fn cell(&self) -> Point3<i32> {
        let t = self.translation();
        Point3::new(t.x.round() as i32, t.y.round() as i32, t.z.round() as i32)
    }
}
