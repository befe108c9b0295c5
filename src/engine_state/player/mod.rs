//! # Player
//!
//! The player is a vertical capsule approximated by a handful of point samples
//! against the voxel grid. Its position is the eye point; the feet are
//! `player_height` below it.
//!
//! ## Core Components
//! - `PlayerState`: position, velocity, view angles and the contact flags of the last tick
//! - `PlayerController`: walking, swimming, gravity and collision
//! - `InteractionResolver`: breaking and placing blocks along the view ray

use cgmath::{Point3, Vector3};
use log::info;

use crate::engine_state::voxels::{block::block_type::BlockType, grid::VoxelGrid};

pub mod controller;
pub mod interaction;

/// Pitch stays this far away from straight up and straight down.
pub const PITCH_MARGIN: f32 = 0.1;

/// Pitch the player spawns with, looking slightly down.
pub const SPAWN_PITCH: f32 = -0.2;

/// Dynamic state of the player.
///
/// `on_ground` and `in_water` are recomputed on every physics tick. They describe
/// the last tick and are never used as inputs of the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Eye position in world space.
    pub position: Point3<f32>,
    /// Velocity; only `y` carries momentum between ticks.
    pub velocity: Vector3<f32>,
    /// Horizontal view angle in radians. Zero looks down +z.
    pub yaw: f32,
    /// Vertical view angle in radians, positive looks up.
    pub pitch: f32,
    /// Standing on a solid block after the last tick.
    pub on_ground: bool,
    /// Feet or eyes were in water during the last tick.
    pub in_water: bool,
}

impl PlayerState {
    /// A resting player at `position` with the spawn view angles.
    pub fn at(position: Point3<f32>) -> Self {
        PlayerState {
            position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            pitch: SPAWN_PITCH,
            on_ground: false,
            in_water: false,
        }
    }

    /// Places a player above the center column of `grid`.
    ///
    /// The column is scanned downwards for the first block that is neither air
    /// nor water; the player spawns two blocks above it, or at the build limit
    /// when the column is empty.
    pub fn spawn(grid: &VoxelGrid) -> Self {
        let x = grid.width() as f32 / 2.0;
        let z = grid.depth() as f32 / 2.0;
        let (cx, cz) = (x.floor() as i32, z.floor() as i32);
        let y = (0..grid.height() as i32)
            .rev()
            .find(|&y| !matches!(grid.get(cx, y, cz), BlockType::Air | BlockType::Water))
            .map(|y| (y + 2) as f32)
            .unwrap_or(grid.height() as f32);

        info!("Spawning player at ({}, {}, {})", x, y, z);
        PlayerState::at(Point3::new(x, y, z))
    }

    /// Applies one frame of look input.
    ///
    /// Yaw is unbounded; pitch is clamped to `±(π/2 - PITCH_MARGIN)`.
    pub fn apply_look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - PITCH_MARGIN;
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-limit, limit);
    }

    /// Unit vector the player is looking along.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        Vector3::new(yaw_sin * pitch_cos, pitch_sin, yaw_cos * pitch_cos)
    }

    /// The cell containing the eye point.
    pub fn eye_cell(&self) -> Point3<i32> {
        Point3::new(
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
            self.position.z.floor() as i32,
        )
    }
}
