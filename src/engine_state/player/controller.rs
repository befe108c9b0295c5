//! # Player Controller
//!
//! Moves the player through the grid once per frame:
//!
//! 1. Movement input is rotated by yaw into world space
//! 2. X and Z are resolved independently, so the player slides along walls
//! 3. Gravity, or buoyancy and drag in water, integrates vertical velocity
//! 4. Vertical collision snaps the feet onto the block below or stops at a ceiling
//! 5. Jumping, clamping to the world and the fall-through respawn come last

use cgmath::Point3;
use log::warn;
use serde::{Deserialize, Serialize};

use super::PlayerState;
use crate::engine_state::voxels::{block::block_type::BlockType, grid::VoxelGrid};

/// Physics tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Vertical acceleration in blocks/s², negative is down.
    pub gravity: f32,
    /// Upward velocity of a jump from the ground.
    pub jump_velocity: f32,
    /// Upward velocity while swimming with jump held.
    pub swim_velocity: f32,
    /// Horizontal speed at full input, in blocks/s.
    pub move_speed: f32,
    /// Distance from the eyes down to the feet.
    pub player_height: f32,
    /// Half width of the player on each horizontal axis.
    pub player_width: f32,
    /// Share of gravity applied in water.
    pub water_gravity_scale: f32,
    /// Vertical velocity kept per tick in water.
    pub water_drag: f32,
    /// Space kept between the eyes and a ceiling.
    pub head_clearance: f32,
    /// Longest frame step simulated at once, in seconds.
    pub max_dt: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        PhysicsSettings {
            gravity: -18.0,
            jump_velocity: 7.0,
            swim_velocity: 3.0,
            move_speed: 5.5,
            player_height: 1.7,
            player_width: 0.3,
            water_gravity_scale: 0.3,
            water_drag: 0.9,
            head_clearance: 0.1,
            max_dt: 0.05,
        }
    }
}

/// Movement input of one frame, already merged from every input device.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MovementInput {
    /// Strafe, -1 is left and +1 is right.
    pub move_x: f32,
    /// Walk, +1 is forward.
    pub move_z: f32,
    /// Jump (or swim up) requested this frame.
    pub jump: bool,
}

/// Integrates player movement against a voxel grid.
#[derive(Clone, Debug, Default)]
pub struct PlayerController {
    settings: PhysicsSettings,
}

impl PlayerController {
    /// Creates a new controller.
    pub fn new(settings: PhysicsSettings) -> Self {
        PlayerController { settings }
    }

    /// The settings this controller simulates with.
    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    fn is_solid(grid: &VoxelGrid, x: f32, y: f32, z: f32) -> bool {
        grid.sample(x, y, z).is_solid()
    }

    fn is_water(grid: &VoxelGrid, x: f32, y: f32, z: f32) -> bool {
        grid.sample(x, y, z) == BlockType::Water
    }

    /// Whether all four corners of the footprint centered on `(x, z)` are free at `y`.
    fn corners_clear(&self, grid: &VoxelGrid, x: f32, y: f32, z: f32) -> bool {
        let w = self.settings.player_width;
        [(w, w), (w, -w), (-w, w), (-w, -w)]
            .into_iter()
            .all(|(dx, dz)| !Self::is_solid(grid, x + dx, y, z + dz))
    }

    /// Whether a player with its eyes at `(x, y, z)` fits there: the footprint is
    /// free at eye height and one block below.
    fn footprint_clear(&self, grid: &VoxelGrid, x: f32, y: f32, z: f32) -> bool {
        self.corners_clear(grid, x, y, z) && self.corners_clear(grid, x, y - 1.0, z)
    }

    /// Advances the player by one frame.
    ///
    /// # Arguments
    /// * `player` - The player to move; its yaw and pitch must already include
    ///   this frame's look input
    /// * `grid` - The world to collide with
    /// * `input` - This frame's movement input, each axis in `[-1, 1]`
    /// * `dt` - Frame time in seconds; longer steps are clamped to `max_dt`
    pub fn update(&self, player: &mut PlayerState, grid: &VoxelGrid, input: MovementInput, dt: f32) {
        let s = &self.settings;
        let dt = dt.min(s.max_dt).max(0.0);
        let Point3 { x, y, z } = player.position;

        let move_x = input.move_x.clamp(-1.0, 1.0);
        let move_z = input.move_z.clamp(-1.0, 1.0);
        let (yaw_sin, yaw_cos) = player.yaw.sin_cos();
        let dir_x = move_x * yaw_cos - move_z * yaw_sin;
        let dir_z = move_x * yaw_sin + move_z * yaw_cos;

        let new_x = x + dir_x * s.move_speed * dt;
        let new_z = z + dir_z * s.move_speed * dt;
        if self.footprint_clear(grid, new_x, y, z) {
            player.position.x = new_x;
        }
        let x = player.position.x;
        if self.footprint_clear(grid, x, y, new_z) {
            player.position.z = new_z;
        }
        let z = player.position.z;

        let in_water = Self::is_water(grid, x, y - 1.0, z) || Self::is_water(grid, x, y, z);
        let velocity = &mut player.velocity;
        if in_water {
            velocity.y += s.gravity * s.water_gravity_scale * dt;
            velocity.y *= s.water_drag;
            if input.jump {
                velocity.y = s.swim_velocity;
            }
        } else {
            velocity.y += s.gravity * dt;
        }

        let new_y = y + velocity.y * dt;
        let mut on_ground = false;
        if velocity.y < 0.0 {
            if !self.corners_clear(grid, x, new_y - s.player_height, z) {
                player.position.y = (new_y - s.player_height).floor() + 1.0 + s.player_height;
                velocity.y = 0.0;
                on_ground = true;
            } else {
                player.position.y = new_y;
            }
        } else if !self.corners_clear(grid, x, new_y, z)
            || !self.corners_clear(grid, x, new_y + s.head_clearance, z)
        {
            velocity.y = 0.0;
        } else {
            player.position.y = new_y;
        }

        if input.jump && on_ground && !in_water {
            velocity.y = s.jump_velocity;
            on_ground = false;
        }

        let max_x = (grid.width() as f32 - 2.0).max(1.0);
        let max_z = (grid.depth() as f32 - 2.0).max(1.0);
        player.position.x = player.position.x.clamp(1.0, max_x);
        player.position.z = player.position.z.clamp(1.0, max_z);
        if player.position.y < 1.0 {
            warn!(
                "Player fell out of the world at ({:.2}, {:.2}), respawning at the build limit",
                player.position.x, player.position.z
            );
            player.position.y = grid.height() as f32;
            velocity.y = 0.0;
        }

        player.on_ground = on_ground;
        player.in_water = in_water;
    }
}
