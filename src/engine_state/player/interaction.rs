//! # Block Interaction
//!
//! Breaking and placing blocks along the player's line of sight.
//!
//! Both actions share one ray march: starting at the eye point, the ray advances in
//! fixed steps and samples the cell under each step until it meets a block that is
//! neither air nor water, or runs out of reach.
//!
//! - **Break** needs the input held for `break_time` seconds. Releasing it resets
//!   the timer. Bedrock never breaks.
//! - **Place** fires once per press and fills the last empty cell the ray crossed
//!   before the hit, unless that cell overlaps the player's body.

use cgmath::{Point3, Vector3};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::PlayerState;
use crate::engine_state::voxels::{block::block_type::BlockType, grid::VoxelGrid};

/// Interaction tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Seconds the break input must be held.
    pub break_time: f32,
    /// Distance between two ray samples.
    pub ray_step: f32,
    /// Samples are taken while the distance is below this.
    pub reach: f32,
    /// Block placed when the hotbar has no valid selection.
    pub default_block: BlockType,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        InteractionSettings {
            break_time: 0.3,
            ray_step: 0.1,
            reach: 6.0,
            default_block: BlockType::Grass,
        }
    }
}

/// Where a ray march stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RayHit {
    /// The first targetable cell along the ray.
    pub cell: Point3<i32>,
    /// The cell sampled just before `cell`, if the hit was not the first sample.
    pub previous: Option<Point3<i32>>,
}

impl RayHit {
    /// The cell a new block would go into: the previous sample, or the hit
    /// itself when the ray started inside it.
    pub fn adjacent(&self) -> Point3<i32> {
        self.previous.unwrap_or(self.cell)
    }
}

/// Marches a ray through `grid`.
///
/// # Arguments
/// * `origin` - Start of the ray
/// * `direction` - Ray direction; expected to be unit length
/// * `step` - Distance between samples
/// * `reach` - Samples are taken at `0, step, 2 * step, ...` while below `reach`
///
/// # Returns
/// The first cell holding a block that is neither air nor water
pub fn raycast(
    grid: &VoxelGrid,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    step: f32,
    reach: f32,
) -> Option<RayHit> {
    if step <= 0.0 {
        return None;
    }
    let mut previous = None;
    let mut i = 0u32;
    loop {
        let d = i as f32 * step;
        if d >= reach {
            return None;
        }
        let p = origin + direction * d;
        let cell = Point3::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32);
        if grid.get_at(cell).is_targetable() {
            return Some(RayHit { cell, previous });
        }
        previous = Some(cell);
        i += 1;
    }
}

/// Notified after a block edit succeeds. Return values are never awaited.
pub trait InteractionFeedback {
    /// A block was removed from `cell`.
    fn block_broken(&mut self, _cell: Point3<i32>, _block: BlockType) {}
    /// `block` was placed into `cell`.
    fn block_placed(&mut self, _cell: Point3<i32>, _block: BlockType) {}
}

/// Feedback sink that ignores every event.
pub struct NoFeedback;

impl InteractionFeedback for NoFeedback {}

/// Interaction input of one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InteractionInput {
    /// The break input is held down.
    pub break_held: bool,
    /// The place input was pressed this frame (single shot).
    pub place_pressed: bool,
    /// Block type currently selected in the hotbar.
    pub selected: BlockType,
}

impl Default for InteractionInput {
    fn default() -> Self {
        InteractionInput {
            break_held: false,
            place_pressed: false,
            selected: BlockType::Grass,
        }
    }
}

/// Edits made by one interaction update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    /// Cell and former block of a broken block.
    pub broken: Option<(Point3<i32>, BlockType)>,
    /// Cell and type of a placed block.
    pub placed: Option<(Point3<i32>, BlockType)>,
}

impl InteractionOutcome {
    /// Whether the grid changed and the mesh must be rebuilt.
    pub fn needs_rebuild(&self) -> bool {
        self.broken.is_some() || self.placed.is_some()
    }
}

/// Applies break and place actions to the grid.
#[derive(Clone, Debug, Default)]
pub struct InteractionResolver {
    settings: InteractionSettings,
    break_timer: f32,
}

impl InteractionResolver {
    /// Creates a resolver with an idle break timer.
    pub fn new(settings: InteractionSettings) -> Self {
        InteractionResolver {
            settings,
            break_timer: 0.0,
        }
    }

    /// The settings this resolver uses.
    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Seconds the break input has been held towards the next break.
    pub fn break_timer(&self) -> f32 {
        self.break_timer
    }

    /// Marches the player's view ray.
    pub fn target(&self, grid: &VoxelGrid, player: &PlayerState) -> Option<RayHit> {
        raycast(
            grid,
            player.position,
            player.forward(),
            self.settings.ray_step,
            self.settings.reach,
        )
    }

    /// Runs one frame of interaction.
    ///
    /// # Arguments
    /// * `grid` - The world to edit
    /// * `player` - The player after this frame's movement
    /// * `input` - Break and place inputs
    /// * `dt` - Frame time in seconds
    /// * `feedback` - Notified of every successful edit
    ///
    /// # Returns
    /// The edits made; the caller rebuilds the mesh when any happened
    pub fn update(
        &mut self,
        grid: &mut VoxelGrid,
        player: &PlayerState,
        input: InteractionInput,
        dt: f32,
        feedback: &mut dyn InteractionFeedback,
    ) -> InteractionOutcome {
        let mut outcome = InteractionOutcome::default();

        if input.break_held {
            self.break_timer += dt;
            if self.break_timer >= self.settings.break_time {
                self.break_timer = 0.0;
                outcome.broken = self.break_block(grid, player);
            }
        } else {
            self.break_timer = 0.0;
        }
        if let Some((cell, block)) = outcome.broken {
            feedback.block_broken(cell, block);
        }

        if input.place_pressed {
            outcome.placed = self.place_block(grid, player, input.selected);
        }
        if let Some((cell, block)) = outcome.placed {
            feedback.block_placed(cell, block);
        }

        outcome
    }

    fn break_block(
        &self,
        grid: &mut VoxelGrid,
        player: &PlayerState,
    ) -> Option<(Point3<i32>, BlockType)> {
        let hit = self.target(grid, player)?;
        let block = grid.get_at(hit.cell);
        if !block.is_breakable() {
            debug!("Refusing to break {:?} at {:?}", block, hit.cell);
            return None;
        }
        grid.set_at(hit.cell, BlockType::Air);
        info!("Broke {:?} at {:?}", block, hit.cell);
        Some((hit.cell, block))
    }

    fn place_block(
        &self,
        grid: &mut VoxelGrid,
        player: &PlayerState,
        selected: BlockType,
    ) -> Option<(Point3<i32>, BlockType)> {
        let block = if selected == BlockType::Air {
            self.settings.default_block
        } else {
            selected
        };
        let target = self.target(grid, player)?.adjacent();

        if !grid.contains(target.x, target.y, target.z) {
            debug!("Placement target {:?} is outside the world", target);
            return None;
        }
        let eye = player.eye_cell();
        let overlaps_player = target.x == eye.x
            && target.z == eye.z
            && (target.y == eye.y || target.y == eye.y - 1);
        if overlaps_player {
            debug!("Placement at {:?} blocked by the player", target);
            return None;
        }

        grid.set_at(target, block);
        info!("Placed {:?} at {:?}", block, target);
        Some((target, block))
    }
}
