//! # Engine State Module
//!
//! The simulation core of the voxel world. [`GameState`] owns every piece of mutable
//! state and advances it one frame at a time.
//!
//! ## Key Components
//!
//! * `voxels` - Block types, the voxel grid and world generation
//! * `player` - Player movement, collision and block interaction
//! * `rendering` - Instance batches handed to an external renderer
//! * `camera_state` - The first-person camera derived from the player
//! * `environment` - Day cycle and clouds
//!
//! ## Frame Order
//!
//! 1. Look input is applied to the player's yaw and pitch
//! 2. The player controller moves the player
//! 3. The interaction resolver breaks or places blocks from the post-move pose
//! 4. The mesh is rebuilt if the grid changed
//! 5. The sun and the clouds advance
//!
//! Rendering happens outside the engine and only reads from [`GameState`].

use log::info;
use web_time::Instant;

use camera_state::CameraPose;
use environment::{CloudLayer, DayCycle, SunState};
use player::{
    controller::{MovementInput, PlayerController},
    interaction::{InteractionFeedback, InteractionInput, InteractionResolver, NoFeedback},
    PlayerState,
};
use rendering::{MeshBuilder, WorldMesh};
use voxels::{
    block::block_type::BlockType,
    generation::{
        report_progress, terrain::TerrainGenerator, vegetation::VegetationGenerator,
        ProgressSink,
    },
    grid::VoxelGrid,
};

use crate::config::EngineConfig;

pub mod camera_state;
pub mod environment;
pub mod player;
pub mod rendering;
pub mod voxels;

/// Progress reported once the world is populated and the first mesh build starts.
const MESH_BUILD_PROGRESS: f32 = 0.9;

/// Input of one frame, already merged from every input device.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Strafe, -1 is left and +1 is right.
    pub move_x: f32,
    /// Walk, +1 is forward.
    pub move_z: f32,
    /// Jump, or swim up in water.
    pub jump: bool,
    /// The break input is held.
    pub break_held: bool,
    /// A place was requested this frame. Must be true for one frame per press.
    pub place_requested: bool,
    /// Change of yaw in radians.
    pub yaw_delta: f32,
    /// Change of pitch in radians.
    pub pitch_delta: f32,
    /// Block type to place. Air falls back to the configured default block.
    pub selected_block: BlockType,
}

/// What happened during one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// The player ended the frame in water.
    pub in_water: bool,
    /// The player ended the frame standing on a block.
    pub on_ground: bool,
    /// Cell of a block broken this frame.
    pub broken: Option<cgmath::Point3<i32>>,
    /// Cell of a block placed this frame.
    pub placed: Option<cgmath::Point3<i32>>,
    /// The mesh was rebuilt because the grid changed.
    pub mesh_rebuilt: bool,
}

/// The complete state of a running world.
///
/// # Examples
///
/// ```
/// use voxel_world::{EngineConfig, FrameInput, GameState, GridDimensions, NoProgress};
///
/// let mut config = EngineConfig::default();
/// config.world.seed = Some(3);
/// config.world.dimensions = GridDimensions::new(16, 24, 16);
///
/// let mut game = GameState::generate(&config, &NoProgress);
/// let report = game.tick(FrameInput::default(), 0.016);
/// assert!(!report.mesh_rebuilt);
/// ```
pub struct GameState {
    seed: u64,
    grid: VoxelGrid,
    player: PlayerState,
    controller: PlayerController,
    resolver: InteractionResolver,
    feedback: Box<dyn InteractionFeedback + Send>,
    mesh_builder: MeshBuilder,
    mesh: WorldMesh,
    day_cycle: DayCycle,
    sun: SunState,
    clouds: CloudLayer,
    tree_count: usize,
}

impl GameState {
    /// Generates a new world and everything living in it.
    ///
    /// Runs terrain, vegetation, player spawn and the first mesh build in that order.
    ///
    /// # Arguments
    /// * `config` - Engine settings; a missing seed is drawn at random
    /// * `progress` - Receives overall progress, ending with `1.0`
    pub fn generate(config: &EngineConfig, progress: &dyn ProgressSink) -> Self {
        let started = Instant::now();
        let seed = config.world.resolve_seed();
        let dimensions = config.world.dimensions;
        let water_level = config.world.water_level;
        info!(
            "Generating {}x{}x{} world with seed {}",
            dimensions.width, dimensions.height, dimensions.depth, seed
        );

        let mut grid = VoxelGrid::new(dimensions);
        TerrainGenerator::new(seed, water_level, config.terrain.clone())
            .generate(&mut grid, progress);
        let trees = VegetationGenerator::new(seed, water_level, config.vegetation.clone())
            .generate(&mut grid, progress);

        let player = PlayerState::spawn(&grid);

        report_progress(progress, MESH_BUILD_PROGRESS);
        let mut mesh_builder = MeshBuilder::new();
        let mesh = mesh_builder.build(&grid);

        let day_cycle = DayCycle::new(config.day_cycle.clone(), dimensions.width, dimensions.depth);
        let sun = day_cycle.dawn();
        let clouds = CloudLayer::generate(config.clouds.clone(), dimensions);

        report_progress(progress, 1.0);
        info!("World ready in {:?}", started.elapsed());

        GameState {
            seed,
            grid,
            player,
            controller: PlayerController::new(config.physics.clone()),
            resolver: InteractionResolver::new(config.interaction.clone()),
            feedback: Box::new(NoFeedback),
            mesh_builder,
            mesh,
            day_cycle,
            sun,
            clouds,
            tree_count: trees.len(),
        }
    }

    /// Replaces the sink notified about block edits.
    pub fn set_feedback(&mut self, feedback: Box<dyn InteractionFeedback + Send>) {
        self.feedback = feedback;
    }

    /// Advances the world by one frame.
    ///
    /// # Arguments
    /// * `input` - This frame's input
    /// * `dt` - Seconds since the last frame; clamped to the physics step limit
    ///
    /// # Returns
    /// The player's contact flags and the edits made this frame
    pub fn tick(&mut self, input: FrameInput, dt: f32) -> FrameReport {
        let dt = dt.min(self.controller.settings().max_dt).max(0.0);

        self.player.apply_look(input.yaw_delta, input.pitch_delta);
        self.controller.update(
            &mut self.player,
            &self.grid,
            MovementInput {
                move_x: input.move_x,
                move_z: input.move_z,
                jump: input.jump,
            },
            dt,
        );

        let outcome = self.resolver.update(
            &mut self.grid,
            &self.player,
            InteractionInput {
                break_held: input.break_held,
                place_pressed: input.place_requested,
                selected: input.selected_block,
            },
            dt,
            self.feedback.as_mut(),
        );
        let mesh_rebuilt = outcome.needs_rebuild();
        if mesh_rebuilt {
            self.mesh = self.mesh_builder.build(&self.grid);
        }

        self.day_cycle.update(&mut self.sun, dt);
        self.clouds.advance(dt);

        FrameReport {
            in_water: self.player.in_water,
            on_ground: self.player.on_ground,
            broken: outcome.broken.map(|(cell, _)| cell),
            placed: outcome.placed.map(|(cell, _)| cell),
            mesh_rebuilt,
        }
    }

    /// The seed the world was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The voxel grid.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The player.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Mutable access to the player, for teleports and scripted views.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    /// The camera glued to the player's eyes.
    pub fn camera(&self) -> CameraPose {
        CameraPose::from_player(&self.player)
    }

    /// The current instance batches.
    pub fn mesh(&self) -> &WorldMesh {
        &self.mesh
    }

    /// The current sun.
    pub fn sun(&self) -> &SunState {
        &self.sun
    }

    /// The cloud layer.
    pub fn clouds(&self) -> &CloudLayer {
        &self.clouds
    }

    /// The interaction resolver, e.g. to show break progress.
    pub fn resolver(&self) -> &InteractionResolver {
        &self.resolver
    }

    /// Number of trees planted during generation.
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }
}
