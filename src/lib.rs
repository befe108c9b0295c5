#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A procedural voxel world with first-person physics, built to sit behind any
//! instanced renderer.
//!
//! A seed and a set of world dimensions deterministically produce terrain with
//! layered soil, water, caves and trees. A player walks, swims and jumps through the
//! grid, breaks and places blocks along its view ray, and every edit rebuilds one
//! instance batch per block type for the renderer to draw.
//!
//! ## Key Modules
//!
//! * `config` - JSON configuration of every subsystem
//! * `engine_state` - The world, its generators, the player and the environment
//! * `application_state` - Input latching and headless scripted sessions
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::{EngineConfig, FrameInput, GameState, GridDimensions, NoProgress};
//!
//! let mut config = EngineConfig::default();
//! config.world.seed = Some(42);
//! config.world.dimensions = GridDimensions::new(16, 24, 16);
//!
//! let mut game = GameState::generate(&config, &NoProgress);
//! for _ in 0..60 {
//!     game.tick(FrameInput::default(), 1.0 / 60.0);
//! }
//! for batch in &game.mesh().batches {
//!     let _bytes: &[u8] = batch.as_bytes();
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Terrain columns are generated in parallel with rayon, one x slab per task
//! * The grid is a single contiguous byte buffer
//! * Mesh builds are two flat passes with exactly-sized instance buffers

use std::sync::Mutex;

use log::{error, info};

pub mod application_state;
pub mod config;
pub mod engine_state;

pub use application_state::{demo_script, ApplicationState, ScriptStep, SessionSummary};
pub use config::{load_config, ConfigError, EngineConfig};
pub use engine_state::{
    camera_state::CameraPose,
    environment::{CloudLayer, DayCycle, SunState},
    player::PlayerState,
    rendering::{InstanceTransform, MeshBatch, MeshBuilder, WorldMesh},
    voxels::{
        block::{block_type::BlockType, BlockMaterial},
        generation::{
            noise_field::{FbmParams, NoiseField},
            GenerationStage, NoProgress, ProgressSink,
        },
        grid::{GridDimensions, VoxelGrid},
    },
    FrameInput, FrameReport, GameState,
};

/// Frame time of headless sessions.
pub const HEADLESS_FRAME_TIME: f32 = 1.0 / 60.0;

/// Logs each generation stage once, as it is entered.
struct StageLogger {
    last: Mutex<Option<GenerationStage>>,
}

impl ProgressSink for StageLogger {
    fn report(&self, stage: GenerationStage, _fraction: f32) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if last.map_or(true, |seen| stage > seen) {
            info!("{}", stage.label());
            *last = Some(stage);
        }
    }
}

/// Runs a headless session.
///
/// Initializes logging, loads the configuration named by the first command line
/// argument (defaults otherwise), generates a world and plays the demo script.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path).map_err(|err| {
            error!("Could not load configuration from {}: {}", path, err);
            err
        })?,
        None => {
            info!("No configuration given, using defaults");
            EngineConfig::default()
        }
    };

    let progress = StageLogger {
        last: Mutex::new(None),
    };
    let game = GameState::generate(&config, &progress);
    info!(
        "World with seed {} has {} trees and {} visible blocks",
        game.seed(),
        game.tree_count(),
        game.mesh().instance_count()
    );

    let mut app = ApplicationState::new(game);
    let summary = app.run_script(&demo_script(), HEADLESS_FRAME_TIME);
    let sun = app.game.sun();
    info!(
        "Player ended at ({:.2}, {:.2}, {:.2}); sun intensity {:.2}",
        summary.final_position.x, summary.final_position.y, summary.final_position.z, sun.intensity
    );
    Ok(())
}
