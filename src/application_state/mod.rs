//! # Application State Management
//!
//! The application layer sits between input devices and the [`GameState`]:
//! - Raw control levels and look deltas are collected by the [`InputManager`]
//! - Once per frame they become a [`FrameInput`](crate::engine_state::FrameInput)
//!   and drive one game tick
//! - Headless sessions replay a [`ScriptStep`] list instead of live devices
//!
//! The application owns no window; a renderer reads the game state between frames.

pub mod input_manager;
pub mod input_state;

use cgmath::Point3;
use log::{debug, info};

use input_manager::InputManager;
use input_state::Control;

use crate::engine_state::{
    player::interaction::InteractionFeedback, voxels::block::block_type::BlockType,
    FrameReport, GameState,
};

/// Forwards block edits to the log, where a host would trigger haptics or sound.
pub struct LogFeedback;

impl InteractionFeedback for LogFeedback {
    fn block_broken(&mut self, cell: Point3<i32>, block: BlockType) {
        debug!("feedback: broke {:?} at {:?}", block, cell);
    }

    fn block_placed(&mut self, cell: Point3<i32>, block: BlockType) {
        debug!("feedback: placed {:?} at {:?}", block, cell);
    }
}

/// One segment of a scripted session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptStep {
    /// Number of frames the segment lasts.
    pub frames: u32,
    /// Controls held down for the whole segment; all others are up.
    pub held: Vec<Control>,
    /// Look delta fed on each frame of the segment.
    pub look: (f32, f32),
    /// Hotbar slot selected at the start of the segment.
    pub select: Option<String>,
}

impl ScriptStep {
    /// A segment holding `held` for `frames` frames.
    pub fn hold(frames: u32, held: &[Control]) -> Self {
        ScriptStep {
            frames,
            held: held.to_vec(),
            ..ScriptStep::default()
        }
    }

    /// Adds a per-frame look delta.
    pub fn looking(mut self, dx: f32, dy: f32) -> Self {
        self.look = (dx, dy);
        self
    }

    /// Selects a hotbar slot first.
    pub fn selecting(mut self, name: &str) -> Self {
        self.select = Some(name.to_string());
        self
    }
}

/// A short walk, a jump, then breaking and placing in front of the player.
pub fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::hold(60, &[]),
        ScriptStep::hold(45, &[Control::Forward]),
        ScriptStep::hold(20, &[Control::Forward, Control::Jump]),
        ScriptStep::hold(30, &[]).looking(0.0, 40.0),
        ScriptStep::hold(30, &[Control::Break]),
        ScriptStep::hold(2, &[]),
        ScriptStep::hold(2, &[Control::Place]).selecting("stone"),
        ScriptStep::hold(30, &[]),
    ]
}

/// Totals of a scripted session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Frames simulated.
    pub frames: u64,
    /// Blocks broken.
    pub broken: usize,
    /// Blocks placed.
    pub placed: usize,
    /// Mesh rebuilds triggered by edits.
    pub rebuilds: usize,
    /// Frames the player spent in water.
    pub frames_in_water: u64,
    /// Eye position after the last frame.
    pub final_position: Point3<f32>,
}

/// A running game together with its input.
pub struct ApplicationState {
    /// The simulated world
    pub game: GameState,
    /// Turns control levels into frame input
    pub input: InputManager,
    /// Frames simulated so far
    frame: u64,
}

impl ApplicationState {
    /// Wraps a generated world; block edits are reported to the log.
    pub fn new(mut game: GameState) -> Self {
        game.set_feedback(Box::new(LogFeedback));
        ApplicationState {
            game,
            input: InputManager::new(),
            frame: 0,
        }
    }

    /// Frames simulated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs one frame with whatever the input manager has collected.
    pub fn step(&mut self, dt: f32) -> FrameReport {
        let input = self.input.frame_input();
        self.frame += 1;
        self.game.tick(input, dt)
    }

    /// Replays `script` at a fixed frame time.
    ///
    /// # Arguments
    /// * `script` - Segments to play in order
    /// * `dt` - Seconds per frame
    ///
    /// # Returns
    /// Totals over the whole script
    pub fn run_script(&mut self, script: &[ScriptStep], dt: f32) -> SessionSummary {
        let first_frame = self.frame;
        let mut summary = SessionSummary {
            frames: 0,
            broken: 0,
            placed: 0,
            rebuilds: 0,
            frames_in_water: 0,
            final_position: self.game.player().position,
        };

        for step in script {
            if let Some(name) = &step.select {
                self.input.select_block(name);
            }
            for control in Control::ALL {
                self.input.set_control(control, step.held.contains(&control));
            }
            for _ in 0..step.frames {
                self.input.intake_look_delta(step.look.0, step.look.1);
                let report = self.step(dt);
                summary.broken += usize::from(report.broken.is_some());
                summary.placed += usize::from(report.placed.is_some());
                summary.rebuilds += usize::from(report.mesh_rebuilt);
                summary.frames_in_water += u64::from(report.in_water);
            }
        }

        summary.frames = self.frame - first_frame;
        summary.final_position = self.game.player().position;
        info!(
            "Session finished after {} frames: {} broken, {} placed, {} rebuilds",
            summary.frames, summary.broken, summary.placed, summary.rebuilds
        );
        summary
    }
}
