//! # Input Manager
//!
//! Collects raw control levels and look deltas between frames and turns them into
//! one [`FrameInput`] per frame.
//!
//! Levels are latched: the manager keeps the level of every control from the
//! previous frame, so a place button held for many frames still yields exactly one
//! place request, on the frame it went down.

use std::collections::HashMap;

use log::debug;

use super::input_state::{ButtonState, Control};
use crate::engine_state::{voxels::block::block_type::BlockType, FrameInput};

/// Radians of view rotation per unit of look delta (mouse pixels).
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.003;

/// Manages the state of all controls and produces per-frame input.
pub struct InputManager {
    /// Level of every control during the previous frame
    controls_old: HashMap<Control, bool>,
    /// Level of every control right now
    controls_new: HashMap<Control, bool>,
    /// Look delta accumulated since the last frame (x, y)
    look_delta: (f32, f32),
    /// Radians per unit of look delta
    look_sensitivity: f32,
    /// Block type placed by the place control
    selected_block: BlockType,
}

impl Default for InputManager {
    fn default() -> Self {
        InputManager::new()
    }
}

impl InputManager {
    /// Creates a manager with every control released and grass selected.
    pub fn new() -> Self {
        let mut controls_old = HashMap::new();
        let mut controls_new = HashMap::new();
        for control in Control::ALL {
            controls_old.insert(control, false);
            controls_new.insert(control, false);
        }

        InputManager {
            controls_old,
            controls_new,
            look_delta: (0.0, 0.0),
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            selected_block: BlockType::Grass,
        }
    }

    /// Changes the look sensitivity.
    pub fn with_look_sensitivity(mut self, sensitivity: f32) -> Self {
        self.look_sensitivity = sensitivity;
        self
    }

    /// Records the current level of a control.
    pub fn set_control(&mut self, control: Control, down: bool) {
        if let Some(level) = self.controls_new.get_mut(&control) {
            *level = down;
        }
    }

    /// Adds a look delta; right and down are positive.
    pub fn intake_look_delta(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    /// Selects the hotbar slot called `name`. Unknown names select grass.
    pub fn select_block(&mut self, name: &str) {
        self.selected_block = BlockType::hotbar_selection(name);
        debug!("Selected {:?} from hotbar slot {:?}", self.selected_block, name);
    }

    /// The block type the place control currently places.
    pub fn selected_block(&self) -> BlockType {
        self.selected_block
    }

    /// The transition of `control` between the previous and the current frame.
    pub fn control_state(&self, control: Control) -> ButtonState {
        let old = self.controls_old.get(&control).copied().unwrap_or(false);
        let new = self.controls_new.get(&control).copied().unwrap_or(false);
        ButtonState::from_raw_states(old, new)
    }

    /// Releases every control, e.g. when the window loses focus.
    pub fn reset_inputs(&mut self) {
        for level in self.controls_new.values_mut() {
            *level = false;
        }
        self.look_delta = (0.0, 0.0);
    }

    /// Builds this frame's input and starts the next frame.
    pub fn frame_input(&mut self) -> FrameInput {
        let axis = |positive: Control, negative: Control| {
            let mut value = 0.0;
            if self.control_state(positive).is_active() {
                value += 1.0;
            }
            if self.control_state(negative).is_active() {
                value -= 1.0;
            }
            value
        };

        let input = FrameInput {
            move_x: axis(Control::Right, Control::Left),
            move_z: axis(Control::Forward, Control::Backward),
            jump: self.control_state(Control::Jump).is_active(),
            break_held: self.control_state(Control::Break).is_active(),
            place_requested: self.control_state(Control::Place).is_just_pressed(),
            yaw_delta: -self.look_delta.0 * self.look_sensitivity,
            pitch_delta: -self.look_delta.1 * self.look_sensitivity,
            selected_block: self.selected_block,
        };

        self.move_old_states();
        self.look_delta = (0.0, 0.0);
        input
    }

    fn move_old_states(&mut self) {
        for (control, new_level) in self.controls_new.iter() {
            if let Some(old_level) = self.controls_old.get_mut(control) {
                *old_level = *new_level;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn held_place_requests_only_once() {
        let mut input = InputManager::new();
        input.set_control(Control::Place, true);
        assert!(input.frame_input().place_requested);
        assert!(!input.frame_input().place_requested);
        assert!(!input.frame_input().place_requested);

        input.set_control(Control::Place, false);
        assert!(!input.frame_input().place_requested);
        input.set_control(Control::Place, true);
        assert!(input.frame_input().place_requested);
    }

    #[test]
    fn break_stays_active_while_held() {
        let mut input = InputManager::new();
        input.set_control(Control::Break, true);
        assert!(input.frame_input().break_held);
        assert!(input.frame_input().break_held);
        input.set_control(Control::Break, false);
        assert!(!input.frame_input().break_held);
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut input = InputManager::new();
        input.set_control(Control::Forward, true);
        input.set_control(Control::Left, true);
        let frame = input.frame_input();
        assert_eq!(frame.move_z, 1.0);
        assert_eq!(frame.move_x, -1.0);

        input.set_control(Control::Backward, true);
        assert_eq!(input.frame_input().move_z, 0.0);
    }

    #[test]
    fn look_delta_is_scaled_inverted_and_consumed() {
        let mut input = InputManager::new().with_look_sensitivity(0.01);
        input.intake_look_delta(10.0, -4.0);
        input.intake_look_delta(10.0, 0.0);
        let frame = input.frame_input();
        assert_abs_diff_eq!(frame.yaw_delta, -0.2);
        assert_abs_diff_eq!(frame.pitch_delta, 0.04);

        let frame = input.frame_input();
        assert_eq!(frame.yaw_delta, 0.0);
        assert_eq!(frame.pitch_delta, 0.0);
    }

    #[test]
    fn hotbar_selection_falls_back_to_grass() {
        let mut input = InputManager::new();
        input.select_block("stone");
        assert_eq!(input.frame_input().selected_block, BlockType::Stone);
        input.select_block("diamond");
        assert_eq!(input.selected_block(), BlockType::Grass);
    }

    #[test]
    fn reset_releases_everything() {
        let mut input = InputManager::new();
        input.set_control(Control::Jump, true);
        input.frame_input();
        input.reset_inputs();
        assert_eq!(input.control_state(Control::Jump), ButtonState::Released);
        assert!(!input.frame_input().jump);
    }
}
