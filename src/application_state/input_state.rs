//! # Input State
//!
//! Device-independent input vocabulary: the controls the game understands and the
//! per-frame state of each of them.

/// Represents the state of a control across two consecutive frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    /// Up last frame and this frame
    #[default]
    NotPressed,
    /// Went down this frame
    Pressed,
    /// Down last frame and this frame
    Held,
    /// Went up this frame
    Released,
}

impl ButtonState {
    /// Whether the control is down this frame.
    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Held)
    }

    /// Whether the control went down this frame.
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, ButtonState::Pressed)
    }

    /// Whether the control went up this frame.
    pub fn is_just_released(&self) -> bool {
        matches!(self, ButtonState::Released)
    }

    /// Derives the transition from the previous and the current level.
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => ButtonState::Pressed,
            (true, true) => ButtonState::Held,
            (true, false) => ButtonState::Released,
            (false, false) => ButtonState::NotPressed,
        }
    }
}

/// Every digital control of the game, whichever device drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Walk forward (W, up arrow, joystick up)
    Forward,
    /// Walk backward (S, down arrow, joystick down)
    Backward,
    /// Strafe left (A, left arrow, joystick left)
    Left,
    /// Strafe right (D, right arrow, joystick right)
    Right,
    /// Jump, or swim up in water
    Jump,
    /// Break the targeted block while held
    Break,
    /// Place the selected block, once per press
    Place,
}

impl Control {
    /// All controls tracked by the input manager.
    pub const ALL: [Control; 7] = [
        Control::Forward,
        Control::Backward,
        Control::Left,
        Control::Right,
        Control::Jump,
        Control::Break,
        Control::Place,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_two_levels() {
        assert_eq!(ButtonState::from_raw_states(false, true), ButtonState::Pressed);
        assert_eq!(ButtonState::from_raw_states(true, true), ButtonState::Held);
        assert_eq!(ButtonState::from_raw_states(true, false), ButtonState::Released);
        assert_eq!(ButtonState::from_raw_states(false, false), ButtonState::NotPressed);
    }

    #[test]
    fn only_pressed_is_a_fresh_press() {
        assert!(ButtonState::Pressed.is_just_pressed());
        assert!(!ButtonState::Held.is_just_pressed());
        assert!(ButtonState::Held.is_active());
        assert!(!ButtonState::Released.is_active());
        assert!(ButtonState::Released.is_just_released());
    }
}
