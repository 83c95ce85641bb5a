//! Keyboard state and per-player control schemes
//!
//! The host delivers key-down/key-up events; the sim only ever reads the
//! held-key map. Key names are the lowercase logical names the browser
//! reports ("w", "arrowup", ...).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Process-wide held-key map, updated by the host input events
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase(), true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.insert(key.to_lowercase(), false);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }
}

/// The four logical keys one player drives with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
}

impl ControlScheme {
    /// Player 1: WASD
    pub fn wasd() -> Self {
        Self {
            forward: "w".into(),
            backward: "s".into(),
            left: "a".into(),
            right: "d".into(),
        }
    }

    /// Player 2: arrow keys
    pub fn arrows() -> Self {
        Self {
            forward: "arrowup".into(),
            backward: "arrowdown".into(),
            left: "arrowleft".into(),
            right: "arrowright".into(),
        }
    }

    /// Sample the held-key map into a per-tick car input
    pub fn sample(&self, input: &InputState) -> CarInput {
        CarInput {
            forward: input.is_held(&self.forward),
            backward: input.is_held(&self.backward),
            left: input.is_held(&self.left),
            right: input.is_held(&self.right),
        }
    }
}

/// One car's input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl CarInput {
    /// +1 forward, -1 backward, 0 idle (forward wins if both are held)
    pub fn accel_sign(&self) -> f32 {
        if self.forward {
            1.0
        } else if self.backward {
            -1.0
        } else {
            0.0
        }
    }

    /// +1 left, -1 right, 0 when neither or both
    pub fn steer_target(&self) -> f32 {
        (self.left as i32 - self.right as i32) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_events_round_trip() {
        let mut input = InputState::new();
        assert!(!input.is_held("w"));

        input.key_down("W");
        assert!(input.is_held("w"));

        input.key_up("w");
        assert!(!input.is_held("w"));
    }

    #[test]
    fn test_schemes_are_independent() {
        let mut input = InputState::new();
        input.key_down("w");
        input.key_down("arrowleft");

        let p1 = ControlScheme::wasd().sample(&input);
        let p2 = ControlScheme::arrows().sample(&input);

        assert!(p1.forward && !p1.left);
        assert!(p2.left && !p2.forward);
    }

    #[test]
    fn test_accel_sign_and_steer_target() {
        let fwd = CarInput {
            forward: true,
            ..Default::default()
        };
        assert_eq!(fwd.accel_sign(), 1.0);

        let bwd = CarInput {
            backward: true,
            ..Default::default()
        };
        assert_eq!(bwd.accel_sign(), -1.0);

        let both_steer = CarInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both_steer.steer_target(), 0.0);

        let right = CarInput {
            right: true,
            ..Default::default()
        };
        assert_eq!(right.steer_target(), -1.0);
    }
}
