use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::joystick_state::JoystickState;
use crate::state::snapshot::JoystickSnapshot;

// Lifecycle events of one gesture, each carrying the readings at emission time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JoystickEvent {
    Start(JoystickSnapshot),
    Moving(JoystickSnapshot),
    Held(JoystickSnapshot),
    /// Always carries the post-reset snapshot: centered, `None`, strength 0
    End(JoystickSnapshot),
}

impl JoystickEvent {
    pub fn snapshot(&self) -> &JoystickSnapshot {
        match self {
            JoystickEvent::Start(snapshot)
            | JoystickEvent::Moving(snapshot)
            | JoystickEvent::Held(snapshot)
            | JoystickEvent::End(snapshot) => snapshot,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JoystickEvent::Start(_) => "Start",
            JoystickEvent::Moving(_) => "Moving",
            JoystickEvent::Held(_) => "Held",
            JoystickEvent::End(_) => "End",
        }
    }
}

impl fmt::Display for JoystickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.snapshot())
    }
}

impl JoystickState {
    pub fn to_start_event(&self) -> JoystickEvent {
        JoystickEvent::Start(self.snapshot())
    }

    pub fn to_move_event(&self) -> JoystickEvent {
        JoystickEvent::Moving(self.snapshot())
    }

    pub fn to_held_event(&self) -> JoystickEvent {
        JoystickEvent::Held(self.snapshot())
    }

    pub fn to_end_event(&self) -> JoystickEvent {
        JoystickEvent::End(self.snapshot())
    }
}
