use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::control::Direction;

/// Point-in-time copy of the joystick readings.
///
/// Holds no reference back to the state it was taken from, so it can be sent
/// to other tasks, compared and serialized freely. `position` is `None` only
/// for the default snapshot, before any state was sampled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JoystickSnapshot {
    pub direction: Direction,
    pub position: Option<Pos2>,
    /// Normalized magnitude in `[0, 1]`
    pub strength: f32,
    /// Angle in radians in `[0, 2π)`
    pub angle: f32,
}

impl JoystickSnapshot {
    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }

    pub fn is_idle(&self) -> bool {
        self.direction == Direction::None && self.strength == 0.0
    }
}

impl fmt::Display for JoystickSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "{} @ ({:.1}, {:.1}) strength {:.2} angle {:.1}°",
                self.direction,
                position.x,
                position.y,
                self.strength,
                self.angle_degrees()
            ),
            None => write!(f, "{} @ unspecified", self.direction),
        }
    }
}
