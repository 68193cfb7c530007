//! Error type shared by the joystick core

use thiserror::Error;

/// Errors raised by the joystick core
///
/// Geometry never fails on degenerate input (a zero-sized control simply reports
/// an invalid, zero-strength state). Errors are reserved for caller input that is
/// rejected at the call site and for the async plumbing around the gesture driver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JoystickError {
    /// A `Radius` was constructed outside its allowed range
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// A strength outside `[0, 1]` was requested
    #[error("Strength must be between 0 and 1, got {0}")]
    InvalidStrength(f32),

    /// Quadrant bucketing only accepts normalized, non-negative angles
    #[error("Angle must be positive, got {0}")]
    NegativeAngle(f64),

    /// Inter-task communication failed
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A background task could not be joined
    #[error("Task error: {0}")]
    TaskError(String),
}
