//! Geometry helpers for the joystick control area
//!
//! Pure functions over egui's vector types. Positions use [`Pos2`], offsets and
//! sizes use [`Vec2`]. All angles follow screen coordinates: y grows downwards,
//! so a positive angle turns clockwise from the positive x-axis.

pub mod radius;

pub use radius::Radius;

use crate::control::MaxQuadrants;
use crate::error::JoystickError;
use egui::Vec2;
use std::f32::consts::TAU;

/// A full turn in radians
pub const RADIAN_SPIN: f32 = TAU;

/// A full turn in degrees
pub const DEGREE_SPIN: f64 = 360.0;

/// Square root of two, used to keep diagonal targets at the requested distance
pub const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Angle of `offset` measured from the positive x-axis, normalized into `[0, 2π)`.
pub fn angle_of(offset: Vec2) -> f32 {
    let angle = offset.y.atan2(offset.x);
    if angle < 0.0 {
        // atan2 can round `-ε + 2π` up to exactly 2π
        (angle + RADIAN_SPIN) % RADIAN_SPIN
    } else {
        angle
    }
}

/// Vector of length `length` pointing along `angle` (radians).
pub fn parametrize_at(length: f32, angle: f32) -> Vec2 {
    Vec2::new(length * angle.cos(), length * angle.sin())
}

/// Rescales `offset` to `length`, keeping its direction.
pub fn parametrize(offset: Vec2, length: f32) -> Vec2 {
    parametrize_at(length, angle_of(offset))
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees / 180.0 * std::f64::consts::PI
}

/// Buckets an angle (degrees) into one of `max_quadrants` equal slices.
///
/// Quadrants are numbered from 1. Without `use_middle` quadrant 1 starts at 0°.
/// With `use_middle` every slice is centered on a multiple of its width, so
/// quadrant 1 is centered on 0° and the last half slice before 360° wraps back
/// to quadrant 1. Angles of 360° or more wrap around.
///
/// # Errors
///
/// [`JoystickError::NegativeAngle`] when `degrees` is negative. Callers are
/// expected to normalize with [`angle_of`] first.
pub fn angle_to_quadrant(
    degrees: f64,
    max_quadrants: MaxQuadrants,
    use_middle: bool,
) -> Result<u8, JoystickError> {
    if degrees < 0.0 || degrees.is_nan() {
        return Err(JoystickError::NegativeAngle(degrees));
    }

    let quadrants = max_quadrants.count();
    let width = DEGREE_SPIN / f64::from(quadrants);
    let angle = degrees % DEGREE_SPIN;
    let shifted = if use_middle { angle + width / 2.0 } else { angle };

    let bucket = (shifted / width).floor() as u64 % u64::from(quadrants);
    Ok(bucket as u8 + 1)
}

/// Scales `size` down to fit inside `max`, preserving the aspect ratio.
///
/// Never scales up. A `None` maximum returns `size` unchanged.
pub fn clamp_size_to_max(size: Vec2, max: Option<Vec2>) -> Vec2 {
    let Some(max) = max else {
        return size;
    };
    if size.x <= 0.0 || size.y <= 0.0 {
        return size;
    }

    let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
    size * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn angle_is_normalized_into_full_turn() {
        assert!((angle_of(Vec2::new(1.0, 0.0)) - 0.0).abs() < EPS);
        assert!((angle_of(Vec2::new(0.0, 1.0)) - TAU / 4.0).abs() < EPS);
        assert!((angle_of(Vec2::new(-1.0, 0.0)) - TAU / 2.0).abs() < EPS);
        assert!((angle_of(Vec2::new(0.0, -1.0)) - 3.0 * TAU / 4.0).abs() < EPS);

        let angle = angle_of(Vec2::new(1.0, -1e-9));
        assert!((0.0..RADIAN_SPIN).contains(&angle));
    }

    #[test]
    fn parametrize_keeps_direction_and_sets_length() {
        let projected = parametrize(Vec2::new(3.0, 4.0), 10.0);
        assert!((projected.x - 6.0).abs() < EPS);
        assert!((projected.y - 8.0).abs() < EPS);
        assert!((projected.length() - 10.0).abs() < EPS);
    }

    #[test]
    fn degree_radian_conversion() {
        assert!((to_degrees(std::f64::consts::PI) - 180.0).abs() < 1e-9);
        assert!((to_radians(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn middle_buckets_center_first_quadrant_on_zero() {
        let q = |deg| angle_to_quadrant(deg, MaxQuadrants::Eight, true).unwrap();
        assert_eq!(q(0.0), 1);
        assert_eq!(q(22.0), 1);
        assert_eq!(q(23.0), 2);
        assert_eq!(q(45.0), 2);
        assert_eq!(q(90.0), 3);
        assert_eq!(q(270.0), 7);
        assert_eq!(q(338.0), 1);
        assert_eq!(q(360.0), 1);
    }

    #[test]
    fn plain_buckets_start_at_zero() {
        let q = |deg| angle_to_quadrant(deg, MaxQuadrants::Four, false).unwrap();
        assert_eq!(q(0.0), 1);
        assert_eq!(q(89.9), 1);
        assert_eq!(q(90.0), 2);
        assert_eq!(q(359.0), 4);
        assert_eq!(q(450.0), 2);
    }

    #[test]
    fn negative_angle_is_rejected() {
        assert_eq!(
            angle_to_quadrant(-1.0, MaxQuadrants::Four, true),
            Err(JoystickError::NegativeAngle(-1.0))
        );
    }

    #[test]
    fn size_is_scaled_down_but_never_up() {
        let clamped = clamp_size_to_max(Vec2::new(400.0, 200.0), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(clamped, Vec2::new(100.0, 50.0));

        let untouched = clamp_size_to_max(Vec2::new(40.0, 20.0), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(untouched, Vec2::new(40.0, 20.0));

        assert_eq!(clamp_size_to_max(Vec2::new(7.0, 3.0), None), Vec2::new(7.0, 3.0));
    }
}
