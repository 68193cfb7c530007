use crate::error::JoystickError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A radius that is either absolute or relative to the control radius.
///
/// Build it through [`Radius::fixed`] or [`Radius::ratio`], which reject values
/// outside the allowed ranges. Deserialized values go through the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RadiusRepr", into = "RadiusRepr")]
pub enum Radius {
    /// Radius in pixels, always positive
    Fixed(f32),
    /// Fraction of the available radius, in `(0, 1)`
    Ratio(f32),
}

impl Radius {
    pub fn fixed(value: f32) -> Result<Self, JoystickError> {
        if value > 0.0 && value.is_finite() {
            Ok(Self::Fixed(value))
        } else {
            Err(JoystickError::InvalidRadius(format!(
                "fixed radius must be positive, got {}",
                value
            )))
        }
    }

    pub fn ratio(value: f32) -> Result<Self, JoystickError> {
        if value > 0.0 && value < 1.0 {
            Ok(Self::Ratio(value))
        } else {
            Err(JoystickError::InvalidRadius(format!(
                "ratio radius must be in range (0.0, 1.0), got {}",
                value
            )))
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Radius::Fixed(value) | Radius::Ratio(value) => *value,
        }
    }

    /// Resolves the radius to pixels against the control's available radius.
    pub fn resolve(&self, available: f32) -> f32 {
        match self {
            Radius::Fixed(value) => *value,
            Radius::Ratio(ratio) => available * ratio,
        }
    }

    /// Re-runs the constructor checks, for values built from the bare variants.
    pub fn validate(&self) -> Result<(), JoystickError> {
        match *self {
            Radius::Fixed(value) => Radius::fixed(value).map(|_| ()),
            Radius::Ratio(value) => Radius::ratio(value).map(|_| ()),
        }
    }
}

impl Default for Radius {
    /// Dead zone of 20% of the control radius
    fn default() -> Self {
        Radius::Ratio(0.2)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Radius::Fixed(value) => write!(f, "{}px", value),
            Radius::Ratio(ratio) => write!(f, "{:.0}%", ratio * 100.0),
        }
    }
}

// On-disk shape: `{ kind = "ratio", value = 0.2 }`
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum RadiusRepr {
    Fixed(f32),
    Ratio(f32),
}

impl TryFrom<RadiusRepr> for Radius {
    type Error = JoystickError;

    fn try_from(repr: RadiusRepr) -> Result<Self, Self::Error> {
        match repr {
            RadiusRepr::Fixed(value) => Radius::fixed(value),
            RadiusRepr::Ratio(value) => Radius::ratio(value),
        }
    }
}

impl From<Radius> for RadiusRepr {
    fn from(radius: Radius) -> Self {
        match radius {
            Radius::Fixed(value) => RadiusRepr::Fixed(value),
            Radius::Ratio(value) => RadiusRepr::Ratio(value),
        }
    }
}
