//! Configuration types for a joystick control and the demo application
//!
//! Everything here (de)serializes with serde so it can be stored in the
//! TOML session file. Missing fields fall back to [`Default`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::control::DirectionType;
use crate::error::JoystickError;
use crate::geometry::Radius;
use crate::gesture::{GestureSettings, DEFAULT_HOLD_INTERVAL};
use crate::state::JoystickState;
use crate::ui::knob::KnobStyle;

/// Behaviour of one joystick control
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct JoystickConfig {
    /// Dead zone around the center
    pub invalid_radius: Radius,
    pub direction_type: DirectionType,
    /// Minimum pointer movement in pixels before dragging starts
    pub threshold: Option<f32>,
    /// Delay between hold ticks in milliseconds
    pub interval_ms: u64,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            invalid_radius: Radius::default(),
            direction_type: DirectionType::default(),
            threshold: None,
            interval_ms: DEFAULT_HOLD_INTERVAL.as_millis() as u64,
        }
    }
}

impl JoystickConfig {
    pub fn validate(&self) -> Result<(), JoystickError> {
        self.invalid_radius.validate()?;
        self.gesture_settings().validate()?;

        debug!("Joystick configuration is valid: {:?}", self);
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn gesture_settings(&self) -> GestureSettings {
        GestureSettings {
            threshold: self.threshold,
            interval: self.interval(),
        }
    }

    /// Fresh, unsized state using this configuration
    pub fn build_state(&self) -> Result<JoystickState, JoystickError> {
        JoystickState::new(self.invalid_radius, self.direction_type)
    }
}

/// Everything the demo application stores in a session
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub joystick: JoystickConfig,
    pub knob: KnobStyle,
    /// Whether the last knob position is written to the session file
    pub persist_position: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            joystick: JoystickConfig::default(),
            knob: KnobStyle::default(),
            persist_position: true,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), JoystickError> {
        self.joystick.validate()?;
        self.knob.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::knob::DrawMode;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = JoystickConfig::default();
        assert_eq!(config.invalid_radius, Radius::Ratio(0.2));
        assert_eq!(config.direction_type, DirectionType::Complete);
        assert_eq!(config.threshold, None);
        assert_eq!(config.interval(), Duration::from_millis(175));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            persist_position = false

            [joystick]
            direction_type = "Simple"
            threshold = 4.0

            [joystick.invalid_radius]
            kind = "fixed"
            value = 12.0
            "#,
        )
        .unwrap();

        assert!(!config.persist_position);
        assert_eq!(config.joystick.direction_type, DirectionType::Simple);
        assert_eq!(config.joystick.threshold, Some(4.0));
        assert_eq!(config.joystick.invalid_radius, Radius::Fixed(12.0));
        assert_eq!(config.joystick.interval_ms, 175);
        assert_eq!(config.knob, KnobStyle::default());
    }

    #[test]
    fn out_of_range_radius_fails_to_parse() {
        let parsed: Result<JoystickConfig, _> = toml::from_str(
            r#"
            [invalid_radius]
            kind = "ratio"
            value = 1.5
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = JoystickConfig {
            threshold: Some(-2.0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JoystickError::ConfigError(_))));

        config.threshold = None;
        config.interval_ms = 0;
        assert!(config.validate().is_err());

        config.interval_ms = 100;
        config.invalid_radius = Radius::Ratio(0.0);
        assert!(matches!(config.validate(), Err(JoystickError::InvalidRadius(_))));
    }

    #[test]
    fn unchecked_radius_cannot_build_a_state() {
        let config = JoystickConfig {
            invalid_radius: Radius::Fixed(-30.0),
            ..Default::default()
        };
        assert!(matches!(config.build_state(), Err(JoystickError::InvalidRadius(_))));
        assert!(JoystickConfig::default().build_state().is_ok());
    }

    #[test]
    fn app_config_round_trips_through_toml() {
        let config = AppConfig {
            knob: KnobStyle::Circle {
                radius: Radius::Ratio(0.25),
                mode: DrawMode::Clamped,
            },
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
