//! # Persistence Module
//!
//! Stores joystick sessions as TOML files so a control comes back with the
//! same configuration and, optionally, the same knob position.
//!
//! Only the position is persisted for the state. The size always comes from
//! the layout of the next run, so a restored position is re-clamped against
//! the new size before it is applied (see [`JoystickState::restored`]).
//!
//! ## Error Handling Strategy
//! File operations use `color_eyre` with `eyre!` context. A missing session
//! file is not an error: it degrades to the default session with a warning.
//!
//! [`JoystickState::restored`]: crate::state::JoystickState::restored

pub mod persistence_worker;
pub mod session_store;

pub use persistence_worker::{PersistenceManager, SessionAction};
pub use session_store::SessionStore;

use chrono::{DateTime, Local};
use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::JoystickError;
use crate::state::{JoystickState, SavedPosition};

/// Contents of one session file
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct JoystickSession {
    pub config: AppConfig,
    /// Last knob position, only written when `config.persist_position` is set
    pub position: Option<SavedPosition>,
    pub saved_at: Option<DateTime<Local>>,
}

impl JoystickSession {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            position: None,
            saved_at: None,
        }
    }

    /// Captures the current state for saving, honouring `persist_position`.
    pub fn capture(config: AppConfig, state: &JoystickState) -> Self {
        let position = config.persist_position.then(|| state.saved_position());
        Self {
            config,
            position,
            saved_at: Some(Local::now()),
        }
    }

    /// State for a control of `size`, at the saved position when there is one.
    pub fn restore_state(&self, size: Vec2) -> Result<JoystickState, JoystickError> {
        let joystick = &self.config.joystick;
        match self.position {
            Some(saved) => {
                JoystickState::restored(joystick.invalid_radius, joystick.direction_type, size, saved)
            }
            None => {
                let mut state = joystick.build_state()?;
                state.set_size(size);
                state.reset();
                Ok(state)
            }
        }
    }
}
