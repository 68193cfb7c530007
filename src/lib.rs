//! # Virtual Joystick
//!
//! An on-screen joystick control for egui applications.
//!
//! The crate is split into a rendering-free core and an egui layer:
//! - [`geometry`], [`control`] and [`state`] model the control area, classify
//!   positions into discrete [`Direction`]s and publish [`JoystickEvent`]s
//! - [`gesture`] turns pointer input into movement callbacks, including
//!   repeating hold ticks while the pointer rests
//! - [`ui`] paints the control and hosts the demo application
//! - [`config`] and [`persistence`] store configuration and the last knob
//!   position as TOML sessions
//!
//! ```no_run
//! use virtual_joystick::{Direction, JoystickEventsHolder, SharedState};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), virtual_joystick::JoystickError> {
//! let holder = JoystickEventsHolder::new(SharedState::default());
//! let mut events = holder.subscribe();
//! holder.state().set_size(egui::Vec2::splat(200.0));
//!
//! holder
//!     .goto_with_reset(Direction::Up, 1.0, Duration::from_millis(100))
//!     .await?;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod persistence;
pub mod state;
pub mod ui;

pub use config::{AppConfig, JoystickConfig};
pub use control::{Direction, DirectionType};
pub use error::JoystickError;
pub use geometry::Radius;
pub use gesture::{GestureDriver, GestureHandle, GestureSettings, JoystickCallbacks, MovementListener, PointerInput};
pub use state::{JoystickEvent, JoystickEventsHolder, JoystickSnapshot, JoystickState, SharedState};
pub use ui::knob::KnobStyle;
pub use ui::pad::JoystickPad;
