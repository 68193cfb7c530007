//! Gesture subsystem turning pointer input into joystick updates
//!
//! 1. [`driver`] - Typestate machine for one pointer gesture
//! 2. [`listener`] - Where the per-step snapshots go (callbacks or events)
//! 3. [`gesture_handle`] - Async host running the driver as a tokio task
//!
//! ```text
//! PointerInput ──► GestureDriver ──► SharedState
//!                        │
//!                        └──► MovementListener (callbacks | JoystickEventsHolder)
//! ```
//!
//! The egui widget drives [`GestureDriver`] synchronously from its frame loop.
//! Other hosts can hand inputs to a [`GestureHandle`] instead.

pub mod driver;
pub mod gesture_handle;
pub mod listener;

pub use driver::{
    GestureDriver, GesturePhase, GestureSettings, PointerInput, DEFAULT_HOLD_INTERVAL,
};
pub use gesture_handle::GestureHandle;
pub use listener::{JoystickCallbacks, MovementListener};
