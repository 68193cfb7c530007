//! Joystick state, readings and event distribution
//!
//! 1. [`joystick_state`] - Stored position/size and every derived reading
//! 2. [`snapshot`] - Detached copies of the readings
//! 3. [`event`] - Gesture lifecycle events carrying snapshots
//! 4. [`shared_state`] - Single writer / many reader access to one state
//! 5. [`events_holder`] - Bounded multicast stream of events
//!
//! ```text
//! Driver ──► SharedState ──► Snapshot ──► EventsHolder ──► Subscribers
//!            (watch)                      (broadcast, 64)
//! ```

pub mod event;
pub mod events_holder;
pub mod joystick_state;
pub mod shared_state;
pub mod snapshot;

pub use event::JoystickEvent;
pub use events_holder::{JoystickEventsHolder, EVENT_BUFFER_CAPACITY};
pub use joystick_state::{JoystickState, SavedPosition};
pub use shared_state::SharedState;
pub use snapshot::JoystickSnapshot;
