use tracing::debug;

use crate::state::{JoystickEventsHolder, JoystickSnapshot};

/// Receiver of the readings produced by a gesture.
///
/// Every callback gets the snapshot taken right after the state was updated
/// for that step. `on_move_end` always sees the centered, post-reset state.
pub trait MovementListener: Send {
    fn on_move_start(&mut self, _snapshot: JoystickSnapshot) {}

    fn on_move(&mut self, snapshot: JoystickSnapshot);

    /// Periodic tick while the pointer stays down without a qualifying move
    fn on_hold(&mut self, snapshot: JoystickSnapshot) {
        self.on_move(snapshot);
    }

    fn on_move_end(&mut self, _snapshot: JoystickSnapshot) {}

    /// Whether the driver should arm the hold timer at all
    fn listens_for_hold(&self) -> bool {
        true
    }
}

type SnapshotCallback = Box<dyn FnMut(JoystickSnapshot) + Send>;

/// Closure based listener
///
/// ```rust,no_run
/// use virtual_joystick::gesture::JoystickCallbacks;
///
/// let callbacks = JoystickCallbacks::new(|snapshot| println!("{}", snapshot))
///     .with_move_end(|_| println!("released"));
/// ```
pub struct JoystickCallbacks {
    on_move_start: Option<SnapshotCallback>,
    on_move: SnapshotCallback,
    on_hold: Option<SnapshotCallback>,
    on_move_end: Option<SnapshotCallback>,
    hold_ticks: bool,
}

impl JoystickCallbacks {
    pub fn new<F>(on_move: F) -> Self
    where
        F: FnMut(JoystickSnapshot) + Send + 'static,
    {
        Self {
            on_move_start: None,
            on_move: Box::new(on_move),
            on_hold: None,
            on_move_end: None,
            hold_ticks: true,
        }
    }

    pub fn with_move_start<F>(mut self, callback: F) -> Self
    where
        F: FnMut(JoystickSnapshot) + Send + 'static,
    {
        self.on_move_start = Some(Box::new(callback));
        self
    }

    /// Separate hold callback. Without one, hold ticks go to the move callback.
    pub fn with_hold<F>(mut self, callback: F) -> Self
    where
        F: FnMut(JoystickSnapshot) + Send + 'static,
    {
        self.on_hold = Some(Box::new(callback));
        self
    }

    pub fn with_move_end<F>(mut self, callback: F) -> Self
    where
        F: FnMut(JoystickSnapshot) + Send + 'static,
    {
        self.on_move_end = Some(Box::new(callback));
        self
    }

    pub fn with_hold_ticks(mut self, enabled: bool) -> Self {
        self.hold_ticks = enabled;
        self
    }
}

impl MovementListener for JoystickCallbacks {
    fn on_move_start(&mut self, snapshot: JoystickSnapshot) {
        if let Some(callback) = self.on_move_start.as_mut() {
            callback(snapshot);
        }
    }

    fn on_move(&mut self, snapshot: JoystickSnapshot) {
        (self.on_move)(snapshot);
    }

    fn on_hold(&mut self, snapshot: JoystickSnapshot) {
        match self.on_hold.as_mut() {
            Some(callback) => callback(snapshot),
            None => (self.on_move)(snapshot),
        }
    }

    fn on_move_end(&mut self, snapshot: JoystickSnapshot) {
        if let Some(callback) = self.on_move_end.as_mut() {
            callback(snapshot);
        }
    }

    fn listens_for_hold(&self) -> bool {
        self.hold_ticks
    }
}

/// Republishes gestures to the holder's subscribers.
///
/// The snapshots passed in are ignored. Each emit reads the holder's own
/// state, so the driver must move that same state: build it with
/// [`GestureDriver::for_holder`](crate::gesture::GestureDriver::for_holder)
/// or `GestureHandle::spawn_for_holder`. Only the best-effort emits are used
/// because the gesture path never waits on subscribers.
impl MovementListener for JoystickEventsHolder {
    fn on_move_start(&mut self, _snapshot: JoystickSnapshot) {
        if !self.try_emit_start() {
            debug!("Start event had no subscribers");
        }
    }

    fn on_move(&mut self, _snapshot: JoystickSnapshot) {
        self.try_emit_move();
    }

    fn on_hold(&mut self, _snapshot: JoystickSnapshot) {
        self.try_emit_held();
    }

    fn on_move_end(&mut self, _snapshot: JoystickSnapshot) {
        if !self.try_emit_end() {
            debug!("End event had no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Direction;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, JoystickCallbacks) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let on_move = log.clone();
        let on_end = log.clone();
        let callbacks = JoystickCallbacks::new(move |_| on_move.lock().unwrap().push("move"))
            .with_move_end(move |_| on_end.lock().unwrap().push("end"));
        (log, callbacks)
    }

    #[test]
    fn hold_falls_back_to_move() {
        let (log, mut callbacks) = recorder();
        callbacks.on_move_start(JoystickSnapshot::default());
        callbacks.on_hold(JoystickSnapshot::default());
        callbacks.on_move_end(JoystickSnapshot::default());
        assert_eq!(*log.lock().unwrap(), vec!["move", "end"]);
    }

    #[test]
    fn dedicated_hold_callback_wins() {
        let (log, callbacks) = recorder();
        let on_hold = log.clone();
        let mut callbacks = callbacks.with_hold(move |snapshot| {
            assert_eq!(snapshot.direction, Direction::Up);
            on_hold.lock().unwrap().push("hold")
        });

        callbacks.on_hold(JoystickSnapshot {
            direction: Direction::Up,
            ..Default::default()
        });
        assert_eq!(*log.lock().unwrap(), vec!["hold"]);
    }

    #[test]
    fn hold_ticks_can_be_disabled() {
        let (_, callbacks) = recorder();
        assert!(callbacks.listens_for_hold());
        assert!(!callbacks.with_hold_ticks(false).listens_for_hold());
    }
}
