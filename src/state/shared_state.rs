//! Shared access to one joystick's state
//!
//! The gesture driver (or programmatic `goto`/`reset` calls) is the only writer.
//! Renderers and the events holder only read. The state sits in a
//! [`tokio::sync::watch`] channel: every borrow sees one consistent
//! position/size pair, and subscribers are woken only when a write actually
//! changed something.

use egui::{Pos2, Vec2};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::control::Direction;
use crate::error::JoystickError;
use crate::state::joystick_state::JoystickState;
use crate::state::snapshot::JoystickSnapshot;

/// Cloneable handle to a joystick state living in a watch channel
#[derive(Debug, Clone)]
pub struct SharedState {
    sender: Arc<watch::Sender<JoystickState>>,
}

impl SharedState {
    pub fn new(state: JoystickState) -> Self {
        let (sender, _) = watch::channel(state);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Receiver that is notified whenever the position or size changes
    pub fn subscribe(&self) -> watch::Receiver<JoystickState> {
        self.sender.subscribe()
    }

    /// Read guard on the current state. Keep it short-lived, writers wait on it.
    pub fn read(&self) -> watch::Ref<'_, JoystickState> {
        self.sender.borrow()
    }

    pub fn snapshot(&self) -> JoystickSnapshot {
        self.sender.borrow().snapshot()
    }

    /// Applies `update` and notifies subscribers if it reports a change.
    pub fn modify<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut JoystickState) -> bool,
    {
        self.sender.send_if_modified(update)
    }

    pub fn goto(&self, target: Pos2) -> bool {
        self.modify(|state| state.goto(target))
    }

    pub fn reset(&self) -> bool {
        self.modify(|state| state.reset())
    }

    pub fn set_size(&self, size: Vec2) -> bool {
        self.modify(|state| state.set_size(size))
    }

    pub fn get_position(&self, direction: Direction, strength: f32) -> Result<Pos2, JoystickError> {
        self.read().get_position(direction, strength)
    }

    pub fn goto_direction(&self, direction: Direction, strength: f32) -> Result<bool, JoystickError> {
        let target = self.get_position(direction, strength)?;
        Ok(self.goto(target))
    }

    /// Scripted gesture: move to `target`, report start, wait `interval`,
    /// reset and report the end.
    pub async fn goto_with_reset<S, E>(
        &self,
        target: Pos2,
        on_start: S,
        on_end: E,
        interval: Duration,
    ) where
        S: FnOnce(JoystickSnapshot),
        E: FnOnce(JoystickSnapshot),
    {
        debug!("Scripted move to {:?} for {:?}", target, interval);
        self.goto(target);
        on_start(self.snapshot());

        tokio::time::sleep(interval).await;

        self.reset();
        on_end(self.snapshot());
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(JoystickState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn shared_200() -> SharedState {
        let shared = SharedState::default();
        shared.set_size(Vec2::splat(200.0));
        shared.reset();
        shared
    }

    #[tokio::test]
    async fn subscribers_see_only_real_changes() {
        let shared = shared_200();
        let mut rx = shared.subscribe();
        rx.borrow_and_update();

        assert!(!shared.reset());
        assert!(!rx.has_changed().unwrap());

        assert!(shared.goto(Pos2::new(150.0, 100.0)));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().direction(), Direction::Right);
    }

    #[tokio::test]
    async fn clones_share_one_state() {
        let shared = shared_200();
        let reader = shared.clone();
        shared.goto_direction(Direction::Up, 1.0).unwrap();
        assert_eq!(reader.snapshot().direction, Direction::Up);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_gesture_starts_then_resets() {
        let shared = shared_200();
        let seen = Mutex::new(Vec::new());
        let target = shared.get_position(Direction::Down, 1.0).unwrap();

        let started_at = tokio::time::Instant::now();
        shared
            .goto_with_reset(
                target,
                |snapshot| seen.lock().unwrap().push(snapshot),
                |snapshot| seen.lock().unwrap().push(snapshot),
                Duration::from_millis(175),
            )
            .await;

        assert!(started_at.elapsed() >= Duration::from_millis(175));
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].direction, Direction::Down);
        assert_eq!(seen[0].strength, 1.0);
        assert!(seen[1].is_idle());
        assert!(shared.read().is_centered());
    }
}
