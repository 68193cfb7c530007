//! Multicast distribution of joystick events
//!
//! Wraps a [`SharedState`] and a bounded [`broadcast`] buffer of
//! [`JoystickEvent`]s. Every subscriber reads at its own pace through its own
//! cursor. When a subscriber falls more than [`EVENT_BUFFER_CAPACITY`] events
//! behind, the oldest events are dropped for it and it resumes from the oldest
//! retained one. The producer never waits for consumers.
//!
//! # Emission modes
//!
//! - `try_emit_*`: best-effort, for the gesture hot path. Never waits.
//! - `emit_*`: reliable, async. The event is in the buffer when the future
//!   completes and the caller yields once so consumers can run. Meant for
//!   scripted sequences that await completion, such as
//!   [`JoystickEventsHolder::goto_with_reset`].
//!
//! Both build the snapshot from the state at call time.

use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::control::Direction;
use crate::error::JoystickError;
use crate::state::event::JoystickEvent;
use crate::state::shared_state::SharedState;

/// Number of events retained for slow subscribers
pub const EVENT_BUFFER_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct JoystickEventsHolder {
    state: SharedState,
    events: broadcast::Sender<JoystickEvent>,
}

impl JoystickEventsHolder {
    pub fn new(state: SharedState) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_CAPACITY);
        info!(
            "Created joystick events holder with buffer capacity {}",
            EVENT_BUFFER_CAPACITY
        );
        Self { state, events }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// New subscriber, starting with the next emitted event
    pub fn subscribe(&self) -> broadcast::Receiver<JoystickEvent> {
        debug!("New subscriber to joystick events");
        self.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Pushes an event into the buffer. Returns the number of subscribers reached.
    pub(crate) fn publish(&self, event: JoystickEvent) -> usize {
        match self.events.send(event) {
            Ok(receivers) => {
                debug!("Published {} to {} subscribers", event, receivers);
                receivers
            }
            Err(_) => {
                debug!("No subscribers for {}", event.name());
                0
            }
        }
    }

    pub fn try_emit_start(&self) -> bool {
        let event = self.state.read().to_start_event();
        self.publish(event) > 0
    }

    pub fn try_emit_move(&self) -> bool {
        let event = self.state.read().to_move_event();
        self.publish(event) > 0
    }

    pub fn try_emit_end(&self) -> bool {
        let event = self.state.read().to_end_event();
        self.publish(event) > 0
    }

    pub fn try_emit_held(&self) -> bool {
        let event = self.state.read().to_held_event();
        self.publish(event) > 0
    }

    pub async fn emit_start(&self) {
        self.try_emit_start();
        tokio::task::yield_now().await;
    }

    pub async fn emit_move(&self) {
        self.try_emit_move();
        tokio::task::yield_now().await;
    }

    pub async fn emit_end(&self) {
        self.try_emit_end();
        tokio::task::yield_now().await;
    }

    pub async fn emit_held(&self) {
        self.try_emit_held();
        tokio::task::yield_now().await;
    }

    /// Scripted gesture towards `direction`: Start, wait `interval`, reset, End.
    pub async fn goto_with_reset(
        &self,
        direction: Direction,
        strength: f32,
        interval: Duration,
    ) -> Result<(), JoystickError> {
        let target = self.state.get_position(direction, strength)?;
        if self.subscriber_count() == 0 {
            warn!("Running scripted gesture {} without subscribers", direction);
        }

        self.state.goto(target);
        self.emit_start().await;

        tokio::time::sleep(interval).await;

        self.state.reset();
        self.emit_end().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::snapshot::JoystickSnapshot;
    use egui::{Pos2, Vec2};
    use tokio::sync::broadcast::error::TryRecvError;

    fn holder_200() -> JoystickEventsHolder {
        let state = SharedState::default();
        state.set_size(Vec2::splat(200.0));
        state.reset();
        JoystickEventsHolder::new(state)
    }

    #[test]
    fn emission_without_subscribers_is_silent() {
        let holder = holder_200();
        assert!(!holder.try_emit_start());
        assert!(!holder.try_emit_end());
    }

    #[test]
    fn snapshot_is_taken_at_emission() {
        let holder = holder_200();
        let mut rx = holder.subscribe();

        holder.state().goto(Pos2::new(150.0, 150.0));
        assert!(holder.try_emit_start());
        holder.state().reset();
        assert!(holder.try_emit_end());

        let start = rx.try_recv().unwrap();
        let end = rx.try_recv().unwrap();
        assert!(matches!(start, JoystickEvent::Start(_)));
        assert_eq!(start.snapshot().direction, Direction::DownRight);
        assert!(matches!(end, JoystickEvent::End(s) if s.is_idle()));
    }

    #[test]
    fn overflow_drops_the_oldest_events() {
        let holder = holder_200();
        let mut rx = holder.subscribe();

        for _ in 0..EVENT_BUFFER_CAPACITY + 6 {
            holder.try_emit_move();
        }
        holder.try_emit_end();

        match rx.try_recv() {
            Err(TryRecvError::Lagged(missed)) => assert_eq!(missed, 7),
            other => panic!("expected lag, got {:?}", other),
        }

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        assert_eq!(received.len(), EVENT_BUFFER_CAPACITY);
        assert!(matches!(received.last(), Some(JoystickEvent::End(_))));
    }

    #[test]
    fn each_subscriber_has_its_own_cursor() {
        let holder = holder_200();
        let mut early = holder.subscribe();
        holder.try_emit_start();
        let mut late = holder.subscribe();
        holder.try_emit_held();

        assert!(matches!(early.try_recv(), Ok(JoystickEvent::Start(_))));
        assert!(matches!(early.try_recv(), Ok(JoystickEvent::Held(_))));
        assert!(matches!(late.try_recv(), Ok(JoystickEvent::Held(_))));
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn dropping_the_holder_closes_subscribers() {
        let holder = holder_200();
        let mut rx = holder.subscribe();
        holder.emit_move().await;
        drop(holder);

        assert!(matches!(rx.recv().await, Ok(JoystickEvent::Moving(_))));
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_gesture_emits_start_and_end() {
        let holder = holder_200();
        let mut rx = holder.subscribe();

        holder
            .goto_with_reset(Direction::UpLeft, 1.0, Duration::from_millis(175))
            .await
            .unwrap();

        let start = rx.recv().await.unwrap();
        let end = rx.recv().await.unwrap();
        assert_eq!(start.snapshot().direction, Direction::UpLeft);
        assert!((start.snapshot().strength - 1.0).abs() < 1e-4);
        assert_eq!(
            *end.snapshot(),
            JoystickSnapshot {
                direction: Direction::None,
                position: Some(Pos2::new(100.0, 100.0)),
                strength: 0.0,
                angle: 0.0,
            }
        );
    }

    #[tokio::test]
    async fn scripted_gesture_rejects_bad_strength() {
        let holder = holder_200();
        assert_eq!(
            holder
                .goto_with_reset(Direction::Up, 2.0, Duration::from_millis(1))
                .await,
            Err(JoystickError::InvalidStrength(2.0))
        );
    }
}
