//! Gesture state machine using statum
//!
//! Turns a sequence of [`PointerInput`]s into state updates and listener
//! callbacks. Each stage is its own type, so the transitions below are the only
//! ones that can happen:
//!
//! ```text
//! Idle ──down──► Pressed ──move──► Dragging ◄──move── Holding
//!  ▲               │  └────tick────────┼──────tick──────►│
//!  └───up/cancel───┴───────────────────┴─────────────────┘
//! ```
//!
//! [`GestureDriver`] wraps the typed machine for hosts that only learn the
//! current stage at runtime. It is clock agnostic: callers pass `now` and poll
//! for due hold ticks with [`GestureDriver::poll_hold`].

use egui::Pos2;
use statum::{machine, state};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::JoystickError;
use crate::gesture::listener::MovementListener;
use crate::state::{JoystickEventsHolder, SharedState};

/// Default delay between hold ticks
pub const DEFAULT_HOLD_INTERVAL: Duration = Duration::from_millis(175);

/// Raw pointer input in control-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    /// Minimum distance between two move samples before dragging starts
    pub threshold: Option<f32>,
    /// Delay between hold ticks
    pub interval: Duration,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            threshold: None,
            interval: DEFAULT_HOLD_INTERVAL,
        }
    }
}

impl GestureSettings {
    /// A zero interval would make every hold tick due immediately.
    pub fn validate(&self) -> Result<(), JoystickError> {
        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(JoystickError::ConfigError(format!(
                    "threshold must be a non-negative number, got {}",
                    threshold
                )));
            }
        }

        if self.interval.is_zero() {
            return Err(JoystickError::ConfigError(
                "hold interval must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum GestureStage {
    Idle,
    Pressed,
    Dragging,
    Holding,
}

#[machine]
pub struct MovementGesture<S: GestureStage> {
    // Joystick written by this gesture
    joystick: SharedState,

    // Receiver of the per-step snapshots
    listener: Box<dyn MovementListener>,

    settings: GestureSettings,

    // Last position that was applied to the joystick
    current_position: Pos2,

    // Last raw pointer sample, used for threshold checks
    last_sample: Pos2,

    // Set by the first qualifying move, disables the threshold
    dragging: bool,

    hold_deadline: Option<Instant>,
}

impl<S: GestureStage> MovementGesture<S> {
    pub fn joystick(&self) -> &SharedState {
        &self.joystick
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    pub fn hold_deadline(&self) -> Option<Instant> {
        self.hold_deadline
    }

    fn arm_hold(&mut self, now: Instant) {
        self.hold_deadline = if self.listener.listens_for_hold() {
            Some(now + self.settings.interval)
        } else {
            None
        };
    }

    fn hold_due(&self, now: Instant) -> bool {
        self.hold_deadline.is_some_and(|deadline| deadline <= now)
    }

    fn qualifies(&self, position: Pos2) -> bool {
        if self.dragging {
            return true;
        }
        match self.settings.threshold {
            None => true,
            Some(threshold) => (position - self.last_sample).length_sq() >= threshold * threshold,
        }
    }
}

impl MovementGesture<Idle> {
    pub fn create(
        joystick: SharedState,
        listener: Box<dyn MovementListener>,
        settings: GestureSettings,
    ) -> Self {
        debug!("Creating movement gesture with settings: {:?}", settings);
        Self::new(
            joystick,
            listener,
            settings,
            Pos2::ZERO,
            Pos2::ZERO,
            false,
            None,
        )
    }

    /// Pointer went down: jump there, report the start and arm the hold timer.
    pub fn press(mut self, position: Pos2, now: Instant) -> MovementGesture<Pressed> {
        self.current_position = position;
        self.last_sample = position;
        self.dragging = false;

        self.joystick.goto(position);
        let snapshot = self.joystick.snapshot();
        debug!("Gesture started at {:?}: {}", position, snapshot);
        self.listener.on_move_start(snapshot);

        self.arm_hold(now);
        self.transition()
    }
}

// Moves, hold ticks and release behave the same in every active stage
macro_rules! active_stage {
    ($($stage:ident),+) => {
        $(
            impl MovementGesture<$stage> {
                /// Applies a move if it qualifies, otherwise only records the sample.
                pub fn drag(
                    mut self,
                    position: Pos2,
                    now: Instant,
                ) -> Result<MovementGesture<Dragging>, Self> {
                    if !self.qualifies(position) {
                        debug!("Move to {:?} below threshold", position);
                        self.last_sample = position;
                        return Err(self);
                    }

                    self.last_sample = position;
                    self.current_position = position;
                    self.dragging = true;

                    self.joystick.goto(position);
                    self.listener.on_move(self.joystick.snapshot());

                    self.arm_hold(now);
                    Ok(self.transition())
                }

                /// Re-applies the last settled position and reports it as held.
                pub fn hold(mut self, now: Instant) -> MovementGesture<Holding> {
                    self.joystick.goto(self.current_position);
                    let snapshot = self.joystick.snapshot();
                    debug!("Hold tick: {}", snapshot);
                    self.listener.on_hold(snapshot);

                    self.arm_hold(now);
                    self.transition()
                }

                /// Pointer went up or the gesture was cancelled.
                pub fn release(mut self) -> MovementGesture<Idle> {
                    self.hold_deadline = None;
                    self.dragging = false;

                    self.joystick.reset();
                    let snapshot = self.joystick.snapshot();
                    debug!("Gesture ended: {}", snapshot);
                    self.listener.on_move_end(snapshot);

                    self.transition()
                }
            }
        )+
    };
}

active_stage!(Pressed, Dragging, Holding);

/// Stage of a [`GestureDriver`] as a plain value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Pressed,
    Dragging,
    Holding,
}

impl GesturePhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, GesturePhase::Idle)
    }
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Runtime wrapper around [`MovementGesture`] in any stage
pub enum GestureDriver {
    Idle(MovementGesture<Idle>),
    Pressed(MovementGesture<Pressed>),
    Dragging(MovementGesture<Dragging>),
    Holding(MovementGesture<Holding>),
}

impl GestureDriver {
    /// Driver writing to `joystick` and reporting to `listener`.
    ///
    /// A listener that reads its own state, like [`JoystickEventsHolder`], must
    /// wrap this same `joystick`. Use [`GestureDriver::for_holder`] for that case.
    pub fn new(
        joystick: SharedState,
        listener: Box<dyn MovementListener>,
        settings: GestureSettings,
    ) -> Self {
        GestureDriver::Idle(MovementGesture::create(joystick, listener, settings))
    }

    /// Driver that writes to the holder's state and publishes through the holder.
    pub fn for_holder(holder: &JoystickEventsHolder, settings: GestureSettings) -> Self {
        Self::new(holder.state().clone(), Box::new(holder.clone()), settings)
    }

    pub fn phase(&self) -> GesturePhase {
        match self {
            GestureDriver::Idle(_) => GesturePhase::Idle,
            GestureDriver::Pressed(_) => GesturePhase::Pressed,
            GestureDriver::Dragging(_) => GesturePhase::Dragging,
            GestureDriver::Holding(_) => GesturePhase::Holding,
        }
    }

    pub fn joystick(&self) -> &SharedState {
        match self {
            GestureDriver::Idle(gesture) => gesture.joystick(),
            GestureDriver::Pressed(gesture) => gesture.joystick(),
            GestureDriver::Dragging(gesture) => gesture.joystick(),
            GestureDriver::Holding(gesture) => gesture.joystick(),
        }
    }

    /// When the next hold tick is due, if one is armed
    pub fn next_hold_deadline(&self) -> Option<Instant> {
        match self {
            GestureDriver::Idle(_) => None,
            GestureDriver::Pressed(gesture) => gesture.hold_deadline(),
            GestureDriver::Dragging(gesture) => gesture.hold_deadline(),
            GestureDriver::Holding(gesture) => gesture.hold_deadline(),
        }
    }

    /// Feeds one pointer input. Inputs that make no sense in the current stage
    /// are dropped.
    pub fn handle(self, input: PointerInput, now: Instant) -> Self {
        match (self, input) {
            (GestureDriver::Idle(gesture), PointerInput::Down(position)) => {
                GestureDriver::Pressed(gesture.press(position, now))
            }
            (GestureDriver::Idle(gesture), other) => {
                debug!("Ignoring {:?} without an active gesture", other);
                GestureDriver::Idle(gesture)
            }

            (GestureDriver::Pressed(gesture), PointerInput::Move(position)) => {
                settle(gesture.drag(position, now), GestureDriver::Pressed)
            }
            (GestureDriver::Dragging(gesture), PointerInput::Move(position)) => {
                settle(gesture.drag(position, now), GestureDriver::Dragging)
            }
            (GestureDriver::Holding(gesture), PointerInput::Move(position)) => {
                settle(gesture.drag(position, now), GestureDriver::Holding)
            }

            (GestureDriver::Pressed(gesture), PointerInput::Up(_) | PointerInput::Cancel) => {
                GestureDriver::Idle(gesture.release())
            }
            (GestureDriver::Dragging(gesture), PointerInput::Up(_) | PointerInput::Cancel) => {
                GestureDriver::Idle(gesture.release())
            }
            (GestureDriver::Holding(gesture), PointerInput::Up(_) | PointerInput::Cancel) => {
                GestureDriver::Idle(gesture.release())
            }

            (active, PointerInput::Down(position)) => {
                warn!(
                    "Second pointer down at {:?} while {}, ignoring",
                    position,
                    active.phase()
                );
                active
            }
        }
    }

    /// Fires the hold tick if its deadline has passed.
    pub fn poll_hold(self, now: Instant) -> Self {
        match self {
            GestureDriver::Pressed(gesture) if gesture.hold_due(now) => {
                GestureDriver::Holding(gesture.hold(now))
            }
            GestureDriver::Dragging(gesture) if gesture.hold_due(now) => {
                GestureDriver::Holding(gesture.hold(now))
            }
            GestureDriver::Holding(gesture) if gesture.hold_due(now) => {
                GestureDriver::Holding(gesture.hold(now))
            }
            other => other,
        }
    }

    /// Ends an active gesture as if the pointer was cancelled.
    pub fn cancel(self) -> Self {
        self.handle(PointerInput::Cancel, Instant::now())
    }
}

fn settle<S: GestureStage>(
    moved: Result<MovementGesture<Dragging>, MovementGesture<S>>,
    stay: fn(MovementGesture<S>) -> GestureDriver,
) -> GestureDriver {
    match moved {
        Ok(gesture) => GestureDriver::Dragging(gesture),
        Err(gesture) => stay(gesture),
    }
}
