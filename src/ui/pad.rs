//! egui widget for one joystick
//!
//! [`JoystickPad`] owns the shared state, its events holder and a
//! [`GestureDriver`] that publishes through the holder. Each frame it syncs the
//! state size with the allocated rect, translates the egui pointer into
//! [`PointerInput`]s, polls hold ticks and paints background and knob.

use eframe::egui::{self, Pos2, Response, Sense, Ui, Vec2};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::JoystickConfig;
use crate::error::JoystickError;
use crate::gesture::{GestureDriver, GesturePhase, PointerInput};
use crate::state::{JoystickEvent, JoystickEventsHolder, SavedPosition, SharedState};
use crate::ui::knob::{self, KnobImages, KnobStyle};

pub struct JoystickPad {
    holder: JoystickEventsHolder,
    // Only `None` while a transition is in flight
    driver: Option<GestureDriver>,
    knob: KnobStyle,
    images: KnobImages,
    // Position to apply once the first layout size is known
    pending_restore: Option<SavedPosition>,
    last_pointer: Option<Pos2>,
}

impl JoystickPad {
    pub fn new(config: &JoystickConfig, knob: KnobStyle) -> Result<Self, JoystickError> {
        info!("Creating joystick pad with config: {:?}", config);
        let settings = config.gesture_settings();
        settings.validate()?;
        let state = SharedState::new(config.build_state()?);
        let holder = JoystickEventsHolder::new(state);
        let driver = GestureDriver::for_holder(&holder, settings);

        Ok(Self {
            holder,
            driver: Some(driver),
            knob,
            images: KnobImages::default(),
            pending_restore: None,
            last_pointer: None,
        })
    }

    pub fn state(&self) -> &SharedState {
        self.holder.state()
    }

    pub fn holder(&self) -> &JoystickEventsHolder {
        &self.holder
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JoystickEvent> {
        self.holder.subscribe()
    }

    pub fn knob(&self) -> KnobStyle {
        self.knob
    }

    pub fn set_knob(&mut self, knob: KnobStyle) {
        self.knob = knob;
    }

    /// Textures used by the image knob styles.
    pub fn set_images(&mut self, images: KnobImages) {
        self.images = images;
    }

    pub fn phase(&self) -> GesturePhase {
        self.driver
            .as_ref()
            .map_or(GesturePhase::Idle, GestureDriver::phase)
    }

    /// Moves to `saved` now, or as soon as the pad has been laid out.
    pub fn restore(&mut self, saved: SavedPosition) {
        if self.state().read().size().min_elem() > 0.0 {
            self.state().goto(saved.into());
        } else {
            debug!("Deferring position restore until layout: {:?}", saved);
            self.pending_restore = Some(saved);
        }
    }

    /// Stores a new layout size, then re-validates the position.
    pub fn sync_size(&mut self, size: Vec2) {
        let state = self.state().clone();
        if !state.set_size(size) {
            return;
        }
        match self.pending_restore.take() {
            Some(saved) => {
                debug!("Restoring position {:?} after layout", saved);
                state.goto(saved.into());
            }
            None => {
                state.reset();
            }
        }
    }

    fn feed(&mut self, input: PointerInput, now: Instant) {
        if let Some(driver) = self.driver.take() {
            self.driver = Some(driver.handle(input, now));
        }
    }

    /// Turns the pointer state of one frame into driver input.
    ///
    /// `pointer` is in pad-local coordinates.
    pub fn track_pointer(&mut self, pressed: bool, pointer: Option<Pos2>, now: Instant) {
        let active = self.phase().is_active();

        if pressed {
            if let Some(local) = pointer {
                if !active {
                    self.feed(PointerInput::Down(local), now);
                } else if self.last_pointer != Some(local) {
                    self.feed(PointerInput::Move(local), now);
                }
                self.last_pointer = Some(local);
            }
        } else if active {
            let last = self
                .last_pointer
                .take()
                .unwrap_or_else(|| self.state().read().center());
            self.feed(PointerInput::Up(last), now);
        }

        if let Some(driver) = self.driver.take() {
            self.driver = Some(driver.poll_hold(now));
        }
    }

    pub fn show(&mut self, ui: &mut Ui, side: f32) -> Response {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(side), Sense::drag());
        self.sync_size(rect.size());

        let pointer = response
            .interact_pointer_pos()
            .map(|position| (position - rect.min).to_pos2());
        self.track_pointer(response.is_pointer_button_down_on(), pointer, Instant::now());

        let painter = ui.painter_at(rect);
        {
            let state = self.state().read();
            knob::paint_background(&painter, rect.min, &state);
            self.knob.paint(&painter, rect.min, &state, &self.images);
        }

        if self.phase().is_active() {
            // hold ticks are polled from the frame loop
            ui.ctx().request_repaint();
        }

        response
    }
}

impl egui::Widget for &mut JoystickPad {
    fn ui(self, ui: &mut Ui) -> Response {
        let side = ui.available_size().min_elem();
        self.show(ui, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Direction;
    use crate::gesture::DEFAULT_HOLD_INTERVAL;
    use tokio::sync::broadcast::error::TryRecvError;

    fn pad() -> JoystickPad {
        let mut pad = JoystickPad::new(&JoystickConfig::default(), KnobStyle::default()).unwrap();
        pad.sync_size(Vec2::splat(200.0));
        pad
    }

    #[test]
    fn layout_centers_the_knob() {
        let pad = pad();
        assert!(pad.state().read().is_centered());
        assert_eq!(pad.state().read().center(), Pos2::new(100.0, 100.0));
    }

    #[test]
    fn restore_waits_for_layout() {
        let mut pad = JoystickPad::new(&JoystickConfig::default(), KnobStyle::default()).unwrap();
        pad.restore(SavedPosition { x: 40.0, y: 100.0 });
        assert_eq!(pad.state().read().position(), Pos2::ZERO);

        pad.sync_size(Vec2::splat(200.0));
        assert_eq!(pad.state().read().position(), Pos2::new(40.0, 100.0));
        assert_eq!(pad.state().snapshot().direction, Direction::Left);

        // later resizes recenter
        pad.sync_size(Vec2::splat(300.0));
        assert!(pad.state().read().is_centered());
    }

    #[test]
    fn invalid_config_builds_no_pad() {
        let mut config = JoystickConfig::default();
        config.interval_ms = 0;
        assert!(JoystickPad::new(&config, KnobStyle::default()).is_err());

        let mut config = JoystickConfig::default();
        config.invalid_radius = crate::geometry::Radius::Ratio(1.5);
        assert!(JoystickPad::new(&config, KnobStyle::default()).is_err());
    }

    #[test]
    fn pointer_frames_become_events() {
        let mut pad = pad();
        let mut events = pad.subscribe();
        let now = Instant::now();

        pad.track_pointer(true, Some(Pos2::new(150.0, 150.0)), now);
        pad.track_pointer(true, Some(Pos2::new(150.0, 150.0)), now);
        pad.track_pointer(true, Some(Pos2::new(300.0, 300.0)), now);
        pad.track_pointer(false, None, now);

        let names: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|event| event.name())
            .collect();
        assert_eq!(names, vec!["Start", "Moving", "End"]);
        assert_eq!(pad.phase(), GesturePhase::Idle);
        assert!(pad.state().read().is_centered());
    }

    #[test]
    fn frames_poll_hold_ticks() {
        let mut pad = pad();
        let mut events = pad.subscribe();
        let start = Instant::now();

        pad.track_pointer(true, Some(Pos2::new(100.0, 10.0)), start);
        pad.track_pointer(true, Some(Pos2::new(100.0, 10.0)), start + DEFAULT_HOLD_INTERVAL);

        assert!(matches!(events.try_recv(), Ok(JoystickEvent::Start(_))));
        assert!(matches!(events.try_recv(), Ok(JoystickEvent::Held(s)) if s.direction == Direction::Up));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(pad.phase(), GesturePhase::Holding);
    }
}
