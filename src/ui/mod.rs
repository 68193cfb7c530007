//! # Virtual Joystick User Interface Module
//!
//! Rendering side of the crate: the reusable [`pad::JoystickPad`] widget, the
//! knob painters in [`knob`] and a small eframe application that exercises
//! both.
//!
//! ## Layout
//!
//! The demo application uses the same panel arrangement on every frame:
//! - **Left Panel**: joystick configuration, scripted gestures and sessions
//! - **Central Panel**: the pad, a live readout of the state and the event log
//! - **Bottom Panel**: gesture phase, subscriber count and the last status message
//!
//! ## Backend Communication
//!
//! The UI never blocks on I/O. Session operations are sent to the persistence
//! worker as [`SessionAction`]s together with a oneshot response channel; the
//! receivers are polled with `try_recv` on later frames. Scripted gestures run
//! as tokio tasks on the runtime handle passed in at startup.
//!
//! ## Frame Rate
//!
//! Idle frames are requested every 33ms so the event log keeps up with scripted
//! gestures. While a pointer gesture is active the pad requests continuous
//! repaints itself, because hold ticks are polled from the frame loop.

pub mod common;
pub mod demo_textures;
pub mod event_log;
pub mod knob;
pub mod pad;

use color_eyre::{eyre::eyre, Result};
use eframe::egui::{self, Button, Context, Grid, Slider, TextEdit, Ui, Vec2};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::control::{Direction, DirectionType};
use crate::error::JoystickError;
use crate::geometry::{self, Radius};
use crate::persistence::persistence_worker::SessionAction;
use crate::persistence::JoystickSession;
use crate::state::JoystickEvent;

use self::common::UiColors;
use self::event_log::EventLog;
use self::knob::{KnobImages, KnobStyle};
use self::pad::JoystickPad;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const MAX_PAD_SIZE: Vec2 = Vec2::splat(480.0);

/// Status line shown in the bottom panel
#[derive(Debug, Clone, PartialEq)]
enum StatusMessage {
    Info(String),
    Error(String),
}

/// Demo application around a single [`JoystickPad`].
///
/// Configuration changes that affect the joystick state rebuild the pad, which
/// also resubscribes the event log to the new events holder. Knob style changes
/// only swap the painter.
pub struct JoystickDemoApp {
    config: AppConfig,
    pad: JoystickPad,
    knob_images: KnobImages,

    events: broadcast::Receiver<JoystickEvent>,
    event_log: EventLog,

    /// Runtime that scripted gestures are spawned on
    runtime: Handle,
    scripted: Option<JoinHandle<()>>,
    play_direction: Direction,
    play_strength: f32,

    session_sender: mpsc::Sender<SessionAction>,
    session_name: String,
    available_sessions: Vec<String>,
    pending_save: Option<oneshot::Receiver<Result<()>>>,
    pending_load: Option<oneshot::Receiver<Result<JoystickSession>>>,
    pending_delete: Option<oneshot::Receiver<Result<()>>>,
    pending_list: Option<oneshot::Receiver<Result<Vec<String>>>>,

    status: Option<StatusMessage>,
}

impl JoystickDemoApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Handle,
        session_sender: mpsc::Sender<SessionAction>,
        session_name: String,
        session: JoystickSession,
    ) -> Result<Self, JoystickError> {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let config = AppConfig::default();
        let mut pad = JoystickPad::new(&config.joystick, config.knob)?;
        let knob_images = demo_textures::load(&cc.egui_ctx);
        pad.set_images(knob_images.clone());
        let events = pad.subscribe();

        let mut app = Self {
            config,
            pad,
            knob_images,
            events,
            event_log: EventLog::new(),
            runtime,
            scripted: None,
            play_direction: Direction::Up,
            play_strength: 1.0,
            session_sender,
            session_name,
            available_sessions: Vec::new(),
            pending_save: None,
            pending_load: None,
            pending_delete: None,
            pending_list: None,
            status: None,
        };
        app.apply_session(session);
        app.request_list();
        Ok(app)
    }

    /// Switches to `session`, keeping the current setup if its config is invalid.
    fn apply_session(&mut self, session: JoystickSession) {
        info!("Applying session {}", self.session_name);
        if let Err(e) = session.config.validate() {
            self.set_status(StatusMessage::Error(format!(
                "Session {} has an invalid config: {}",
                self.session_name, e
            )));
            return;
        }
        self.config = session.config;
        if self.rebuild_pad().is_err() {
            return;
        }
        if let Some(position) = session.position {
            self.pad.restore(position);
        }
    }

    fn rebuild_pad(&mut self) -> Result<(), JoystickError> {
        debug!("Rebuilding pad with {:?}", self.config.joystick);
        match JoystickPad::new(&self.config.joystick, self.config.knob) {
            Ok(mut pad) => {
                pad.set_images(self.knob_images.clone());
                self.pad = pad;
                self.events = self.pad.subscribe();
                self.event_log.clear();
                Ok(())
            }
            Err(e) => {
                self.set_status(StatusMessage::Error(format!("Could not rebuild pad: {}", e)));
                Err(e)
            }
        }
    }

    fn set_status(&mut self, status: StatusMessage) {
        match &status {
            StatusMessage::Info(message) => info!("{}", message),
            StatusMessage::Error(message) => error!("{}", message),
        }
        self.status = Some(status);
    }

    fn scripted_running(&self) -> bool {
        self.scripted
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn play(&mut self) {
        if self.scripted_running() {
            warn!("A scripted gesture is already running");
            return;
        }

        let holder = self.pad.holder().clone();
        let direction = self.play_direction;
        let strength = self.play_strength;
        let interval = self.config.joystick.interval();
        info!("Playing {} at strength {:.2} for {:?}", direction, strength, interval);

        self.scripted = Some(self.runtime.spawn(async move {
            if let Err(e) = holder.goto_with_reset(direction, strength, interval).await {
                error!("Scripted gesture failed: {}", e);
            }
        }));
    }

    fn send_action(&mut self, action: SessionAction) -> bool {
        match self.session_sender.try_send(action) {
            Ok(()) => true,
            Err(e) => {
                self.set_status(StatusMessage::Error(format!(
                    "Failed to reach persistence worker: {}",
                    e
                )));
                false
            }
        }
    }

    fn request_save(&mut self) {
        let session = JoystickSession::capture(self.config.clone(), &self.pad.state().read());
        let (response_tx, response_rx) = oneshot::channel();
        let action = SessionAction::Save {
            name: self.session_name.clone(),
            session,
            response_tx,
        };
        if self.send_action(action) {
            self.pending_save = Some(response_rx);
        }
    }

    fn request_load(&mut self) {
        let (response_tx, response_rx) = oneshot::channel();
        let action = SessionAction::Load {
            name: self.session_name.clone(),
            response_tx,
        };
        if self.send_action(action) {
            self.pending_load = Some(response_rx);
        }
    }

    fn request_delete(&mut self) {
        let (response_tx, response_rx) = oneshot::channel();
        let action = SessionAction::Delete {
            name: self.session_name.clone(),
            response_tx,
        };
        if self.send_action(action) {
            self.pending_delete = Some(response_rx);
        }
    }

    fn request_list(&mut self) {
        let (response_tx, response_rx) = oneshot::channel();
        if self.send_action(SessionAction::List { response_tx }) {
            self.pending_list = Some(response_rx);
        }
    }

    fn poll_sessions(&mut self) {
        match poll_response(&mut self.pending_save) {
            Some(Ok(())) => {
                self.set_status(StatusMessage::Info(format!("Saved session {}", self.session_name)));
                self.request_list();
            }
            Some(Err(e)) => self.set_status(StatusMessage::Error(format!("Save failed: {}", e))),
            None => {}
        }

        match poll_response(&mut self.pending_load) {
            Some(Ok(session)) => {
                self.apply_session(session);
                self.set_status(StatusMessage::Info(format!("Loaded session {}", self.session_name)));
            }
            Some(Err(e)) => self.set_status(StatusMessage::Error(format!("Load failed: {}", e))),
            None => {}
        }

        match poll_response(&mut self.pending_delete) {
            Some(Ok(())) => {
                self.set_status(StatusMessage::Info(format!("Deleted session {}", self.session_name)));
                self.request_list();
            }
            Some(Err(e)) => self.set_status(StatusMessage::Error(format!("Delete failed: {}", e))),
            None => {}
        }

        match poll_response(&mut self.pending_list) {
            Some(Ok(sessions)) => self.available_sessions = sessions,
            Some(Err(e)) => {
                self.set_status(StatusMessage::Error(format!("Listing sessions failed: {}", e)))
            }
            None => {}
        }
    }

    fn joystick_settings(&mut self, ui: &mut Ui) {
        ui.heading("Joystick");
        let mut joystick = self.config.joystick;

        egui::ComboBox::from_label("Directions")
            .selected_text(joystick.direction_type.to_string())
            .show_ui(ui, |ui| {
                for direction_type in [DirectionType::Complete, DirectionType::Simple] {
                    ui.selectable_value(
                        &mut joystick.direction_type,
                        direction_type,
                        direction_type.to_string(),
                    );
                }
            });

        match joystick.invalid_radius {
            Radius::Ratio(mut ratio) => {
                if ui
                    .add(Slider::new(&mut ratio, 0.05..=0.95).text("Dead zone"))
                    .changed()
                {
                    joystick.invalid_radius = Radius::Ratio(ratio);
                }
            }
            Radius::Fixed(mut pixels) => {
                if ui
                    .add(Slider::new(&mut pixels, 1.0..=200.0).text("Dead zone px"))
                    .changed()
                {
                    joystick.invalid_radius = Radius::Fixed(pixels);
                }
            }
        }

        let mut use_threshold = joystick.threshold.is_some();
        let mut threshold = joystick.threshold.unwrap_or(4.0);
        ui.horizontal(|ui| {
            ui.checkbox(&mut use_threshold, "Drag threshold");
            ui.add_enabled(
                use_threshold,
                egui::DragValue::new(&mut threshold).range(0.0..=100.0).suffix(" px"),
            );
        });
        joystick.threshold = use_threshold.then_some(threshold);

        ui.add(
            Slider::new(&mut joystick.interval_ms, 50..=1000)
                .text("Hold interval")
                .suffix(" ms"),
        );

        if joystick != self.config.joystick {
            match joystick.validate() {
                Ok(()) => {
                    self.config.joystick = joystick;
                    let _ = self.rebuild_pad();
                }
                Err(e) => self.set_status(StatusMessage::Error(e.to_string())),
            }
        }

        let mut knob = self.config.knob;
        egui::ComboBox::from_label("Knob")
            .selected_text(knob.name())
            .show_ui(ui, |ui| {
                for style in [
                    KnobStyle::default(),
                    KnobStyle::default_arc(),
                    KnobStyle::default_wedge(),
                    KnobStyle::default_image(),
                    KnobStyle::default_directional_image(),
                ] {
                    if ui
                        .selectable_label(knob.name() == style.name(), style.name())
                        .clicked()
                    {
                        knob = style;
                    }
                }
            });
        if knob != self.config.knob {
            self.config.knob = knob;
            self.pad.set_knob(knob);
        }

        ui.checkbox(&mut self.config.persist_position, "Save knob position");
    }

    fn scripted_settings(&mut self, ui: &mut Ui) {
        ui.heading("Scripted gesture");

        egui::ComboBox::from_label("Direction")
            .selected_text(self.play_direction.to_string())
            .show_ui(ui, |ui| {
                for direction in Direction::ALL {
                    ui.selectable_value(&mut self.play_direction, direction, direction.to_string());
                }
            });
        ui.add(Slider::new(&mut self.play_strength, 0.0..=1.0).text("Strength"));

        let running = self.scripted_running();
        if ui.add_enabled(!running, Button::new("Play")).clicked() {
            self.play();
        }
    }

    fn session_settings(&mut self, ui: &mut Ui) {
        ui.heading("Sessions");
        ui.add(TextEdit::singleline(&mut self.session_name).hint_text("Session name"));

        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                self.request_save();
            }
            if ui.button("Load").clicked() {
                self.request_load();
            }
            if ui.button("Delete").clicked() {
                self.request_delete();
            }
            if ui.button("Refresh").clicked() {
                self.request_list();
            }
        });

        common::create_frame(UiColors::INNER_BG, UiColors::BORDER).show(ui, |ui| {
            ui.set_width(ui.available_width());
            if self.available_sessions.is_empty() {
                ui.label("No saved sessions");
            }
            for name in &self.available_sessions {
                if ui
                    .selectable_label(*name == self.session_name, name)
                    .clicked()
                {
                    self.session_name = name.clone();
                }
            }
        });
    }

    fn readout(&self, ui: &mut Ui) {
        let snapshot = self.pad.state().snapshot();
        let state = self.pad.state().read();

        Grid::new("joystick_readout")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("Direction");
                ui.label(snapshot.direction.to_string());
                ui.end_row();

                ui.label("Strength");
                ui.label(format!("{:.2}", snapshot.strength));
                ui.end_row();

                ui.label("Angle");
                ui.label(format!("{:.1}°", snapshot.angle_degrees()));
                ui.end_row();

                ui.label("Position");
                ui.label(format!("({:.1}, {:.1})", state.position().x, state.position().y));
                ui.end_row();

                ui.label("Distance");
                ui.label(format!("{:.1} / {:.1}", state.distance(), state.radius()));
                ui.end_row();
            });
    }

    fn status_bar(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let phase = self.pad.phase();
            let color = if phase.is_active() || self.scripted_running() {
                UiColors::ACTIVE
            } else {
                UiColors::INACTIVE
            };
            ui.colored_label(color, format!("Gesture: {}", phase));
            ui.separator();
            ui.label(format!("Subscribers: {}", self.pad.holder().subscriber_count()));
            ui.separator();
            match &self.status {
                Some(StatusMessage::Info(message)) => {
                    ui.label(message);
                }
                Some(StatusMessage::Error(message)) => {
                    ui.colored_label(UiColors::INACTIVE, message);
                }
                None => {}
            }
        });
    }
}

impl eframe::App for JoystickDemoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.event_log.drain(&mut self.events);
        self.poll_sessions();

        egui::SidePanel::left("settings_panel")
            .resizable(false)
            .min_width(240.0)
            .frame(common::create_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| {
                self.joystick_settings(ui);
                ui.separator();
                self.scripted_settings(ui);
                ui.separator();
                self.session_settings(ui);
            });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = Vec2::new(ui.available_width() * 0.55, ui.available_height());
            let side = geometry::clamp_size_to_max(available, Some(MAX_PAD_SIZE)).min_elem();
            ui.horizontal_top(|ui| {
                self.pad.show(ui, side);
                ui.vertical(|ui| {
                    self.readout(ui);
                    ui.separator();
                    self.event_log.show(ui);
                });
            });
        });

        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}

/// Takes the response out of `slot` once the worker has answered.
fn poll_response<T>(slot: &mut Option<oneshot::Receiver<Result<T>>>) -> Option<Result<T>> {
    let receiver = slot.as_mut()?;
    match receiver.try_recv() {
        Ok(result) => {
            *slot = None;
            Some(result)
        }
        Err(oneshot::error::TryRecvError::Empty) => None,
        Err(oneshot::error::TryRecvError::Closed) => {
            *slot = None;
            Some(Err(eyre!("Persistence worker dropped the request")))
        }
    }
}
