use chrono::{DateTime, Local};
use eframe::egui::{RichText, ScrollArea, Ui};
use std::collections::VecDeque;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use super::common::{create_frame, UiColors};
use crate::state::JoystickEvent;

pub const EVENT_LOG_CAPACITY: usize = 200;

/// Bounded, timestamped history of the events one subscriber received
#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<(DateTime<Local>, JoystickEvent)>,
    missed: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &(DateTime<Local>, JoystickEvent)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Events the buffer overwrote before this log could read them
    pub fn missed(&self) -> u64 {
        self.missed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.missed = 0;
    }

    pub fn push(&mut self, event: JoystickEvent) {
        if self.entries.len() == EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back((Local::now(), event));
    }

    /// Takes everything currently buffered for `receiver` without waiting.
    ///
    /// Returns the number of events added.
    pub fn drain(&mut self, receiver: &mut broadcast::Receiver<JoystickEvent>) -> usize {
        let mut added = 0;
        loop {
            match receiver.try_recv() {
                Ok(event) => {
                    self.push(event);
                    added += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Event log lagged behind, {} events were dropped", skipped);
                    self.missed += skipped;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        added
    }

    pub fn show(&self, ui: &mut Ui) {
        create_frame(UiColors::EXTREME_BG, UiColors::BORDER).show(ui, |ui| {
            ui.set_width(ui.available_width());
            if self.missed > 0 {
                ui.colored_label(UiColors::INACTIVE, format!("{} events missed", self.missed));
            }
            ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (received_at, event) in &self.entries {
                        ui.label(
                            RichText::new(format!(
                                "{} {:<6} {}",
                                received_at.format("%H:%M:%S%.3f"),
                                event.name(),
                                event.snapshot()
                            ))
                            .monospace(),
                        );
                    }
                });
        });
    }
}
