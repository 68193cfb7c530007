//! # UI Common Components and Utilities
//!
//! Shared styling for the demo application and the joystick widget: one dark
//! palette and a frame helper, so every panel looks the same.

use eframe::egui::{Color32, Frame, Stroke};

/// Centralized color palette for the dark theme.
///
/// Background colors go from darkest to lightest: EXTREME_BG → INNER_BG → MAIN_BG.
/// ACTIVE marks a joystick outside its dead zone, INACTIVE a stopped task.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background, also the joystick base (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Deepest background color for the event log (RGB: 20, 20, 20)
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Active status and joystick rim color (RGB: 50, 200, 20) - Green
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Inactive status indicator color (RGB: 200, 50, 20) - Red
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);

    /// Circle and arc knobs (RGB: 220, 40, 40)
    pub const KNOB: Color32 = Color32::from_rgb(220, 40, 40);

    /// Direction wedge, translucent white
    pub const WEDGE: Color32 = Color32::from_rgba_premultiplied(64, 64, 64, 64);
}

/// Creates a styled frame with consistent visual parameters.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}
