//! Knob painters
//!
//! Each [`KnobStyle`] is split into a pure geometry step, working in
//! control-local coordinates from a [`JoystickState`], and a thin painting
//! step that translates the result into the widget rect and hands it to an
//! [`egui::Painter`]. egui only fills convex polygons, so concave outlines are
//! painted as several convex pieces or as thick strokes.
//!
//! Image knobs draw textures owned by the application, handed in as
//! [`KnobImages`]. Only the style is part of the configuration.

use egui::{pos2, Color32, Painter, Pos2, Rect, Shape, Stroke, TextureHandle, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::control::{Direction, DirectionType};
use crate::error::JoystickError;
use crate::geometry::{self, Radius};
use crate::state::JoystickState;
use crate::ui::common::UiColors;

// Segments used per 90° of arc
const ARC_SEGMENTS_PER_QUARTER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    /// Follow the position as is
    Normal,
    /// Keep the whole knob inside the control
    #[default]
    Clamped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WedgeMode {
    /// Annular sector between the inner and outer circle
    #[default]
    Curve,
    /// Sector closed by a straight chord at the inner radius
    Straight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeMode {
    /// Stretch over the whole control
    #[default]
    AutoSize,
    /// Keep the texture's own size
    Absolute,
}

/// How the knob is drawn on top of the background
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KnobStyle {
    /// Filled circle following the position
    Circle { radius: Radius, mode: DrawMode },
    /// Arc on the rim centered on the current angle, with an arrow
    Arc {
        sweep_angle: f32,
        stroke_width: f32,
        mode: DrawMode,
    },
    /// Highlighted direction slice
    Wedge { inner_radius: Radius, mode: WedgeMode },
    /// Texture following the position, fitted into a square of side `2 * radius`
    Image { radius: Radius, mode: DrawMode },
    /// Textures picked by the current direction, centered on the control
    DirectionalImage { mode: SizeMode },
}

impl Default for KnobStyle {
    fn default() -> Self {
        KnobStyle::Circle {
            radius: Radius::Ratio(0.2),
            mode: DrawMode::Clamped,
        }
    }
}

impl KnobStyle {
    pub fn default_arc() -> Self {
        KnobStyle::Arc {
            sweep_angle: 90.0,
            stroke_width: 12.0,
            mode: DrawMode::Clamped,
        }
    }

    pub fn default_wedge() -> Self {
        KnobStyle::Wedge {
            inner_radius: Radius::Ratio(0.2),
            mode: WedgeMode::Curve,
        }
    }

    pub fn default_image() -> Self {
        KnobStyle::Image {
            radius: Radius::Ratio(0.3),
            mode: DrawMode::Clamped,
        }
    }

    pub fn default_directional_image() -> Self {
        KnobStyle::DirectionalImage {
            mode: SizeMode::AutoSize,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KnobStyle::Circle { .. } => "Circle",
            KnobStyle::Arc { .. } => "Arc",
            KnobStyle::Wedge { .. } => "Wedge",
            KnobStyle::Image { .. } => "Image",
            KnobStyle::DirectionalImage { .. } => "Directional image",
        }
    }

    pub fn validate(&self) -> Result<(), JoystickError> {
        match self {
            KnobStyle::Circle { radius, .. } => radius.validate(),
            KnobStyle::Arc {
                sweep_angle,
                stroke_width,
                ..
            } => {
                if !(*sweep_angle > 0.0 && *sweep_angle <= 360.0) {
                    return Err(JoystickError::ConfigError(format!(
                        "arc sweep must be in (0, 360], got {}",
                        sweep_angle
                    )));
                }
                if !(*stroke_width > 0.0 && stroke_width.is_finite()) {
                    return Err(JoystickError::ConfigError(format!(
                        "arc stroke width must be positive, got {}",
                        stroke_width
                    )));
                }
                Ok(())
            }
            KnobStyle::Wedge { inner_radius, .. } => inner_radius.validate(),
            KnobStyle::Image { radius, .. } => radius.validate(),
            KnobStyle::DirectionalImage { .. } => Ok(()),
        }
    }

    /// Paints the knob for `state` into a widget whose top-left corner is `origin`.
    pub fn paint(&self, painter: &Painter, origin: Pos2, state: &JoystickState, images: &KnobImages) {
        let to_screen = |p: Pos2| origin + p.to_vec2();

        match *self {
            KnobStyle::Circle { radius, mode } => {
                let knob_radius = radius.resolve(state.radius());
                let center = circle_knob_center(state, knob_radius, mode);
                painter.circle_filled(to_screen(center), knob_radius, UiColors::KNOB);
            }
            KnobStyle::Image { radius, mode } => {
                let knob_radius = radius.resolve(state.radius());
                match images.knob() {
                    Some(texture) => {
                        let rect = image_rect(state, texture.size_vec2(), knob_radius, mode);
                        paint_texture(painter, texture, rect.translate(origin.to_vec2()));
                    }
                    None => {
                        let center = circle_knob_center(state, knob_radius, mode);
                        painter.circle_filled(to_screen(center), knob_radius, UiColors::KNOB);
                    }
                }
            }
            KnobStyle::DirectionalImage { mode } => {
                for texture in images.for_direction(state.direction()) {
                    let rect = directional_image_rect(state, texture.size_vec2(), mode);
                    paint_texture(painter, texture, rect.translate(origin.to_vec2()));
                }
            }
            KnobStyle::Arc {
                sweep_angle,
                stroke_width,
                mode,
            } => {
                if let Some(arc) = arc_knob(state, sweep_angle, stroke_width, mode) {
                    let points = arc.rim.into_iter().map(to_screen).collect();
                    painter.add(Shape::line(points, Stroke::new(stroke_width, UiColors::KNOB)));
                    for triangle in arc.arrow.triangles() {
                        painter.add(Shape::convex_polygon(
                            triangle.into_iter().map(to_screen).collect(),
                            UiColors::KNOB,
                            Stroke::NONE,
                        ));
                    }
                }
            }
            KnobStyle::Wedge { inner_radius, mode } => {
                let inner = inner_radius.resolve(state.radius());
                match wedge_shape(state, inner, mode) {
                    Some(WedgeShape::Band { points, width }) => {
                        let points = points.into_iter().map(to_screen).collect();
                        painter.add(Shape::line(points, Stroke::new(width, UiColors::WEDGE)));
                    }
                    Some(WedgeShape::Sector(points)) => {
                        painter.add(Shape::convex_polygon(
                            points.into_iter().map(to_screen).collect(),
                            UiColors::WEDGE,
                            Stroke::NONE,
                        ));
                    }
                    None => {}
                }
            }
        }
    }
}

/// Textures for the image knob styles
#[derive(Clone, Default)]
pub struct KnobImages {
    knob: Option<TextureHandle>,
    directional: HashMap<Direction, Vec<TextureHandle>>,
}

impl KnobImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_knob(mut self, texture: TextureHandle) -> Self {
        self.knob = Some(texture);
        self
    }

    /// Adds a texture drawn while the joystick reports `direction`.
    pub fn with_direction(mut self, direction: Direction, texture: TextureHandle) -> Self {
        self.directional.entry(direction).or_default().push(texture);
        self
    }

    pub fn knob(&self) -> Option<&TextureHandle> {
        self.knob.as_ref()
    }

    pub fn for_direction(&self, direction: Direction) -> &[TextureHandle] {
        self.directional
            .get(&direction)
            .map_or(&[], |textures| textures.as_slice())
    }
}

fn paint_texture(painter: &Painter, texture: &TextureHandle, rect: Rect) {
    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    painter.image(texture.id(), rect, uv, Color32::WHITE);
}

/// Where an image knob is drawn.
///
/// The texture is scaled down to fit a square of side `2 * knob_radius`, then
/// placed like a circle knob whose radius is half its larger side.
pub fn image_rect(state: &JoystickState, texture_size: Vec2, knob_radius: f32, mode: DrawMode) -> Rect {
    let size = geometry::clamp_size_to_max(texture_size, Some(Vec2::splat(2.0 * knob_radius)));
    let center = circle_knob_center(state, size.max_elem() / 2.0, mode);
    Rect::from_center_size(center, size)
}

/// Where a directional image is drawn, always centered on the control.
pub fn directional_image_rect(state: &JoystickState, texture_size: Vec2, mode: SizeMode) -> Rect {
    let size = match mode {
        SizeMode::AutoSize => state.size(),
        SizeMode::Absolute => texture_size,
    };
    Rect::from_center_size(state.center(), size)
}

/// Center of a circle knob of `knob_radius`.
///
/// In clamped mode the knob center is kept within `radius - knob_radius` of
/// the control center so the knob never leaves the control.
pub fn circle_knob_center(state: &JoystickState, knob_radius: f32, mode: DrawMode) -> Pos2 {
    match mode {
        DrawMode::Normal => state.position(),
        DrawMode::Clamped => {
            let limit = (state.radius() - knob_radius).max(0.0);
            let offset = state.offset();
            if offset.length_sq() > limit * limit {
                state.center() + geometry::parametrize(offset, limit)
            } else {
                state.position()
            }
        }
    }
}

/// Points along a circular arc of `sweep_degrees` starting at `start_degrees`.
pub fn arc_points(center: Pos2, radius: f32, start_degrees: f32, sweep_degrees: f32) -> Vec<Pos2> {
    let segments = ((sweep_degrees.abs() / 90.0) * ARC_SEGMENTS_PER_QUARTER as f32)
        .ceil()
        .max(1.0) as usize;
    let start = start_degrees.to_radians();
    let step = sweep_degrees.to_radians() / segments as f32;

    (0..=segments)
        .map(|i| center + geometry::parametrize_at(radius, start + step * i as f32))
        .collect()
}

/// Arrowhead outline: tip, right wing, notch, left wing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub points: [Pos2; 4],
}

impl Arrow {
    /// Arrow with its tip at `tip`, wings `length` long, rotated by
    /// `rotate_degrees` around the tip. Unrotated it points down.
    pub fn new(tip: Pos2, length: f32, rotate_degrees: f32) -> Self {
        let (sin, cos) = rotate_degrees.to_radians().sin_cos();
        let rotate = |v: Vec2| tip + Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
        Self {
            points: [
                tip,
                rotate(Vec2::new(length, -length)),
                rotate(Vec2::new(0.0, -length / 2.0)),
                rotate(Vec2::new(-length, -length)),
            ],
        }
    }

    // The notch makes the outline concave
    pub fn triangles(&self) -> [[Pos2; 3]; 2] {
        let [tip, right, notch, left] = self.points;
        [[tip, right, notch], [tip, notch, left]]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcKnob {
    pub rim: Vec<Pos2>,
    pub arrow: Arrow,
}

/// Geometry of the arc knob, `None` while the position is in the dead zone.
pub fn arc_knob(
    state: &JoystickState,
    sweep_angle: f32,
    stroke_width: f32,
    mode: DrawMode,
) -> Option<ArcKnob> {
    if !state.is_valid() {
        return None;
    }

    let radius = match mode {
        DrawMode::Normal => state.radius(),
        DrawMode::Clamped => state.radius() - stroke_width * 2.0,
    };
    let angle = state.angle();
    let degrees = angle.to_degrees();

    let rim = arc_points(state.center(), radius, degrees - sweep_angle / 2.0, sweep_angle);
    let tip = state.center() + geometry::parametrize_at(radius + stroke_width, angle);
    let arrow = Arrow::new(tip, stroke_width, degrees - 90.0);

    Some(ArcKnob { rim, arrow })
}

#[derive(Debug, Clone, PartialEq)]
pub enum WedgeShape {
    /// Convex outline to fill
    Sector(Vec<Pos2>),
    /// Arc through the middle of an annular sector, stroked with `width`
    Band { points: Vec<Pos2>, width: f32 },
}

/// Geometry of the slice of the current direction, `None` for no direction.
pub fn wedge_shape(state: &JoystickState, inner_radius: f32, mode: WedgeMode) -> Option<WedgeShape> {
    let direction_type = state.direction_type();
    let quadrant = state.direction().to_quadrant_for(direction_type);
    if quadrant == 0 {
        return None;
    }

    Some(wedge_for_quadrant(
        state.center(),
        quadrant,
        direction_type,
        state.radius(),
        inner_radius.max(0.0),
        mode,
    ))
}

pub fn wedge_for_quadrant(
    center: Pos2,
    quadrant: u8,
    direction_type: DirectionType,
    outer_radius: f32,
    inner_radius: f32,
    mode: WedgeMode,
) -> WedgeShape {
    let sweep = direction_type.sweep_angle();
    let start = f32::from(quadrant - 1) * sweep - sweep / 2.0;
    let inner_radius = inner_radius.min(outer_radius);

    if inner_radius > 0.0 && mode == WedgeMode::Curve {
        let middle = (outer_radius + inner_radius) / 2.0;
        return WedgeShape::Band {
            points: arc_points(center, middle, start, sweep),
            width: outer_radius - inner_radius,
        };
    }

    let mut outline = arc_points(center, outer_radius, start, sweep);
    if inner_radius > 0.0 {
        let end = (start + sweep).to_radians();
        outline.push(center + geometry::parametrize_at(inner_radius, end));
        outline.push(center + geometry::parametrize_at(inner_radius, start.to_radians()));
    } else {
        outline.push(center);
    }
    WedgeShape::Sector(outline)
}

/// Outer ring and dead zone of the control
pub fn paint_background(painter: &Painter, origin: Pos2, state: &JoystickState) {
    let center = origin + state.center().to_vec2();
    let color = if state.is_active() {
        UiColors::ACTIVE
    } else {
        UiColors::BORDER
    };

    painter.circle(
        center,
        state.radius(),
        UiColors::INNER_BG,
        Stroke::new(2.0, color),
    );
    painter.circle_stroke(
        center,
        state.invalid_radius(),
        Stroke::new(1.0, Color32::from_gray(70)),
    );
    painter.circle_filled(center, 2.0, UiColors::BORDER);
}
