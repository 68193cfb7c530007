//! Procedural textures for the image knob styles of the demo

use eframe::egui::{Color32, ColorImage, Context, Pos2, TextureOptions, Vec2};

use crate::control::{Direction, DirectionType};
use crate::geometry::Radius;
use crate::state::JoystickState;
use crate::ui::knob::KnobImages;

pub const TEXTURE_SIDE: usize = 128;

// Inner edge of the direction highlights, as a share of the radius
const HIGHLIGHT_INNER: f32 = 0.35;

const KNOB_RIM: Color32 = Color32::from_rgb(60, 120, 200);
const KNOB_FILL: Color32 = Color32::from_rgb(140, 190, 255);
const HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(70, 140, 230, 160);

/// Shaded disc, brighter toward the middle.
pub fn knob_image(side: usize) -> ColorImage {
    let mut image = ColorImage::new([side, side], Color32::TRANSPARENT);
    let radius = side as f32 / 2.0;
    let center = Pos2::new(radius, radius);

    for (index, pixel) in image.pixels.iter_mut().enumerate() {
        let distance = pixel_center(index, side).distance(center);
        if distance <= radius {
            *pixel = KNOB_RIM.lerp_to_gamma(KNOB_FILL, 1.0 - distance / radius);
        }
    }
    image
}

/// Ring sector lit for `direction`, transparent everywhere else.
///
/// Pixels are bucketed the same way the joystick buckets positions, so the
/// sectors of all eight directions tile the ring without overlap.
pub fn direction_image(direction: Direction, side: usize) -> ColorImage {
    let mut image = ColorImage::new([side, side], Color32::TRANSPARENT);
    let Ok(mut state) = JoystickState::new(Radius::Ratio(HIGHLIGHT_INNER), DirectionType::Complete) else {
        return image;
    };
    state.set_size(Vec2::splat(side as f32));
    let radius = state.radius();

    for (index, pixel) in image.pixels.iter_mut().enumerate() {
        let position = pixel_center(index, side);
        if position.distance(state.center()) <= radius && state.get_direction(position) == direction {
            *pixel = HIGHLIGHT;
        }
    }
    image
}

fn pixel_center(index: usize, side: usize) -> Pos2 {
    Pos2::new((index % side) as f32 + 0.5, (index / side) as f32 + 0.5)
}

/// Uploads the demo textures.
pub fn load(ctx: &Context) -> KnobImages {
    let mut images = KnobImages::new().with_knob(ctx.load_texture(
        "knob",
        knob_image(TEXTURE_SIDE),
        TextureOptions::LINEAR,
    ));

    for direction in Direction::ALL {
        if direction == Direction::None {
            continue;
        }
        let texture = ctx.load_texture(
            format!("direction-{}", direction),
            direction_image(direction, TEXTURE_SIDE),
            TextureOptions::LINEAR,
        );
        images = images.with_direction(direction, texture);
    }
    images
}
