use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::control::{Direction, DirectionType, MaxQuadrants};
use crate::error::JoystickError;
use crate::geometry::{self, Radius, SQRT_2};
use crate::state::snapshot::JoystickSnapshot;

// Position that survives a control re-creation; size is recomputed from layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SavedPosition {
    pub x: f32,
    pub y: f32,
}

impl From<SavedPosition> for Pos2 {
    fn from(saved: SavedPosition) -> Self {
        Pos2::new(saved.x, saved.y)
    }
}

impl From<Pos2> for SavedPosition {
    fn from(position: Pos2) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

/// Mutable model of one joystick control.
///
/// Only `position` and `size` are stored. Everything else is derived on read
/// from those two, so a reader always sees values consistent with a single
/// position/size pair.
///
/// Once `size` is non-zero, `position` never lies further than [`radius`]
/// from [`center`]: [`goto`] projects outside targets onto the boundary.
///
/// [`radius`]: JoystickState::radius
/// [`center`]: JoystickState::center
/// [`goto`]: JoystickState::goto
#[derive(Debug, Clone, PartialEq)]
pub struct JoystickState {
    position: Pos2,
    size: Vec2,
    invalid_radius: Radius,
    direction_type: DirectionType,
}

impl Default for JoystickState {
    fn default() -> Self {
        Self {
            position: Pos2::ZERO,
            size: Vec2::ZERO,
            invalid_radius: Radius::default(),
            direction_type: DirectionType::default(),
        }
    }
}

impl JoystickState {
    /// Unsized state with the given dead zone.
    ///
    /// # Errors
    ///
    /// [`JoystickError::InvalidRadius`] when `invalid_radius` was built from the
    /// bare variants with a value outside its range.
    pub fn new(invalid_radius: Radius, direction_type: DirectionType) -> Result<Self, JoystickError> {
        invalid_radius.validate()?;
        Ok(Self {
            invalid_radius,
            direction_type,
            ..Self::default()
        })
    }

    /// Rebuilds a state for a control of known `size` at a saved position.
    pub fn restored(
        invalid_radius: Radius,
        direction_type: DirectionType,
        size: Vec2,
        saved: SavedPosition,
    ) -> Result<Self, JoystickError> {
        let mut state = Self::new(invalid_radius, direction_type)?;
        state.set_size(size);
        state.goto(saved.into());
        Ok(state)
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn direction_type(&self) -> DirectionType {
        self.direction_type
    }

    pub fn invalid_radius_spec(&self) -> Radius {
        self.invalid_radius
    }

    pub fn saved_position(&self) -> SavedPosition {
        self.position.into()
    }

    /// Stores a new layout size. The caller re-validates the position afterwards
    /// with [`reset`](Self::reset) or [`goto`](Self::goto).
    pub fn set_size(&mut self, size: Vec2) -> bool {
        if self.size == size {
            return false;
        }
        debug!("Joystick size changed: {:?} -> {:?}", self.size, size);
        self.size = size;
        true
    }

    fn has_area(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0 && self.size.is_finite()
    }

    /// Moves to `target`, projecting it onto the boundary circle when outside.
    ///
    /// Does nothing while the control has no size. Returns whether the stored
    /// position changed.
    pub fn goto(&mut self, target: Pos2) -> bool {
        if !self.has_area() {
            return false;
        }

        let center = self.center();
        let radius = self.radius();
        let offset = target - center;

        let next = if offset.length_sq() > radius * radius {
            center + geometry::parametrize(offset, radius)
        } else {
            target
        };

        let changed = next != self.position;
        self.position = next;
        changed
    }

    /// Returns to dead center.
    pub fn reset(&mut self) -> bool {
        self.goto(self.center())
    }

    /// Target position for `direction` at `strength` (fraction of the radius).
    ///
    /// Diagonals are scaled by `1/√2` on each axis so the distance from the
    /// center stays `strength * radius`.
    pub fn get_position(&self, direction: Direction, strength: f32) -> Result<Pos2, JoystickError> {
        if !(0.0..=1.0).contains(&strength) {
            return Err(JoystickError::InvalidStrength(strength));
        }

        let center = self.center();
        if strength == 0.0 || direction == Direction::None {
            return Ok(center);
        }

        let scaled = self.radius() * strength;
        let diagonal = scaled / SQRT_2;

        let offset = match direction {
            Direction::None => Vec2::ZERO,
            Direction::Up => Vec2::new(0.0, -scaled),
            Direction::Down => Vec2::new(0.0, scaled),
            Direction::Left => Vec2::new(-scaled, 0.0),
            Direction::Right => Vec2::new(scaled, 0.0),
            Direction::UpLeft => Vec2::new(-diagonal, -diagonal),
            Direction::UpRight => Vec2::new(diagonal, -diagonal),
            Direction::DownLeft => Vec2::new(-diagonal, diagonal),
            Direction::DownRight => Vec2::new(diagonal, diagonal),
        };

        Ok(center + offset)
    }

    /// Moves to the position of `direction` at `strength`.
    pub fn goto_direction(&mut self, direction: Direction, strength: f32) -> Result<bool, JoystickError> {
        let target = self.get_position(direction, strength)?;
        Ok(self.goto(target))
    }

    pub fn center(&self) -> Pos2 {
        (self.size / 2.0).to_pos2()
    }

    pub fn radius(&self) -> f32 {
        (self.size.min_elem() / 2.0).max(0.0)
    }

    pub fn offset(&self) -> Vec2 {
        self.position - self.center()
    }

    pub fn distance(&self) -> f32 {
        self.offset().length()
    }

    /// Angle of the current offset in radians, in `[0, 2π)`
    pub fn angle(&self) -> f32 {
        geometry::angle_of(self.offset())
    }

    /// Dead-zone radius in pixels
    pub fn invalid_radius(&self) -> f32 {
        self.invalid_radius.resolve(self.radius())
    }

    pub fn is_valid(&self) -> bool {
        if self.radius() <= 0.0 {
            return false;
        }
        let invalid = self.invalid_radius();
        self.offset().length_sq() > invalid * invalid
    }

    pub fn is_centered(&self) -> bool {
        self.position == self.center()
    }

    pub fn is_active(&self) -> bool {
        self.is_valid() && !self.is_centered()
    }

    pub fn direction(&self) -> Direction {
        self.get_direction(self.position)
    }

    /// Normalized distance from the center, 0 inside the dead zone
    pub fn strength(&self) -> f32 {
        if !self.is_valid() {
            return 0.0;
        }
        (self.distance() / self.radius()).clamp(0.0, 1.0)
    }

    /// Current offset projected onto the boundary circle
    pub fn parametric_position(&self) -> Pos2 {
        self.center() + geometry::parametrize(self.offset(), self.radius())
    }

    /// Direction an arbitrary position would report, without moving there.
    pub fn get_direction(&self, position: Pos2) -> Direction {
        if self.radius() <= 0.0 {
            return Direction::None;
        }

        let offset = position - self.center();
        let invalid = self.invalid_radius();
        if offset.length_sq() <= invalid * invalid {
            return Direction::None;
        }

        let quadrant_type = MaxQuadrants::from(self.direction_type);
        let degrees = geometry::to_degrees(f64::from(geometry::angle_of(offset)));

        match geometry::angle_to_quadrant(degrees, quadrant_type, true) {
            Ok(quadrant) => Direction::from_quadrant(quadrant, quadrant_type),
            Err(_) => Direction::None,
        }
    }

    pub fn snapshot(&self) -> JoystickSnapshot {
        JoystickSnapshot {
            direction: self.direction(),
            position: Some(self.position),
            strength: self.strength(),
            angle: self.angle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn sized(width: f32, height: f32) -> JoystickState {
        let mut state = JoystickState::default();
        state.set_size(Vec2::new(width, height));
        state.reset();
        state
    }

    #[test]
    fn derived_geometry_follows_size() {
        let state = sized(200.0, 100.0);
        assert_eq!(state.center(), Pos2::new(100.0, 50.0));
        assert_eq!(state.radius(), 50.0);
        assert!((state.invalid_radius() - 10.0).abs() < EPS);
        assert!(state.is_centered());
    }

    #[test]
    fn goto_without_size_is_ignored() {
        let mut state = JoystickState::default();
        assert!(!state.goto(Pos2::new(40.0, 40.0)));
        assert_eq!(state.position(), Pos2::ZERO);
        assert!(!state.is_valid());
        assert_eq!(state.strength(), 0.0);
        assert_eq!(state.direction(), Direction::None);
    }

    #[test]
    fn goto_keeps_position_inside_the_circle() {
        let mut state = sized(200.0, 200.0);
        let mut x = -300.0;
        while x <= 500.0 {
            let mut y = -300.0;
            while y <= 500.0 {
                state.goto(Pos2::new(x, y));
                assert!(
                    state.distance() <= state.radius() + EPS,
                    "({}, {}) left the circle",
                    x,
                    y
                );
                y += 37.0;
            }
            x += 41.0;
        }
    }

    #[test]
    fn outside_target_is_projected_along_its_angle() {
        let mut state = sized(200.0, 200.0);
        state.goto(Pos2::new(300.0, 300.0));
        assert!((state.distance() - 100.0).abs() < EPS);
        assert!((state.strength() - 1.0).abs() < EPS);
        assert_eq!(state.direction(), Direction::DownRight);
        assert!((state.position().x - (100.0 + 70.710_68)).abs() < EPS);
    }

    #[test]
    fn reset_returns_to_rest() {
        let mut state = sized(200.0, 200.0);
        state.goto(Pos2::new(180.0, 20.0));
        assert!(state.is_active());

        state.reset();
        assert!(state.is_centered());
        assert!(!state.is_active());
        assert_eq!(state.direction(), Direction::None);
        assert_eq!(state.strength(), 0.0);
    }

    #[test]
    fn dead_zone_reports_nothing() {
        let mut state = sized(200.0, 200.0);
        for target in [
            Pos2::new(110.0, 100.0),
            Pos2::new(100.0, 120.0),
            Pos2::new(114.0, 114.0),
        ] {
            state.goto(target);
            assert!(!state.is_valid());
            assert_eq!(state.direction(), Direction::None);
            assert_eq!(state.strength(), 0.0);
        }
    }

    #[test]
    fn strength_grows_with_distance() {
        let mut state = sized(200.0, 200.0);
        let mut previous = 0.0;
        for step in 0..=150 {
            state.goto(Pos2::new(100.0 + step as f32, 100.0));
            let strength = state.strength();
            assert!((0.0..=1.0).contains(&strength));
            assert!(strength >= previous);
            previous = strength;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn degenerate_radius_is_never_valid() {
        let mut state = sized(0.0, 100.0);
        state.goto(Pos2::new(10.0, 10.0));
        assert!(!state.is_valid());
        assert_eq!(state.strength(), 0.0);
        assert_eq!(state.direction(), Direction::None);
    }

    #[test]
    fn directions_follow_screen_quadrants() {
        let state = sized(200.0, 200.0);
        assert_eq!(state.get_direction(Pos2::new(190.0, 100.0)), Direction::Right);
        assert_eq!(state.get_direction(Pos2::new(100.0, 190.0)), Direction::Down);
        assert_eq!(state.get_direction(Pos2::new(10.0, 100.0)), Direction::Left);
        assert_eq!(state.get_direction(Pos2::new(100.0, 10.0)), Direction::Up);
        assert_eq!(state.get_direction(Pos2::new(30.0, 30.0)), Direction::UpLeft);
        assert_eq!(state.get_direction(Pos2::new(170.0, 30.0)), Direction::UpRight);
    }

    #[test]
    fn simple_type_only_reports_axes() {
        let mut state = JoystickState::new(Radius::default(), DirectionType::Simple).unwrap();
        state.set_size(Vec2::splat(200.0));
        assert_eq!(state.get_direction(Pos2::new(170.0, 160.0)), Direction::Right);
        assert_eq!(state.get_direction(Pos2::new(140.0, 180.0)), Direction::Down);
        assert_eq!(state.get_direction(Pos2::new(60.0, 20.0)), Direction::Up);
    }

    #[test]
    fn fixed_dead_zone_is_absolute() {
        let mut state = JoystickState::new(Radius::Fixed(50.0), DirectionType::Complete).unwrap();
        state.set_size(Vec2::splat(200.0));
        state.goto(Pos2::new(140.0, 100.0));
        assert!(!state.is_valid());
        state.goto(Pos2::new(160.0, 100.0));
        assert!(state.is_valid());
        assert!((state.strength() - 0.6).abs() < EPS);
    }

    #[test]
    fn positions_for_directions() {
        let state = sized(200.0, 200.0);

        let up = state.get_position(Direction::Up, 0.5).unwrap();
        assert_eq!(up, Pos2::new(100.0, 50.0));

        let up_left = state.get_position(Direction::UpLeft, 1.0).unwrap();
        assert!((up_left.x - (100.0 - 70.710_68)).abs() < EPS);
        assert!((up_left.y - (100.0 - 70.710_68)).abs() < EPS);
        assert!(((up_left - state.center()).length() - 100.0).abs() < EPS);

        assert_eq!(state.get_position(Direction::None, 1.0).unwrap(), state.center());
        assert_eq!(state.get_position(Direction::Right, 0.0).unwrap(), state.center());
    }

    #[test]
    fn strength_outside_unit_range_is_rejected() {
        let state = sized(200.0, 200.0);
        assert_eq!(
            state.get_position(Direction::Up, 1.5),
            Err(JoystickError::InvalidStrength(1.5))
        );
        assert!(state.get_position(Direction::Up, -0.1).is_err());
    }

    #[test]
    fn goto_direction_moves_there() {
        let mut state = sized(200.0, 200.0);
        assert!(state.goto_direction(Direction::Left, 1.0).unwrap());
        assert_eq!(state.position(), Pos2::new(0.0, 100.0));
        assert_eq!(state.direction(), Direction::Left);
    }

    #[test]
    fn restored_state_is_clamped_to_new_size() {
        let restored = JoystickState::restored(
            Radius::default(),
            DirectionType::Complete,
            Vec2::splat(100.0),
            SavedPosition { x: 150.0, y: 50.0 },
        )
        .unwrap();
        assert_eq!(restored.position(), Pos2::new(100.0, 50.0));
        assert_eq!(restored.saved_position(), SavedPosition { x: 100.0, y: 50.0 });
    }

    #[test]
    fn out_of_range_dead_zone_never_reaches_a_state() {
        for radius in [Radius::Ratio(1.5), Radius::Ratio(0.0), Radius::Fixed(-30.0)] {
            assert!(matches!(
                JoystickState::new(radius, DirectionType::Complete),
                Err(JoystickError::InvalidRadius(_))
            ));
            assert!(JoystickState::restored(
                radius,
                DirectionType::Complete,
                Vec2::splat(200.0),
                SavedPosition { x: 200.0, y: 100.0 },
            )
            .is_err());
        }

        // a rim position is reported once the dead zone is in range
        let mut state = JoystickState::new(Radius::Ratio(0.5), DirectionType::Complete).unwrap();
        state.set_size(Vec2::splat(200.0));
        state.goto(Pos2::new(200.0, 100.0));
        assert_eq!(state.direction(), Direction::Right);
    }

    #[test]
    fn parametric_position_lies_on_boundary() {
        let mut state = sized(200.0, 200.0);
        state.goto(Pos2::new(130.0, 100.0));
        assert_eq!(state.parametric_position(), Pos2::new(200.0, 100.0));
    }
}
