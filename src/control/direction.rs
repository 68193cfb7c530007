use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

// Possible directions of the joystick, quadrants numbered clockwise from Right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

// How many directions the control reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DirectionType {
    /// All eight directions
    #[default]
    Complete,
    /// Only Up, Down, Left, Right and None
    Simple,
}

// Number of angular buckets used when classifying an angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxQuadrants {
    Four,
    Eight,
}

impl MaxQuadrants {
    pub fn count(&self) -> u8 {
        match self {
            MaxQuadrants::Four => 4,
            MaxQuadrants::Eight => 8,
        }
    }
}

impl From<DirectionType> for MaxQuadrants {
    fn from(direction_type: DirectionType) -> Self {
        match direction_type {
            DirectionType::Complete => MaxQuadrants::Eight,
            DirectionType::Simple => MaxQuadrants::Four,
        }
    }
}

impl DirectionType {
    /// Looks up a direction type by its numeric id, falling back to `Complete`.
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => DirectionType::Simple,
            _ => DirectionType::Complete,
        }
    }

    /// Angular width of one direction slice in degrees
    pub fn sweep_angle(&self) -> f32 {
        match self {
            DirectionType::Complete => 45.0,
            DirectionType::Simple => 90.0,
        }
    }
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::None,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Direction for a quadrant index; 0 or anything outside the table is `None`.
    pub fn from_quadrant(quadrant: u8, quadrant_type: MaxQuadrants) -> Self {
        match quadrant_type {
            MaxQuadrants::Eight => match quadrant {
                1 => Direction::Right,
                2 => Direction::DownRight,
                3 => Direction::Down,
                4 => Direction::DownLeft,
                5 => Direction::Left,
                6 => Direction::UpLeft,
                7 => Direction::Up,
                8 => Direction::UpRight,
                _ => Direction::None,
            },
            MaxQuadrants::Four => match quadrant {
                1 => Direction::Right,
                2 => Direction::Down,
                3 => Direction::Left,
                4 => Direction::Up,
                _ => Direction::None,
            },
        }
    }

    /// Quadrant index of this direction.
    ///
    /// With four quadrants the diagonals fold onto their vertical axis.
    pub fn to_quadrant(&self, quadrant_type: MaxQuadrants) -> u8 {
        match quadrant_type {
            MaxQuadrants::Eight => match self {
                Direction::None => 0,
                Direction::Right => 1,
                Direction::DownRight => 2,
                Direction::Down => 3,
                Direction::DownLeft => 4,
                Direction::Left => 5,
                Direction::UpLeft => 6,
                Direction::Up => 7,
                Direction::UpRight => 8,
            },
            MaxQuadrants::Four => match self {
                Direction::None => 0,
                Direction::Right => 1,
                Direction::Down | Direction::DownRight | Direction::DownLeft => 2,
                Direction::Left => 3,
                Direction::Up | Direction::UpRight | Direction::UpLeft => 4,
            },
        }
    }

    pub fn to_quadrant_for(&self, direction_type: DirectionType) -> u8 {
        self.to_quadrant(direction_type.into())
    }

    /// Collapses diagonals onto Up/Down when only simple directions are reported.
    pub fn clamp(&self, direction_type: DirectionType) -> Self {
        match direction_type {
            DirectionType::Complete => *self,
            DirectionType::Simple => match self {
                Direction::Up | Direction::UpRight | Direction::UpLeft => Direction::Up,
                Direction::Down | Direction::DownRight | Direction::DownLeft => Direction::Down,
                other => *other,
            },
        }
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
        )
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::None => "None",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::UpLeft => "UpLeft",
            Direction::UpRight => "UpRight",
            Direction::DownLeft => "DownLeft",
            Direction::DownRight => "DownRight",
        };
        write!(f, "{}", name)
    }
}

impl Display for DirectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionType::Complete => write!(f, "Complete"),
            DirectionType::Simple => write!(f, "Simple"),
        }
    }
}
