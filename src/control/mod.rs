//! Discrete direction model
//!
//! Maps between continuous angles, quadrant indices and [`Direction`] values at
//! two granularities: eight directions ([`DirectionType::Complete`]) or the four
//! axis directions ([`DirectionType::Simple`]).

pub mod direction;

pub use direction::{Direction, DirectionType, MaxQuadrants};
