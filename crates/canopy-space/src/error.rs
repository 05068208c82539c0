//! Error types for grid operations.

use canopy_core::{Occupant, Position};
use std::fmt;

/// Errors arising from grid construction or cell updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// A position is outside `[0, width) x [0, height)`.
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// A dimension does not fit the signed coordinate type.
    DimensionTooLarge {
        /// Which dimension ("width" or "height").
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// The largest accepted value.
        max: u32,
    },
    /// The occupant is not in the named cell.
    OccupantNotFound {
        /// What was looked for.
        occupant: Occupant,
        /// Where it was looked for.
        position: Position,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                width,
                height,
            } => {
                write!(f, "position {position} out of bounds: [0, {width}) x [0, {height})")
            }
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
            Self::OccupantNotFound { occupant, position } => {
                write!(f, "{occupant:?} not found at {position}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
