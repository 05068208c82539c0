//! Error types for agent actions.
//!
//! None of these abort a tick. Each is produced where an action is
//! attempted, logged, and recovered from locally by the caller:
//! invalid moves hold position, refused dispenses are no-ops, and
//! malformed detections are skipped.

use std::error::Error;
use std::fmt;

use crate::position::Position;
use crate::resource::ResourceKind;

/// A drone move that could not be executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The destination lies outside the grid. The drone holds position.
    OutOfBounds {
        /// Where the drone was.
        from: Position,
        /// The rejected destination.
        to: Position,
    },
    /// The destination is on the grid but the grid refused the move,
    /// because the drone is not registered at `from`. The drone holds
    /// position.
    Blocked {
        /// Where the drone believes it is.
        from: Position,
        /// The refused destination.
        to: Position,
    },
    /// The battery was empty when the move was attempted. Terminal for
    /// the drone.
    BatteryExhausted {
        /// Where the drone stopped for good.
        at: Position,
    },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { from, to } => {
                write!(f, "move from {from} to {to} leaves the grid")
            }
            Self::Blocked { from, to } => {
                write!(f, "grid refused move from {from} to {to}")
            }
            Self::BatteryExhausted { at } => {
                write!(f, "battery exhausted at {at}")
            }
        }
    }
}

impl Error for MoveError {}

/// A resource meter could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceError {
    /// The meter holds less than was requested. Nothing was consumed.
    Insufficient {
        /// Which meter refused.
        kind: ResourceKind,
        /// Units requested.
        requested: u32,
        /// Units available at the time of the request.
        available: u32,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insufficient {
                kind,
                requested,
                available,
            } => write!(
                f,
                "insufficient {kind}: requested {requested}, available {available}"
            ),
        }
    }
}

impl Error for ResourceError {}

/// A sensor detection entry that cannot be placed on the grid.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectionError {
    /// The entry's offset lies outside the window it claims to belong to.
    OffsetOutsideWindow {
        /// Column offset from the window centre.
        dx: i32,
        /// Row offset from the window centre.
        dy: i32,
        /// Window radius.
        radius: u32,
    },
    /// The confidence is NaN, infinite, or outside `[-1, 1]`.
    InvalidConfidence {
        /// Column offset from the window centre.
        dx: i32,
        /// Row offset from the window centre.
        dy: i32,
        /// The offending value.
        confidence: f64,
    },
    /// Two entries in the same window name the same cell.
    Duplicate {
        /// The ambiguous absolute position.
        position: Position,
    },
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetOutsideWindow { dx, dy, radius } => {
                write!(f, "offset ({dx}, {dy}) outside window of radius {radius}")
            }
            Self::InvalidConfidence { dx, dy, confidence } => {
                write!(f, "confidence {confidence} at offset ({dx}, {dy}) not in [-1, 1]")
            }
            Self::Duplicate { position } => {
                write!(f, "duplicate detection for {position}")
            }
        }
    }
}

impl Error for DetectionError {}
