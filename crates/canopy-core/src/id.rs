//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a drone within a simulation run.
///
/// Drones are created at world construction and assigned sequential IDs.
/// `DroneId(n)` is the n-th drone built, and doubles as its index into
/// the world's drone table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DroneId(pub u32);

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DroneId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a plant within a simulation run.
///
/// Plants are never removed, so the ID is a stable index into the
/// world's plant table for the lifetime of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlantId(pub u32);

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlantId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a charging station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StationId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the scheduler advances one step. Tick 0 is the
/// freshly constructed world before any agent has been activated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_their_index() {
        assert_eq!(DroneId(3).to_string(), "3");
        assert_eq!(PlantId::from(7).to_string(), "7");
        assert_eq!(StationId(0).to_string(), "0");
    }

    #[test]
    fn tick_next_increments() {
        assert_eq!(TickId::default().next(), TickId(1));
        assert_eq!(TickId(41).next().0, 42);
    }
}
