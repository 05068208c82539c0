//! Rendering tags.
//!
//! Renderers never see engine types. They get one small, copyable tag
//! per occupant (or per cell) describing just enough to pick a glyph or
//! a colour.

use crate::drone::ControlState;
use crate::plant::PlantState;

/// Coarse plant health for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthBucket {
    /// Below 25.
    Critical,
    /// 25 to below 50.
    Low,
    /// 50 to below 75.
    Medium,
    /// 75 and above.
    High,
}

impl HealthBucket {
    /// Bucket for a health value in `[0, 100]`.
    pub fn from_health(health: f64) -> Self {
        if health >= 75.0 {
            Self::High
        } else if health >= 50.0 {
            Self::Medium
        } else if health >= 25.0 {
            Self::Low
        } else {
            Self::Critical
        }
    }
}

/// What a renderer needs to know about one occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OccupantTag {
    /// A plant.
    Plant {
        /// Infection state.
        state: PlantState,
        /// Health bucket.
        health: HealthBucket,
    },
    /// A drone.
    Drone {
        /// Controller phase.
        state: ControlState,
    },
    /// A charging station.
    ChargingStation {
        /// A drone is standing on it.
        occupied: bool,
    },
}

/// What a renderer shows for a whole cell: its top-most occupant.
///
/// Drones draw over stations, which draw over plants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellTag {
    /// Nothing on the cell.
    Empty,
    /// The top-most occupant.
    Occupied(OccupantTag),
}

impl OccupantTag {
    /// Draw order: higher draws on top.
    pub fn layer(&self) -> u8 {
        match self {
            Self::Plant { .. } => 0,
            Self::ChargingStation { .. } => 1,
            Self::Drone { .. } => 2,
        }
    }
}
