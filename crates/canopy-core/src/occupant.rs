//! The closed set of things that can stand on a grid cell.

use crate::id::{DroneId, PlantId, StationId};

/// A grid occupant.
///
/// Cells hold a list of these; an empty list is an empty cell. Code
/// that needs to know "is there a plant here" matches on the variant
/// rather than inspecting types at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Occupant {
    /// A stationary plant.
    Plant(PlantId),
    /// A mobile drone.
    Drone(DroneId),
    /// A fixed charging station on the grid border.
    ChargingStation(StationId),
}

impl Occupant {
    /// The plant ID, if this is a plant.
    pub fn as_plant(self) -> Option<PlantId> {
        match self {
            Self::Plant(id) => Some(id),
            _ => None,
        }
    }

    /// The drone ID, if this is a drone.
    pub fn as_drone(self) -> Option<DroneId> {
        match self {
            Self::Drone(id) => Some(id),
            _ => None,
        }
    }

    /// The station ID, if this is a charging station.
    pub fn as_station(self) -> Option<StationId> {
        match self {
            Self::ChargingStation(id) => Some(id),
            _ => None,
        }
    }

    /// Only drones ever change cell.
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Drone(_))
    }
}
