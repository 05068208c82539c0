//! Per-tick reports.
//!
//! [`TickReport`] is the read-only query surface handed to everything
//! outside the engine: renderers, exporters and the headless runner.

use canopy_core::{DroneId, Position, TickId};

use crate::drone::ControlState;
use crate::plant::{Plant, PlantState};

/// Plant counts by state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlantCensus {
    /// Healthy plants.
    pub healthy: usize,
    /// Infected plants.
    pub infected: usize,
    /// Dead plants.
    pub dead: usize,
    /// All plants.
    pub total: usize,
}

impl PlantCensus {
    /// Count `plants` by state.
    pub fn count<'a, I>(plants: I) -> Self
    where
        I: IntoIterator<Item = &'a Plant>,
    {
        let mut c = Self::default();
        for p in plants {
            match p.state() {
                PlantState::Healthy => c.healthy += 1,
                PlantState::Infected => c.infected += 1,
                PlantState::Dead => c.dead += 1,
            }
            c.total += 1;
        }
        c
    }
}

/// One drone, as seen from outside.
#[derive(Clone, Debug, PartialEq)]
pub struct DroneStatus {
    /// Drone identifier.
    pub id: DroneId,
    /// Controller phase.
    pub state: ControlState,
    /// Current cell.
    pub position: Position,
    /// Battery level.
    pub battery: u32,
    /// Medicine level.
    pub medicine: u32,
    /// Current target, if any.
    pub target: Option<Position>,
}

/// Things that happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Plants infected by a neighbour.
    pub neighbour_infections: u32,
    /// Plants infected spontaneously.
    pub spontaneous_infections: u32,
    /// Plants that died of infection or treatment.
    pub plant_deaths: u32,
    /// Doses dispensed.
    pub doses: u32,
    /// Plants cured.
    pub cures: u32,
    /// Dispenses refused for lack of medicine.
    pub refused_doses: u32,
    /// Moves rejected as off-grid.
    pub rejected_moves: u32,
    /// Drones whose battery ran out.
    pub drone_deaths: u32,
}

/// Snapshot of the world after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Ticks completed so far.
    pub tick: TickId,
    /// Plant counts.
    pub census: PlantCensus,
    /// Targets currently on the blackboard.
    pub detected_targets: usize,
    /// Every drone, in id order.
    pub drones: Vec<DroneStatus>,
    /// Fraction of cells seen by at least one drone.
    pub coverage: f64,
    /// See [`performance_score`].
    pub score: f64,
    /// What happened during the tick. All zero for the construction report.
    pub events: TickEvents,
}

impl TickReport {
    /// Drones not yet dead.
    pub fn operational_drones(&self) -> usize {
        self.drones
            .iter()
            .filter(|d| d.state != ControlState::Dead)
            .count()
    }
}

fn safe_ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Weighted outcome score in `[0, 1]`:
/// `0.4 * healthy/total + 0.3 * (1 - dead/total) + 0.3 * detected/infected`.
///
/// Every ratio is 0 when its denominator is 0. The detection ratio is
/// capped at 1, since targets can outlive the infection they reported.
pub fn performance_score(census: &PlantCensus, detected: usize) -> f64 {
    let healthy_rate = safe_ratio(census.healthy, census.total);
    let dead_rate = safe_ratio(census.dead, census.total);
    let detection_rate = safe_ratio(detected, census.infected).min(1.0);
    0.4 * healthy_rate + 0.3 * (1.0 - dead_rate) + 0.3 * detection_rate
}
