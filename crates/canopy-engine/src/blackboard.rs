//! Shared coordination store for the drone swarm.
//!
//! The [`Blackboard`] is a plain data store with merge semantics, not a
//! message queue. Drone positions are last-write-wins; target
//! confidences are max-wins and only disappear when a drone reports the
//! cell clear with enough confidence. Charging stations are registered
//! once at construction.
//!
//! Drones never touch the maps directly. Each holds a cloned
//! [`BlackboardHandle`] and goes through its narrow accessor API.
//! Because agents are activated one after another, a drone's
//! [`snapshot`](BlackboardHandle::snapshot) sees writes from drones
//! activated earlier in the same tick and none from drones activated
//! later.

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use canopy_core::{DroneId, Position, StationId};
use indexmap::IndexMap;

// ── Errors ─────────────────────────────────────────────────────────

/// A blackboard write was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlackboardError {
    /// The position lies outside the grid the blackboard was built for.
    OutOfBounds {
        /// The rejected position.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

impl fmt::Display for BlackboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                width,
                height,
            } => write!(
                f,
                "blackboard write at {position} outside [0, {width}) x [0, {height})"
            ),
        }
    }
}

impl Error for BlackboardError {}

// ── Entries ────────────────────────────────────────────────────────

/// Which drone a charging station belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationAssignment {
    /// The station.
    pub station: StationId,
    /// Its home drone.
    pub drone: DroneId,
}

// ── Blackboard ─────────────────────────────────────────────────────

/// The coordination store. All maps iterate in insertion order.
#[derive(Clone, Debug)]
pub struct Blackboard {
    width: u32,
    height: u32,
    clearance_threshold: f64,
    drone_positions: IndexMap<DroneId, Position>,
    palm_targets: IndexMap<Position, f64>,
    charging_stations: IndexMap<Position, StationAssignment>,
}

impl Blackboard {
    /// An empty blackboard for a `width x height` grid.
    ///
    /// Clear reports whose magnitude does not exceed
    /// `clearance_threshold` are ignored.
    pub fn new(width: u32, height: u32, clearance_threshold: f64) -> Self {
        Self {
            width,
            height,
            clearance_threshold,
            drone_positions: IndexMap::new(),
            palm_targets: IndexMap::new(),
            charging_stations: IndexMap::new(),
        }
    }

    fn check(&self, position: Position) -> Result<(), BlackboardError> {
        let inside = position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height;
        if inside {
            Ok(())
        } else {
            let err = BlackboardError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            };
            log::warn!("{err}");
            Err(err)
        }
    }

    /// Record where `drone` is. Last write wins.
    pub fn publish_position(
        &mut self,
        drone: DroneId,
        position: Position,
    ) -> Result<(), BlackboardError> {
        self.check(position)?;
        self.drone_positions.insert(drone, position);
        Ok(())
    }

    /// Drop `drone` from the position map. Returns true if it was there.
    pub fn retire_drone(&mut self, drone: DroneId) -> bool {
        self.drone_positions.shift_remove(&drone).is_some()
    }

    /// Merge a positive detection, keeping the larger confidence.
    ///
    /// Returns true if the stored value changed. Non-positive or
    /// non-finite confidences are not targets and are ignored.
    pub fn publish_detection(
        &mut self,
        position: Position,
        confidence: f64,
    ) -> Result<bool, BlackboardError> {
        self.check(position)?;
        if !confidence.is_finite() || confidence <= 0.0 {
            return Ok(false);
        }
        match self.palm_targets.get_mut(&position) {
            Some(stored) if *stored >= confidence => Ok(false),
            Some(stored) => {
                *stored = confidence;
                Ok(true)
            }
            None => {
                self.palm_targets.insert(position, confidence);
                Ok(true)
            }
        }
    }

    /// Retract the target at `position` if `|confidence|` exceeds the
    /// clearance threshold. Returns true if an entry was removed.
    pub fn report_clear(
        &mut self,
        position: Position,
        confidence: f64,
    ) -> Result<bool, BlackboardError> {
        self.check(position)?;
        if confidence.abs() <= self.clearance_threshold {
            return Ok(false);
        }
        Ok(self.palm_targets.shift_remove(&position).is_some())
    }

    /// Register a charging station. Replaces any earlier registration at
    /// the same cell.
    pub fn register_station(
        &mut self,
        position: Position,
        assignment: StationAssignment,
    ) -> Result<(), BlackboardError> {
        self.check(position)?;
        self.charging_stations.insert(position, assignment);
        Ok(())
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.drone_positions.clear();
        self.palm_targets.clear();
        self.charging_stations.clear();
    }

    /// Owned copy of the current contents.
    pub fn snapshot(&self) -> BlackboardSnapshot {
        BlackboardSnapshot {
            drone_positions: self.drone_positions.clone(),
            palm_targets: self.palm_targets.clone(),
            charging_stations: self.charging_stations.clone(),
        }
    }

    /// Number of known targets.
    pub fn target_count(&self) -> usize {
        self.palm_targets.len()
    }

    /// Stored confidence for `position`, if it is a known target.
    pub fn confidence_at(&self, position: Position) -> Option<f64> {
        self.palm_targets.get(&position).copied()
    }

    /// Known targets and their confidences.
    pub fn targets(&self) -> &IndexMap<Position, f64> {
        &self.palm_targets
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// A point-in-time copy of the blackboard, taken by a drone at the start
/// of its activation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlackboardSnapshot {
    drone_positions: IndexMap<DroneId, Position>,
    palm_targets: IndexMap<Position, f64>,
    charging_stations: IndexMap<Position, StationAssignment>,
}

impl BlackboardSnapshot {
    /// Last published position of every drone.
    pub fn drone_positions(&self) -> &IndexMap<DroneId, Position> {
        &self.drone_positions
    }

    /// Positions of every drone except `me`.
    pub fn other_drones(&self, me: DroneId) -> Vec<Position> {
        self.drone_positions
            .iter()
            .filter(|(id, _)| **id != me)
            .map(|(_, pos)| *pos)
            .collect()
    }

    /// Known targets and their confidences.
    pub fn targets(&self) -> &IndexMap<Position, f64> {
        &self.palm_targets
    }

    /// Registered charging stations.
    pub fn stations(&self) -> &IndexMap<Position, StationAssignment> {
        &self.charging_stations
    }

    /// True if `position` is a known target.
    pub fn has_target(&self, position: Position) -> bool {
        self.palm_targets.contains_key(&position)
    }
}

// ── Handle ─────────────────────────────────────────────────────────

/// Shared, single-threaded reference to a [`Blackboard`].
///
/// Cloning the handle shares the underlying store.
#[derive(Clone, Debug)]
pub struct BlackboardHandle(Rc<RefCell<Blackboard>>);

impl BlackboardHandle {
    /// Wrap a blackboard.
    pub fn new(blackboard: Blackboard) -> Self {
        Self(Rc::new(RefCell::new(blackboard)))
    }

    /// See [`Blackboard::publish_position`].
    pub fn publish_position(&self, drone: DroneId, position: Position) -> Result<(), BlackboardError> {
        self.0.borrow_mut().publish_position(drone, position)
    }

    /// See [`Blackboard::retire_drone`].
    pub fn retire_drone(&self, drone: DroneId) -> bool {
        self.0.borrow_mut().retire_drone(drone)
    }

    /// See [`Blackboard::publish_detection`].
    pub fn publish_detection(&self, position: Position, confidence: f64) -> Result<bool, BlackboardError> {
        self.0.borrow_mut().publish_detection(position, confidence)
    }

    /// See [`Blackboard::report_clear`].
    pub fn report_clear(&self, position: Position, confidence: f64) -> Result<bool, BlackboardError> {
        self.0.borrow_mut().report_clear(position, confidence)
    }

    /// See [`Blackboard::register_station`].
    pub fn register_station(
        &self,
        position: Position,
        assignment: StationAssignment,
    ) -> Result<(), BlackboardError> {
        self.0.borrow_mut().register_station(position, assignment)
    }

    /// See [`Blackboard::reset`].
    pub fn reset(&self) {
        self.0.borrow_mut().reset();
    }

    /// See [`Blackboard::snapshot`].
    pub fn snapshot(&self) -> BlackboardSnapshot {
        self.0.borrow().snapshot()
    }

    /// See [`Blackboard::target_count`].
    pub fn target_count(&self) -> usize {
        self.0.borrow().target_count()
    }

    /// See [`Blackboard::confidence_at`].
    pub fn confidence_at(&self, position: Position) -> Option<f64> {
        self.0.borrow().confidence_at(position)
    }
}
