//! Simulation engine for Canopy.
//!
//! Owns everything that changes during a run: the plant infection state
//! machine, the drone controller and its five-phase loop, the shared
//! blackboard, the visibility overlay and the scheduler. [`World`] ties
//! them together and is the only type most callers need.
//!
//! Everything is single-threaded and turn-based. One seeded
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng), owned by the [`Scheduler`],
//! drives every random draw, so identical configs give identical runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod config;
pub mod controller;
pub mod drone;
pub mod metrics;
pub mod plant;
pub mod scheduler;
pub mod sensor;
pub mod tags;
pub mod visibility;
pub mod world;

pub use blackboard::{
    Blackboard, BlackboardError, BlackboardHandle, BlackboardSnapshot, StationAssignment,
};
pub use config::{ConfigError, DroneParams, PlantParams, SensorParams, WorldConfig};
pub use drone::{ActionOutcome, ControlState, DroneAction, DroneAgent, DroneEnv};
pub use metrics::{performance_score, DroneStatus, PlantCensus, TickEvents, TickReport};
pub use plant::{Plant, PlantState, PlantTransition, FULL_HEALTH};
pub use scheduler::{AgentRef, Scheduler};
pub use sensor::{DetectionWindow, Detections, FieldView, LocalDetection, Sensor, SimulatedCamera};
pub use tags::{CellTag, HealthBucket, OccupantTag};
pub use visibility::{CellVisibility, VisibilityOverlay};
pub use world::{ChargingStation, World};
