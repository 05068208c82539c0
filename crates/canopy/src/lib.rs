//! Canopy: an agent-based simulation of drones finding and treating
//! infected plants on a grid field.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Canopy sub-crates. For most users, adding `canopy` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use canopy::prelude::*;
//!
//! let config = WorldConfig {
//!     width: 8,
//!     height: 8,
//!     density: 0.5,
//!     drone_count: 2,
//!     max_ticks: 20,
//!     seed: 42,
//!     ..WorldConfig::default()
//! };
//! let mut world = World::new(config).unwrap();
//! let report = world.step().unwrap();
//! assert_eq!(report.tick, TickId(1));
//!
//! let last = world.run();
//! assert_eq!(last.tick, TickId(20));
//! assert!(!world.is_running());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `canopy-core` | Positions, IDs, occupants, resource meters, capability traits, errors |
//! | [`space`] | `canopy-space` | The bounded grid, terrain and neighbourhood queries |
//! | [`engine`] | `canopy-engine` | Plants, drones, blackboard, sensors, scheduler and the `World` |
//! | [`logging`] | (this crate) | `env_logger` setup for binaries |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod logging;

/// Core types, traits, and IDs (`canopy-core`).
///
/// Contains [`types::Position`], the identifier newtypes, the closed
/// [`types::Occupant`] enum, [`types::ResourceMeter`], and the
/// [`types::Treatable`] and [`types::Mobile`] capability traits.
pub use canopy_core as types;

/// The grid field (`canopy-space`).
///
/// Provides [`space::GridWorld`] with multi-occupant cells, terrain, and
/// Moore / von Neumann neighbourhood queries.
pub use canopy_space as space;

/// Simulation agents and the world (`canopy-engine`).
///
/// [`engine::World`] owns the grid, plants, drones and scheduler.
/// [`engine::Sensor`] is the extension point for custom detection models.
pub use canopy_engine as engine;

/// Common imports for typical Canopy usage.
///
/// ```rust
/// use canopy::prelude::*;
/// ```
///
/// This imports the world and its configuration, the per-tick report
/// types, the core traits, and the most common identifiers.
pub mod prelude {
    // Core types and traits
    pub use canopy_core::{
        DroneId, Mobile, Occupant, PlantId, Position, ResourceMeter, StationId, TickId, Treatable,
        TreatmentOutcome,
    };

    // Errors
    pub use canopy_core::{DetectionError, MoveError, ResourceError};
    pub use canopy_space::SpaceError;

    // Space
    pub use canopy_space::{GridWorld, Terrain};

    // Engine
    pub use canopy_engine::{
        CellTag, ConfigError, ControlState, DetectionWindow, DroneParams, OccupantTag, PlantParams,
        PlantState, Sensor, SensorParams, TickReport, World, WorldConfig,
    };
}
