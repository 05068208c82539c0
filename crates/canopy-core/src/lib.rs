//! Core types and traits for the Canopy simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary shared by every other crate in the
//! workspace: grid positions, strongly-typed identifiers, the closed
//! [`Occupant`] variant, capability traits, resource meters, and the
//! error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod occupant;
pub mod position;
pub mod resource;
pub mod traits;

pub use error::{DetectionError, MoveError, ResourceError};
pub use id::{DroneId, PlantId, StationId, TickId};
pub use occupant::Occupant;
pub use position::{Position, MOORE_OFFSETS, VON_NEUMANN_OFFSETS};
pub use resource::{ResourceKind, ResourceMeter};
pub use traits::{Mobile, Treatable, TreatmentOutcome};
