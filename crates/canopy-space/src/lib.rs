//! Spatial container for Canopy simulations.
//!
//! [`GridWorld`] is a bounded 2D lattice whose cells carry a
//! [`Terrain`] and any number of [`Occupant`](canopy_core::Occupant)s.
//! It answers the spatial questions the rest of the engine asks:
//! bounds checks, Moore (8) and von Neumann (4) neighbourhoods, and
//! the ordered list of border cells used to site charging stations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod terrain;

pub use error::SpaceError;
pub use grid::{Cell, GridWorld, Neighbourhood};
pub use terrain::Terrain;
