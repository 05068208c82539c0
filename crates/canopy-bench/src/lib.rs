//! Benchmark profiles for the Canopy simulation.
//!
//! Provides pre-built [`WorldConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 50x50 field (2.5K cells), 8 drones
//! - [`stress_profile`]: 200x200 field (40K cells), 32 drones
//! - [`outbreak_profile`]: reference field with a heavy initial outbreak

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use canopy_engine::{PlantParams, WorldConfig};

/// Tick limit high enough that a benchmark never exhausts the run.
pub const UNBOUNDED_TICKS: u64 = u64::MAX;

/// Reference profile: 50x50 field at 40% density with 8 drones.
pub fn reference_profile(seed: u64) -> WorldConfig {
    WorldConfig {
        width: 50,
        height: 50,
        density: 0.4,
        drone_count: 8,
        max_ticks: UNBOUNDED_TICKS,
        seed,
        ..WorldConfig::default()
    }
}

/// Stress profile: 200x200 field (16x the reference cell count).
pub fn stress_profile(seed: u64) -> WorldConfig {
    WorldConfig {
        width: 200,
        height: 200,
        drone_count: 32,
        ..reference_profile(seed)
    }
}

/// Reference field where half the plants start infected and spread fast.
///
/// Keeps the drones busy dispensing and charging instead of exploring.
pub fn outbreak_profile(seed: u64) -> WorldConfig {
    WorldConfig {
        initial_infected_fraction: 0.5,
        propagation_rate: 0.4,
        plant: PlantParams {
            auto_infect_probability: 0.02,
            ..PlantParams::default()
        },
        ..reference_profile(seed)
    }
}
