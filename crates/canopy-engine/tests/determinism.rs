//! Integration test: reproducibility, run-wide invariants and config
//! rejection.
//!
//! A world is a pure function of its config: two worlds built from the
//! same config must produce identical report streams. Across whole runs,
//! plant health stays in range, drones stay on the grid, and meters
//! never overflow.

use canopy_core::{Mobile, TickId};
use canopy_engine::{ConfigError, PlantState, TickReport, World, WorldConfig};

fn busy(seed: u64) -> WorldConfig {
    WorldConfig {
        width: 10,
        height: 10,
        density: 0.6,
        drone_count: 4,
        propagation_rate: 0.3,
        max_ticks: 60,
        seed,
        ..WorldConfig::default()
    }
}

fn reports(cfg: WorldConfig) -> Vec<TickReport> {
    let mut world = World::new(cfg).unwrap();
    let mut out = Vec::new();
    while let Some(r) = world.step() {
        out.push(r);
    }
    out
}

#[test]
fn same_seed_same_run() {
    let a = reports(busy(42));
    let b = reports(busy(42));
    assert_eq!(a.len(), 60);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(reports(busy(1)), reports(busy(2)));
}

#[test]
fn same_seed_same_final_tags() {
    let mut a = World::new(busy(7)).unwrap();
    let mut b = World::new(busy(7)).unwrap();
    a.run();
    b.run();
    assert_eq!(a.occupant_tags(), b.occupant_tags());
    assert_eq!(a.tick(), TickId(60));
}

#[test]
fn invariants_hold_every_tick() {
    for seed in 0..5 {
        let cfg = busy(seed);
        let min = cfg.plant.min_health;
        let mut world = World::new(cfg).unwrap();
        while let Some(report) = world.step() {
            for plant in world.plants() {
                assert!((0.0..=100.0).contains(&plant.health()));
                assert_eq!(plant.state() == PlantState::Dead, plant.health() == min);
                if plant.state() == PlantState::Healthy {
                    assert_eq!(plant.health(), 100.0);
                }
            }
            for drone in world.drones() {
                assert!(world.grid().in_bounds(drone.position()));
                assert!(drone.battery().level() <= drone.battery().capacity());
                assert!(drone.medicine().level() <= drone.medicine().capacity());
                let cell = world.grid().cell(drone.position()).unwrap();
                assert!(cell.drones().any(|id| id == drone.id()));
            }
            assert_eq!(report.census.total, world.plants().len());
            assert!((0.0..=1.0).contains(&report.coverage));
            assert!((0.0..=1.0).contains(&report.score));
        }
    }
}

#[test]
fn invalid_configs_never_build() {
    let cases = [
        WorldConfig {
            height: 0,
            ..WorldConfig::default()
        },
        WorldConfig {
            cure_rate: -0.1,
            ..WorldConfig::default()
        },
        WorldConfig {
            width: 2,
            height: 2,
            drone_count: 5,
            ..WorldConfig::default()
        },
        WorldConfig {
            max_ticks: 0,
            ..WorldConfig::default()
        },
    ];
    for cfg in cases {
        let err = World::new(cfg).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
    let err = World::new(WorldConfig {
        width: 2,
        height: 2,
        drone_count: 5,
        ..WorldConfig::default()
    })
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::TooManyDrones {
            requested: 5,
            available: 4,
        }
    );
}
