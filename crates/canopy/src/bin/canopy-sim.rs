//! Headless runner: builds a world from command-line flags, runs it to
//! completion and logs one summary line per tick.

use std::process::ExitCode;

use canopy::engine::{SensorParams, TickReport, World, WorldConfig};
use clap::Parser;

/// Simulate drones treating an infected crop field
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid columns
    #[arg(long, default_value_t = 12)]
    width: u32,
    /// Grid rows
    #[arg(long, default_value_t = 12)]
    height: u32,
    /// Chance that a soil cell hosts a plant
    #[arg(long, default_value_t = 0.2)]
    density: f64,
    /// Number of drones (one charging station each)
    #[arg(long, default_value_t = 3)]
    drones: u32,
    /// Per-infected-neighbour infection chance per tick
    #[arg(long, default_value_t = 0.1)]
    propagation_rate: f64,
    /// Fraction of full health restored by one dose
    #[arg(long, default_value_t = 0.8)]
    cure_rate: f64,
    /// Number of ticks to run
    #[arg(long, default_value_t = 100)]
    max_ticks: u64,
    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Chance that a plant starts infected
    #[arg(long, default_value_t = 0.1)]
    initial_infected: f64,
    /// Chance that a cell is barren
    #[arg(long, default_value_t = 0.0)]
    barren: f64,
    /// Camera window radius
    #[arg(long, default_value_t = 1)]
    sensor_radius: u32,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn world_config(&self) -> WorldConfig {
        WorldConfig {
            width: self.width,
            height: self.height,
            density: self.density,
            drone_count: self.drones,
            propagation_rate: self.propagation_rate,
            cure_rate: self.cure_rate,
            max_ticks: self.max_ticks,
            seed: self.seed,
            initial_infected_fraction: self.initial_infected,
            barren_fraction: self.barren,
            sensor: SensorParams {
                radius: self.sensor_radius,
                ..SensorParams::default()
            },
            ..WorldConfig::default()
        }
    }
}

fn summary(report: &TickReport) -> String {
    let c = &report.census;
    format!(
        "tick {}: healthy={} infected={} dead={} targets={} drones={}/{} coverage={:.2} score={:.3}",
        report.tick,
        c.healthy,
        c.infected,
        c.dead,
        report.detected_targets,
        report.operational_drones(),
        report.drones.len(),
        report.coverage,
        report.score,
    )
}

fn main() -> ExitCode {
    let args = Args::parse();
    canopy::logging::init(args.verbose);

    let mut world = match World::new(args.world_config()) {
        Ok(w) => w,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("{}", summary(&world.report()));
    while let Some(report) = world.step() {
        log::info!("{}", summary(&report));
        let e = &report.events;
        log::debug!(
            "tick {} events: infections={}+{} deaths={} doses={} cures={} refused={} rejected_moves={} drone_deaths={}",
            report.tick,
            e.neighbour_infections,
            e.spontaneous_infections,
            e.plant_deaths,
            e.doses,
            e.cures,
            e.refused_doses,
            e.rejected_moves,
            e.drone_deaths,
        );
    }

    let last = world.report();
    log::info!("final {}", summary(&last));
    for d in &last.drones {
        log::info!(
            "drone {} {} at {} battery={} medicine={}",
            d.id,
            d.state,
            d.position,
            d.battery,
            d.medicine
        );
    }
    ExitCode::SUCCESS
}
