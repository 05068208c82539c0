//! World construction and the per-tick loop.
//!
//! # Construction
//!
//! [`World::new`] validates the [`WorldConfig`], then draws from the
//! seeded RNG in a fixed order:
//!
//! 1. terrain, row-major: each cell is barren with `barren_fraction`;
//! 2. plants, row-major: each soil cell grows one with `density`, and
//!    each new plant starts infected with `initial_infected_fraction`.
//!
//! Charging stations are spread evenly along the clockwise border and
//! each drone starts on its own station.
//!
//! # Ticks
//!
//! [`World::step`] activates every plant and every live drone once, in
//! an order reshuffled every tick. Plants read their neighbours' states
//! live, so an infection can travel more than one cell per tick when the
//! activation order lines up. After every tick the visibility overlay
//! is rebuilt from the blackboard's drone positions and targets, the
//! same data drones steer by.

use canopy_core::{
    DroneId, Mobile, Occupant, PlantId, Position, StationId, TickId, TreatmentOutcome,
};
use canopy_space::{GridWorld, Terrain};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::blackboard::{Blackboard, BlackboardHandle, StationAssignment};
use crate::config::{ConfigError, WorldConfig};
use crate::drone::{ActionOutcome, DroneAgent, DroneEnv};
use crate::metrics::{performance_score, DroneStatus, PlantCensus, TickEvents, TickReport};
use crate::plant::{Plant, PlantTransition};
use crate::scheduler::{AgentRef, Scheduler};
use crate::sensor::{Sensor, SimulatedCamera};
use crate::tags::{CellTag, HealthBucket, OccupantTag};
use crate::visibility::VisibilityOverlay;

// ── ChargingStation ────────────────────────────────────────────────

/// A fixed charging station on the grid border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChargingStation {
    /// Station identifier.
    pub id: StationId,
    /// Border cell.
    pub position: Position,
    /// The drone built on this station.
    pub drone: DroneId,
}

// ── World ──────────────────────────────────────────────────────────

/// A complete simulation: grid, plants, drones, stations, blackboard,
/// overlay and scheduler.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    grid: GridWorld,
    plants: Vec<Plant>,
    drones: Vec<DroneAgent>,
    stations: Vec<ChargingStation>,
    blackboard: BlackboardHandle,
    overlay: VisibilityOverlay,
    scheduler: Scheduler,
    last_events: TickEvents,
}

impl World {
    /// Build a world where every drone carries a [`SimulatedCamera`].
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let sensor = config.sensor;
        Self::with_sensors(config, |_| Box::new(SimulatedCamera::new(sensor)))
    }

    /// Build a world, asking `make_sensor` for each drone's sensor.
    pub fn with_sensors<F>(config: WorldConfig, mut make_sensor: F) -> Result<Self, ConfigError>
    where
        F: FnMut(DroneId) -> Box<dyn Sensor>,
    {
        config.validate()?;
        let mut grid = GridWorld::new(config.width, config.height)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        // Terrain.
        let positions: Vec<Position> = grid.positions().collect();
        for &pos in &positions {
            if rng.random_bool(config.barren_fraction) {
                grid.set_terrain(pos, Terrain::Barren)?;
            }
        }

        // Plants.
        let mut plants = Vec::new();
        for &pos in &positions {
            let plantable = grid.cell(pos).is_some_and(|c| c.terrain().allows_plants());
            if !plantable || !rng.random_bool(config.density) {
                continue;
            }
            let id = PlantId(plants.len() as u32);
            let mut plant = Plant::new(id, pos, config.plant);
            if rng.random_bool(config.initial_infected_fraction) {
                plant.infect();
            }
            grid.place(pos, Occupant::Plant(id))?;
            plants.push(plant);
        }

        // Stations and drones.
        let blackboard = BlackboardHandle::new(Blackboard::new(
            config.width,
            config.height,
            config.drone.clearance_threshold,
        ));
        let border = grid.border_positions();
        let n = config.drone_count as usize;
        let mut stations = Vec::with_capacity(n);
        let mut drones = Vec::with_capacity(n);
        for i in 0..n {
            let pos = border[i * border.len() / n];
            let station = ChargingStation {
                id: StationId(i as u32),
                position: pos,
                drone: DroneId(i as u32),
            };
            grid.place(pos, Occupant::ChargingStation(station.id))?;
            grid.place(pos, Occupant::Drone(station.drone))?;
            if let Err(e) = blackboard.register_station(
                pos,
                StationAssignment {
                    station: station.id,
                    drone: station.drone,
                },
            ) {
                log::warn!("station {}: {e}", station.id);
            }
            let drone = DroneAgent::new(
                station.drone,
                station.id,
                pos,
                config.drone,
                config.treatment_amount(),
                make_sensor(station.drone),
                blackboard.clone(),
            );
            drone.publish_position();
            stations.push(station);
            drones.push(drone);
        }

        let mut overlay = VisibilityOverlay::new(&grid);
        let board = blackboard.snapshot();
        overlay.recompute(
            &grid,
            board.drone_positions().values().copied(),
            board.targets().keys().copied(),
        );

        let census = PlantCensus::count(&plants);
        log::info!(
            "built {}x{} world: {} plants ({} infected), {} drones, seed {}",
            config.width,
            config.height,
            census.total,
            census.infected,
            n,
            config.seed
        );

        let scheduler = Scheduler::new(rng, config.max_ticks);
        Ok(Self {
            config,
            grid,
            plants,
            drones,
            stations,
            blackboard,
            overlay,
            scheduler,
            last_events: TickEvents::default(),
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The configuration the world was built from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The grid.
    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    /// All plants, indexed by [`PlantId`](canopy_core::PlantId).
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// All drones, indexed by [`DroneId`].
    pub fn drones(&self) -> &[DroneAgent] {
        &self.drones
    }

    /// All charging stations, indexed by [`StationId`].
    pub fn stations(&self) -> &[ChargingStation] {
        &self.stations
    }

    /// The shared blackboard.
    pub fn blackboard(&self) -> &BlackboardHandle {
        &self.blackboard
    }

    /// Visibility counters as of the end of the last tick.
    pub fn overlay(&self) -> &VisibilityOverlay {
        &self.overlay
    }

    /// Ticks completed.
    pub fn tick(&self) -> TickId {
        self.scheduler.tick()
    }

    /// False once stopped or out of ticks.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Halt the run.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// The plant growing at `pos`.
    pub fn plant_at(&self, pos: Position) -> Option<&Plant> {
        let id = self.grid.cell(pos)?.plant()?;
        self.plants.get(id.0 as usize)
    }

    /// Mutable access to the plant at `pos`, for seeding scenarios.
    pub fn plant_at_mut(&mut self, pos: Position) -> Option<&mut Plant> {
        let id = self.grid.cell(pos)?.plant()?;
        self.plants.get_mut(id.0 as usize)
    }

    /// The drone with id `id`.
    pub fn drone(&self, id: DroneId) -> Option<&DroneAgent> {
        self.drones.get(id.0 as usize)
    }

    // ── Tick loop ──────────────────────────────────────────────────

    /// Run one tick. Returns `None` (and does nothing) once halted.
    pub fn step(&mut self) -> Option<TickReport> {
        if !self.scheduler.is_running() {
            return None;
        }
        let order = self
            .scheduler
            .activation_order(self.plants.len(), self.drones.len());
        let mut events = TickEvents::default();
        for agent in order {
            match agent {
                AgentRef::Plant(i) => self.activate_plant(i, &mut events),
                AgentRef::Drone(i) => self.activate_drone(i, &mut events),
            }
        }
        self.scheduler.advance();

        let board = self.blackboard.snapshot();
        self.overlay.recompute(
            &self.grid,
            board.drone_positions().values().copied(),
            board.targets().keys().copied(),
        );
        self.last_events = events;

        let report = self.report();
        log::debug!(
            "tick {}: healthy {} infected {} dead {} targets {} coverage {:.2}",
            report.tick,
            report.census.healthy,
            report.census.infected,
            report.census.dead,
            report.detected_targets,
            report.coverage
        );
        Some(report)
    }

    /// Step until halted; returns the final report.
    pub fn run(&mut self) -> TickReport {
        while self.step().is_some() {}
        self.report()
    }

    fn activate_plant(&mut self, i: usize, events: &mut TickEvents) {
        let pos = self.plants[i].position();
        let plants = &self.plants;
        let infected = self
            .grid
            .neighbour_occupants(pos)
            .filter_map(Occupant::as_plant)
            .filter(|id| plants.get(id.0 as usize).is_some_and(Plant::is_infected))
            .count();
        let rate = self.config.propagation_rate;
        match self.plants[i].step(infected, rate, self.scheduler.rng_mut()) {
            Some(PlantTransition::Infected { by_neighbour: true }) => {
                events.neighbour_infections += 1;
            }
            Some(PlantTransition::Infected {
                by_neighbour: false,
            }) => events.spontaneous_infections += 1,
            Some(PlantTransition::Died) => {
                log::debug!("plant {} at {} died", self.plants[i].id(), pos);
                events.plant_deaths += 1;
            }
            None => {}
        }
    }

    fn activate_drone(&mut self, i: usize, events: &mut TickEvents) {
        if !self.drones[i].is_operational() {
            return;
        }
        let mut env = DroneEnv {
            grid: &mut self.grid,
            plants: &mut self.plants,
            rng: self.scheduler.rng_mut(),
        };
        match self.drones[i].step(&mut env) {
            ActionOutcome::Dispensed(outcome) => {
                events.doses += 1;
                match outcome {
                    TreatmentOutcome::Cured => events.cures += 1,
                    TreatmentOutcome::Died => events.plant_deaths += 1,
                    _ => {}
                }
            }
            ActionOutcome::DispenseRefused(_) => events.refused_doses += 1,
            ActionOutcome::MoveRejected(_) => events.rejected_moves += 1,
            ActionOutcome::Exhausted(_) => events.drone_deaths += 1,
            _ => {}
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    /// The current state as a [`TickReport`]; `events` describe the last
    /// tick.
    pub fn report(&self) -> TickReport {
        let census = PlantCensus::count(&self.plants);
        let detected = self.blackboard.target_count();
        TickReport {
            tick: self.scheduler.tick(),
            census,
            detected_targets: detected,
            drones: self
                .drones
                .iter()
                .map(|d| DroneStatus {
                    id: d.id(),
                    state: d.state(),
                    position: d.position(),
                    battery: d.battery().level(),
                    medicine: d.medicine().level(),
                    target: d.target(),
                })
                .collect(),
            coverage: self.overlay.coverage(),
            score: performance_score(&census, detected),
            events: self.last_events,
        }
    }

    fn tag_for(&self, occupant: Occupant, cell_has_drone: bool) -> Option<OccupantTag> {
        match occupant {
            Occupant::Plant(id) => self.plants.get(id.0 as usize).map(|p| OccupantTag::Plant {
                state: p.state(),
                health: HealthBucket::from_health(p.health()),
            }),
            Occupant::Drone(id) => self
                .drones
                .get(id.0 as usize)
                .map(|d| OccupantTag::Drone { state: d.state() }),
            Occupant::ChargingStation(_) => Some(OccupantTag::ChargingStation {
                occupied: cell_has_drone,
            }),
        }
    }

    /// Every occupant on the grid with its rendering tag, row-major.
    pub fn occupant_tags(&self) -> Vec<(Position, OccupantTag)> {
        let mut out = Vec::new();
        for cell in self.grid.cells() {
            let has_drone = cell.has_drone();
            for occ in cell.occupants() {
                if let Some(tag) = self.tag_for(*occ, has_drone) {
                    out.push((cell.position(), tag));
                }
            }
        }
        out
    }

    /// Tag for the top-most occupant of `pos`; `None` off the grid.
    pub fn cell_tag(&self, pos: Position) -> Option<CellTag> {
        let cell = self.grid.cell(pos)?;
        let has_drone = cell.has_drone();
        let top = cell
            .occupants()
            .iter()
            .filter_map(|o| self.tag_for(*o, has_drone))
            .max_by_key(OccupantTag::layer);
        Some(top.map_or(CellTag::Empty, CellTag::Occupied))
    }
}
