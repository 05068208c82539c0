//! Preset configurations and a hand-driven drone rig.
//!
//! - [`quiet_config`]: no spontaneous or initial infection, so the only
//!   infections are the ones a test seeds.
//! - [`tireless_params`]: drone thresholds that never send it home.
//! - [`DroneRig`]: grid, plants, RNG and blackboard for stepping drones
//!   one at a time in a chosen order.

use canopy_core::{DroneId, Occupant, PlantId, Position, StationId};
use canopy_engine::{
    ActionOutcome, Blackboard, BlackboardHandle, DroneAgent, DroneEnv, DroneParams, Plant,
    PlantParams, Sensor, StationAssignment, WorldConfig,
};
use canopy_space::GridWorld;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A `width x height` config with no background infection.
///
/// Density 0, one drone, 10 ticks. Override fields as needed.
pub fn quiet_config(width: u32, height: u32) -> WorldConfig {
    WorldConfig {
        width,
        height,
        density: 0.0,
        drone_count: 1,
        max_ticks: 10,
        initial_infected_fraction: 0.0,
        plant: PlantParams {
            auto_infect_probability: 0.0,
            ..PlantParams::default()
        },
        ..WorldConfig::default()
    }
}

/// Drone parameters that never trigger a trip to a charging station.
pub fn tireless_params() -> DroneParams {
    DroneParams {
        low_resource_threshold: 0,
        critical_battery_floor: 0,
        ..DroneParams::default()
    }
}

/// Standalone environment for driving drones by hand.
pub struct DroneRig {
    pub grid: GridWorld,
    pub plants: Vec<Plant>,
    pub rng: ChaCha8Rng,
    pub board: BlackboardHandle,
}

impl DroneRig {
    /// Empty `width x height` field with a clearance threshold of 0.5.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let grid = match GridWorld::new(width, height) {
            Ok(g) => g,
            Err(e) => panic!("rig grid: {e}"),
        };
        Self {
            grid,
            plants: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            board: BlackboardHandle::new(Blackboard::new(width, height, 0.5)),
        }
    }

    /// Plant a healthy or infected plant at `pos`.
    pub fn plant(&mut self, pos: Position, infected: bool) -> PlantId {
        let id = PlantId(self.plants.len() as u32);
        let mut plant = Plant::new(id, pos, PlantParams::default());
        if infected {
            plant.infect();
        }
        self.grid
            .place(pos, Occupant::Plant(id))
            .unwrap_or_else(|e| panic!("rig plant: {e}"));
        self.plants.push(plant);
        id
    }

    /// Register station `id` at `pos` for drone `id`.
    pub fn station(&mut self, id: u32, pos: Position) {
        self.grid
            .place(pos, Occupant::ChargingStation(StationId(id)))
            .unwrap_or_else(|e| panic!("rig station: {e}"));
        self.board
            .register_station(
                pos,
                StationAssignment {
                    station: StationId(id),
                    drone: DroneId(id),
                },
            )
            .unwrap_or_else(|e| panic!("rig station: {e}"));
    }

    /// Place a drone at `pos` and publish its position.
    pub fn drone(
        &mut self,
        id: u32,
        pos: Position,
        params: DroneParams,
        sensor: impl Sensor + 'static,
    ) -> DroneAgent {
        self.grid
            .place(pos, Occupant::Drone(DroneId(id)))
            .unwrap_or_else(|e| panic!("rig drone: {e}"));
        let drone = DroneAgent::new(
            DroneId(id),
            StationId(id),
            pos,
            params,
            80.0,
            Box::new(sensor),
            self.board.clone(),
        );
        drone.publish_position();
        drone
    }

    /// Run one activation of `drone`.
    pub fn step(&mut self, drone: &mut DroneAgent) -> ActionOutcome {
        let mut env = DroneEnv {
            grid: &mut self.grid,
            plants: &mut self.plants,
            rng: &mut self.rng,
        };
        drone.step(&mut env)
    }
}
