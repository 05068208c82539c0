//! World configuration, validation, and error types.
//!
//! [`WorldConfig`] is the construction input for a
//! [`World`](crate::world::World). [`validate()`](WorldConfig::validate)
//! checks every structural invariant up front so that nothing inside a
//! tick has to.

use std::error::Error;
use std::fmt;

use canopy_space::SpaceError;

// ── PlantParams ────────────────────────────────────────────────────

/// Tuning constants for the plant infection state machine.
///
/// The defaults are placeholder values rather than calibrated
/// epidemiology; every one of them is meant to be overridden.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantParams {
    /// Chance per tick that a healthy plant with no infected neighbour
    /// becomes infected anyway. Default: 0.01.
    pub auto_infect_probability: f64,
    /// Mean health lost per tick while infected. Default: 1.0.
    pub base_degrade_rate: f64,
    /// Health floor; reaching it kills the plant. Default: 5.0.
    pub min_health: f64,
    /// Treatment that lifts health above this cures the plant. Default: 95.0.
    pub max_health: f64,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            auto_infect_probability: 0.01,
            base_degrade_rate: 1.0,
            min_health: 5.0,
            max_health: 95.0,
        }
    }
}

// ── DroneParams ────────────────────────────────────────────────────

/// Capacities, costs and thresholds for the drone controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneParams {
    /// Battery capacity in moves. Default: 100.
    pub battery_capacity: u32,
    /// Medicine capacity in units. Default: 100.
    pub medicine_capacity: u32,
    /// Battery units consumed per move. Default: 1.
    pub move_cost: u32,
    /// Medicine units consumed per dispense. Default: 10.
    pub dispense_amount: u32,
    /// Battery units restored per tick while charging. Default: 10.
    pub recharge_amount: u32,
    /// Medicine units restored per tick while charging. Default: 10.
    pub refill_amount: u32,
    /// Below this (battery or medicine) the drone heads for a station.
    /// Default: 20.
    pub low_resource_threshold: u32,
    /// Charging ends once both resources exceed this. Default: 90.
    pub high_resource_threshold: u32,
    /// Below this battery level the drone abandons any task and heads
    /// for a station. Default: 15.
    pub critical_battery_floor: u32,
    /// Chance that exploration keeps the previous heading. Default: 0.7.
    pub persistence_probability: f64,
    /// Own-cell detection confidence above which a drone starts curing.
    /// Default: 0.5.
    pub detection_threshold: f64,
    /// Negative confidence magnitude above which a cell counts as
    /// confirmed clear and its blackboard target is retracted. Default: 0.5.
    pub clearance_threshold: f64,
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            battery_capacity: 100,
            medicine_capacity: 100,
            move_cost: 1,
            dispense_amount: 10,
            recharge_amount: 10,
            refill_amount: 10,
            low_resource_threshold: 20,
            high_resource_threshold: 90,
            critical_battery_floor: 15,
            persistence_probability: 0.7,
            detection_threshold: 0.5,
            clearance_threshold: 0.5,
        }
    }
}

// ── SensorParams ───────────────────────────────────────────────────

/// Settings for the simulated camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorParams {
    /// Window radius in cells; radius 1 is the 3x3 Moore window. Default: 1.
    pub radius: u32,
    /// Lower bound of reported confidence magnitude. Default: 0.6.
    pub min_confidence: f64,
    /// Upper bound of reported confidence magnitude. Default: 0.99.
    pub max_confidence: f64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            radius: 1,
            min_confidence: 0.6,
            max_confidence: 0.99,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`WorldConfig::validate()`] or world
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid construction failed.
    Space(SpaceError),
    /// A probability or rate is NaN or outside `[0, 1]`.
    InvalidProbability {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `drone_count` is zero.
    NoDrones,
    /// More drones than border cells to host their charging stations.
    TooManyDrones {
        /// Configured drone count.
        requested: u32,
        /// Border cells available.
        available: usize,
    },
    /// `max_ticks` is zero.
    ZeroMaxTicks,
    /// A threshold or capacity invariant is violated.
    InvalidThreshold {
        /// Which invariant.
        reason: String,
    },
    /// Sensor settings are inconsistent.
    InvalidSensor {
        /// Which invariant.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "space: {e}"),
            Self::InvalidProbability { name, value } => {
                write!(f, "{name} must be in [0.0, 1.0], got {value}")
            }
            Self::NoDrones => write!(f, "drone_count must be at least 1"),
            Self::TooManyDrones {
                requested,
                available,
            } => write!(
                f,
                "drone_count {requested} exceeds the {available} border cells available for charging stations"
            ),
            Self::ZeroMaxTicks => write!(f, "max_ticks must be at least 1"),
            Self::InvalidThreshold { reason } => write!(f, "invalid threshold: {reason}"),
            Self::InvalidSensor { reason } => write!(f, "invalid sensor: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a simulation world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// Chance that a soil cell hosts a plant.
    pub density: f64,
    /// Number of drones (and charging stations).
    pub drone_count: u32,
    /// Per-infected-neighbour chance per tick of passing the infection on.
    pub propagation_rate: f64,
    /// Fraction of full health restored by one dispense.
    pub cure_rate: f64,
    /// The scheduler stops after this many ticks.
    pub max_ticks: u64,
    /// RNG seed; identical seed and config give an identical run.
    pub seed: u64,
    /// Chance that a newly created plant starts infected. Default: 0.1.
    pub initial_infected_fraction: f64,
    /// Chance that a cell is barren and can never host a plant. Default: 0.0.
    pub barren_fraction: f64,
    /// Plant state machine tuning.
    pub plant: PlantParams,
    /// Drone controller tuning.
    pub drone: DroneParams,
    /// Simulated camera tuning.
    pub sensor: SensorParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            density: 0.2,
            drone_count: 3,
            propagation_rate: 0.1,
            cure_rate: 0.8,
            max_ticks: 100,
            seed: 0,
            initial_infected_fraction: 0.1,
            barren_fraction: 0.0,
            plant: PlantParams::default(),
            drone: DroneParams::default(),
            sensor: SensorParams::default(),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn border_cell_count(width: u32, height: u32) -> usize {
    if width == 1 || height == 1 {
        (width as usize) * (height as usize)
    } else {
        2 * (width as usize) + 2 * (height as usize) - 4
    }
}

impl WorldConfig {
    /// Health points restored by one dispense: `cure_rate` of full health.
    pub fn treatment_amount(&self) -> f64 {
        self.cure_rate * 100.0
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid must be constructible.
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Space(SpaceError::EmptyGrid));
        }
        // 2. Probabilities and rates.
        check_probability("density", self.density)?;
        check_probability("propagation_rate", self.propagation_rate)?;
        check_probability("cure_rate", self.cure_rate)?;
        check_probability("initial_infected_fraction", self.initial_infected_fraction)?;
        check_probability("barren_fraction", self.barren_fraction)?;
        check_probability("auto_infect_probability", self.plant.auto_infect_probability)?;
        check_probability("persistence_probability", self.drone.persistence_probability)?;
        check_probability("detection_threshold", self.drone.detection_threshold)?;
        check_probability("clearance_threshold", self.drone.clearance_threshold)?;
        // 3. Drones fit on the border.
        if self.drone_count == 0 {
            return Err(ConfigError::NoDrones);
        }
        let available = border_cell_count(self.width, self.height);
        if self.drone_count as usize > available {
            return Err(ConfigError::TooManyDrones {
                requested: self.drone_count,
                available,
            });
        }
        // 4. The run must be able to advance.
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroMaxTicks);
        }
        // 5. Plant thresholds.
        let p = &self.plant;
        if !p.base_degrade_rate.is_finite() || p.base_degrade_rate < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                reason: format!(
                    "base_degrade_rate must be finite and >= 0, got {}",
                    p.base_degrade_rate
                ),
            });
        }
        if !(0.0 <= p.min_health && p.min_health < p.max_health && p.max_health < 100.0) {
            return Err(ConfigError::InvalidThreshold {
                reason: format!(
                    "need 0 <= min_health < max_health < 100, got {} and {}",
                    p.min_health, p.max_health
                ),
            });
        }
        // 6. Drone thresholds.
        let d = &self.drone;
        if d.battery_capacity == 0 {
            return Err(ConfigError::InvalidThreshold {
                reason: "battery_capacity must be at least 1".to_string(),
            });
        }
        if d.low_resource_threshold > d.high_resource_threshold {
            return Err(ConfigError::InvalidThreshold {
                reason: format!(
                    "low_resource_threshold ({}) exceeds high_resource_threshold ({})",
                    d.low_resource_threshold, d.high_resource_threshold
                ),
            });
        }
        if d.high_resource_threshold >= d.battery_capacity.min(d.medicine_capacity) {
            return Err(ConfigError::InvalidThreshold {
                reason: format!(
                    "high_resource_threshold ({}) must be below both capacities, or charging never ends",
                    d.high_resource_threshold
                ),
            });
        }
        if d.critical_battery_floor > d.low_resource_threshold {
            return Err(ConfigError::InvalidThreshold {
                reason: format!(
                    "critical_battery_floor ({}) exceeds low_resource_threshold ({})",
                    d.critical_battery_floor, d.low_resource_threshold
                ),
            });
        }
        if d.recharge_amount == 0 || d.refill_amount == 0 {
            return Err(ConfigError::InvalidThreshold {
                reason: "recharge_amount and refill_amount must be at least 1".to_string(),
            });
        }
        // 7. Sensor.
        let s = &self.sensor;
        if !(0.0 <= s.min_confidence && s.min_confidence <= s.max_confidence && s.max_confidence <= 1.0)
        {
            return Err(ConfigError::InvalidSensor {
                reason: format!(
                    "need 0 <= min_confidence <= max_confidence <= 1, got {} and {}",
                    s.min_confidence, s.max_confidence
                ),
            });
        }
        if s.radius > self.width.max(self.height) {
            return Err(ConfigError::InvalidSensor {
                reason: format!("radius {} larger than the grid", s.radius),
            });
        }
        Ok(())
    }
}
