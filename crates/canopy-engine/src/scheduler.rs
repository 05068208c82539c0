//! Tick clock and randomized activation order.
//!
//! The [`Scheduler`] owns the run's only RNG. World construction, plant
//! transitions, sensor noise, exploration and the activation shuffle all
//! draw from it, so a seed fully determines a run.

use canopy_core::TickId;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// An agent to activate, by index into the world's plant or drone list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentRef {
    /// Index into the plant list.
    Plant(usize),
    /// Index into the drone list.
    Drone(usize),
}

/// Tick counter, running flag and RNG.
#[derive(Clone, Debug)]
pub struct Scheduler {
    rng: ChaCha8Rng,
    tick: TickId,
    max_ticks: u64,
    running: bool,
}

impl Scheduler {
    /// A running scheduler at tick 0.
    pub fn new(rng: ChaCha8Rng, max_ticks: u64) -> Self {
        Self {
            rng,
            tick: TickId::default(),
            max_ticks,
            running: max_ticks > 0,
        }
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Tick limit.
    pub fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// False once stopped or out of ticks.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Halt the run. Further ticks are refused.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("scheduler stopped at tick {}", self.tick);
        }
        self.running = false;
    }

    /// The run RNG.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Every plant and drone exactly once, freshly shuffled.
    pub fn activation_order(&mut self, plants: usize, drones: usize) -> Vec<AgentRef> {
        let mut order: Vec<AgentRef> = (0..plants)
            .map(AgentRef::Plant)
            .chain((0..drones).map(AgentRef::Drone))
            .collect();
        order.shuffle(&mut self.rng);
        order
    }

    /// Close the current tick. Returns false once the tick limit is
    /// reached.
    pub fn advance(&mut self) -> bool {
        self.tick = self.tick.next();
        if self.tick.0 >= self.max_ticks {
            log::info!("reached max_ticks ({})", self.max_ticks);
            self.running = false;
        }
        self.running
    }
}
