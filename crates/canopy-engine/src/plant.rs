//! Plant infection state machine.
//!
//! A [`Plant`] is `Healthy`, `Infected` or `Dead`. Healthy plants catch
//! the infection from infected Moore neighbours (or, rarely, on their
//! own); infected plants lose health every tick until they die or are
//! treated. Death is terminal.

use std::fmt;

use canopy_core::{PlantId, Position, Treatable, TreatmentOutcome};
use rand::{Rng, RngCore};

use crate::config::PlantParams;

/// Health of a healthy plant.
pub const FULL_HEALTH: f64 = 100.0;

/// Infection state of a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlantState {
    /// Full health, susceptible.
    Healthy,
    /// Losing health every tick.
    Infected,
    /// Terminal.
    Dead,
}

impl fmt::Display for PlantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Infected => write!(f, "infected"),
            Self::Dead => write!(f, "dead"),
        }
    }
}

/// A state change produced by [`Plant::step()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlantTransition {
    /// Healthy to infected.
    Infected {
        /// False for a spontaneous infection.
        by_neighbour: bool,
    },
    /// Infected to dead.
    Died,
}

/// A stationary plant occupying one grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Plant {
    id: PlantId,
    position: Position,
    state: PlantState,
    health: f64,
    params: PlantParams,
}

impl Plant {
    /// A healthy plant at full health.
    pub fn new(id: PlantId, position: Position, params: PlantParams) -> Self {
        Self {
            id,
            position,
            state: PlantState::Healthy,
            health: FULL_HEALTH,
            params,
        }
    }

    /// Plant identifier.
    pub fn id(&self) -> PlantId {
        self.id
    }

    /// Cell the plant grows on.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current infection state.
    pub fn state(&self) -> PlantState {
        self.state
    }

    /// Current health in `[0, 100]`.
    pub fn health(&self) -> f64 {
        self.health
    }

    /// True while infected.
    pub fn is_infected(&self) -> bool {
        self.state == PlantState::Infected
    }

    /// True once dead.
    pub fn is_dead(&self) -> bool {
        self.state == PlantState::Dead
    }

    /// Infect a healthy plant. Returns false (and changes nothing) for
    /// any other state.
    pub fn infect(&mut self) -> bool {
        if self.state == PlantState::Healthy {
            self.state = PlantState::Infected;
            true
        } else {
            false
        }
    }

    /// Advance one tick.
    ///
    /// `infected_neighbours` is the number of infected Moore neighbours
    /// at the moment of activation. Each gets an independent chance of
    /// `propagation_rate` to pass the infection on.
    pub fn step(
        &mut self,
        infected_neighbours: usize,
        propagation_rate: f64,
        rng: &mut dyn RngCore,
    ) -> Option<PlantTransition> {
        match self.state {
            PlantState::Healthy => {
                for _ in 0..infected_neighbours {
                    if rng.random_bool(propagation_rate) {
                        self.state = PlantState::Infected;
                        return Some(PlantTransition::Infected { by_neighbour: true });
                    }
                }
                if rng.random_bool(self.params.auto_infect_probability) {
                    log::debug!("plant {} at {} infected spontaneously", self.id, self.position);
                    self.state = PlantState::Infected;
                    return Some(PlantTransition::Infected {
                        by_neighbour: false,
                    });
                }
                None
            }
            PlantState::Infected => {
                let rate = self.params.base_degrade_rate;
                let jitter = rate * (rng.random::<f64>() - rng.random::<f64>());
                self.health = (self.health - (rate + jitter)).clamp(0.0, FULL_HEALTH);
                if self.health <= self.params.min_health {
                    self.die();
                    Some(PlantTransition::Died)
                } else {
                    None
                }
            }
            PlantState::Dead => None,
        }
    }

    fn die(&mut self) {
        self.state = PlantState::Dead;
        self.health = self.params.min_health;
    }
}

impl Treatable for Plant {
    fn is_treatable(&self) -> bool {
        self.is_infected()
    }

    fn apply_treatment(&mut self, amount: f64) -> TreatmentOutcome {
        if !self.is_infected() {
            return TreatmentOutcome::NotApplicable;
        }
        self.health = (self.health + amount).clamp(0.0, FULL_HEALTH);
        if self.health > self.params.max_health {
            self.state = PlantState::Healthy;
            self.health = FULL_HEALTH;
            TreatmentOutcome::Cured
        } else if self.health <= self.params.min_health {
            self.die();
            TreatmentOutcome::Died
        } else {
            TreatmentOutcome::Improved {
                health: self.health,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn plant() -> Plant {
        Plant::new(PlantId(0), Position::new(2, 2), PlantParams::default())
    }

    fn quiet_params() -> PlantParams {
        PlantParams {
            auto_infect_probability: 0.0,
            ..PlantParams::default()
        }
    }

    #[test]
    fn new_plant_is_healthy_at_full_health() {
        let p = plant();
        assert_eq!(p.state(), PlantState::Healthy);
        assert_eq!(p.health(), FULL_HEALTH);
    }

    #[test]
    fn certain_propagation_infects() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut p = Plant::new(PlantId(0), Position::new(0, 0), quiet_params());
        assert_eq!(
            p.step(1, 1.0, &mut rng),
            Some(PlantTransition::Infected { by_neighbour: true })
        );
        assert!(p.is_infected());
    }

    #[test]
    fn zero_rates_never_infect() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut p = Plant::new(PlantId(0), Position::new(0, 0), quiet_params());
        for _ in 0..200 {
            assert_eq!(p.step(8, 0.0, &mut rng), None);
        }
        assert_eq!(p.state(), PlantState::Healthy);
    }

    #[test]
    fn certain_auto_infection_is_spontaneous() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let params = PlantParams {
            auto_infect_probability: 1.0,
            ..PlantParams::default()
        };
        let mut p = Plant::new(PlantId(0), Position::new(0, 0), params);
        assert_eq!(
            p.step(0, 0.0, &mut rng),
            Some(PlantTransition::Infected {
                by_neighbour: false
            })
        );
    }

    #[test]
    fn infected_plant_degrades_then_dies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut p = plant();
        assert!(p.infect());
        let before = p.health();
        assert_eq!(p.step(0, 0.0, &mut rng), None);
        let lost = before - p.health();
        assert!(lost > 0.0 && lost < 2.0, "lost {lost}");

        let mut died = false;
        for _ in 0..1000 {
            if p.step(0, 0.0, &mut rng) == Some(PlantTransition::Died) {
                died = true;
                break;
            }
        }
        assert!(died);
        assert_eq!(p.state(), PlantState::Dead);
        assert_eq!(p.health(), PlantParams::default().min_health);
        assert_eq!(p.step(8, 1.0, &mut rng), None);
    }

    #[test]
    fn infect_only_from_healthy() {
        let mut p = plant();
        assert!(p.infect());
        assert!(!p.infect());
    }

    #[test]
    fn treatment_cures_above_max_health() {
        let mut p = plant();
        p.infect();
        p.health = 50.0;
        assert_eq!(p.apply_treatment(80.0), TreatmentOutcome::Cured);
        assert_eq!(p.state(), PlantState::Healthy);
        assert_eq!(p.health(), FULL_HEALTH);
    }

    #[test]
    fn partial_treatment_improves() {
        let mut p = plant();
        p.infect();
        p.health = 40.0;
        assert_eq!(
            p.apply_treatment(10.0),
            TreatmentOutcome::Improved { health: 50.0 }
        );
        assert!(p.is_infected());
    }

    #[test]
    fn treatment_below_min_kills() {
        let mut p = plant();
        p.infect();
        p.health = 10.0;
        assert_eq!(p.apply_treatment(-20.0), TreatmentOutcome::Died);
        assert_eq!(p.health(), PlantParams::default().min_health);
        assert!(p.is_dead());
    }

    #[test]
    fn treatment_on_healthy_or_dead_is_not_applicable() {
        let mut p = plant();
        assert!(!p.is_treatable());
        assert_eq!(p.apply_treatment(50.0), TreatmentOutcome::NotApplicable);
        assert_eq!(p.health(), FULL_HEALTH);

        p.infect();
        p.die();
        assert_eq!(p.apply_treatment(50.0), TreatmentOutcome::NotApplicable);
        assert!(p.is_dead());
    }

    proptest! {
        #[test]
        fn health_stays_in_bounds_and_dead_means_min(
            seed in any::<u64>(),
            neighbours in 0usize..9,
            rate in 0.0f64..=1.0,
            degrade in 0.0f64..20.0,
            ticks in 1usize..200,
        ) {
            let params = PlantParams { base_degrade_rate: degrade, ..PlantParams::default() };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut p = Plant::new(PlantId(0), Position::new(0, 0), params);
            for _ in 0..ticks {
                p.step(neighbours, rate, &mut rng);
                prop_assert!((0.0..=FULL_HEALTH).contains(&p.health()));
                prop_assert_eq!(p.is_dead(), p.health() == params.min_health);
                if p.state() == PlantState::Healthy {
                    prop_assert_eq!(p.health(), FULL_HEALTH);
                }
            }
        }

        #[test]
        fn treating_healthy_never_changes_health(amount in -200.0f64..200.0) {
            let mut p = plant();
            prop_assert_eq!(p.apply_treatment(amount), TreatmentOutcome::NotApplicable);
            prop_assert_eq!(p.health(), FULL_HEALTH);
        }
    }
}
