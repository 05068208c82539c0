//! Autonomous drone agent.
//!
//! Every activation runs five phases in order:
//!
//! 1. **Read** a [`BlackboardSnapshot`].
//! 2. **Sense** the window around the drone into absolute detections.
//! 3. **Decide** the next [`ControlState`] and a [`DroneAction`].
//! 4. **Act**: move, dispense, charge or hold.
//! 5. **Publish** position, positive detections and clear reports.
//!
//! Failures inside a phase are recovered locally and logged; the
//! resulting [`ActionOutcome`] says what actually happened.

use std::fmt;

use canopy_core::{
    DroneId, Mobile, MoveError, Occupant, Position, ResourceError, ResourceMeter, StationId,
    Treatable, TreatmentOutcome,
};
use canopy_space::GridWorld;
use indexmap::IndexMap;
use rand::RngCore;

use crate::blackboard::{BlackboardHandle, BlackboardSnapshot};
use crate::config::DroneParams;
use crate::controller;
use crate::plant::Plant;
use crate::sensor::{Detections, FieldView, Sensor};

// ── ControlState ───────────────────────────────────────────────────

/// Phase of the drone's finite-state controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// Searching with no target.
    Exploring,
    /// Flying to a known target.
    MovingToTarget,
    /// Dispensing medicine on a confirmed infected cell.
    Curing,
    /// Heading for the nearest charging station.
    GoingToChargingStation,
    /// Recharging battery and refilling medicine at a station.
    Charging,
    /// Battery ran out mid-flight. Terminal.
    Dead,
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exploring => "exploring",
            Self::MovingToTarget => "moving_to_target",
            Self::Curing => "curing",
            Self::GoingToChargingStation => "going_to_charging_station",
            Self::Charging => "charging",
            Self::Dead => "dead",
        };
        f.write_str(s)
    }
}

// ── Actions and outcomes ───────────────────────────────────────────

/// What the controller decided to do this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DroneAction {
    /// Stay put.
    Hold,
    /// Fly to an adjacent cell.
    Move(Position),
    /// Dispense one dose on the current cell.
    Dispense,
    /// Recharge and refill.
    Charge,
}

/// What actually happened when the action was carried out.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// The drone is dead and did nothing.
    Inactive,
    /// The drone stayed where it was.
    Held,
    /// The drone moved.
    Moved {
        /// Origin cell.
        from: Position,
        /// Destination cell.
        to: Position,
    },
    /// The move was invalid; the drone held position.
    MoveRejected(MoveError),
    /// The battery was empty; the drone is now dead.
    Exhausted(MoveError),
    /// A dose was applied.
    Dispensed(TreatmentOutcome),
    /// Not enough medicine; nothing changed.
    DispenseRefused(ResourceError),
    /// No infected plant on the cell; nothing changed.
    NothingToTreat,
    /// Resources were topped up.
    Charged {
        /// Battery units added.
        battery: u32,
        /// Medicine units added.
        medicine: u32,
    },
}

/// Mutable world state a drone acts on.
pub struct DroneEnv<'a> {
    /// The grid; the drone moves its own occupant entry.
    pub grid: &'a mut GridWorld,
    /// All plants, indexed by [`PlantId`](canopy_core::PlantId).
    pub plants: &'a mut [Plant],
    /// Run RNG.
    pub rng: &'a mut dyn RngCore,
}

// ── DroneAgent ─────────────────────────────────────────────────────

/// A drone with a battery, a medicine tank, a sensor and a blackboard
/// handle.
pub struct DroneAgent {
    id: DroneId,
    home: StationId,
    position: Position,
    last_position: Option<Position>,
    next_move: Option<Position>,
    state: ControlState,
    target: Option<Position>,
    battery: ResourceMeter,
    medicine: ResourceMeter,
    params: DroneParams,
    treatment_amount: f64,
    sensor: Box<dyn Sensor>,
    blackboard: BlackboardHandle,
    snapshot: BlackboardSnapshot,
    detections: Detections,
}

impl fmt::Debug for DroneAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DroneAgent")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("battery", &self.battery.level())
            .field("medicine", &self.medicine.level())
            .finish_non_exhaustive()
    }
}

impl DroneAgent {
    /// A fully charged drone in the `Exploring` state.
    ///
    /// `treatment_amount` is the health restored per dispense. The drone
    /// does not place itself on the grid.
    pub fn new(
        id: DroneId,
        home: StationId,
        position: Position,
        params: DroneParams,
        treatment_amount: f64,
        sensor: Box<dyn Sensor>,
        blackboard: BlackboardHandle,
    ) -> Self {
        Self {
            id,
            home,
            position,
            last_position: None,
            next_move: None,
            state: ControlState::Exploring,
            target: None,
            battery: ResourceMeter::battery(params.battery_capacity),
            medicine: ResourceMeter::medicine(params.medicine_capacity),
            params,
            treatment_amount,
            sensor,
            blackboard,
            snapshot: BlackboardSnapshot::default(),
            detections: Detections::new(),
        }
    }

    /// Start with `level` battery instead of a full charge.
    pub fn with_battery_level(mut self, level: u32) -> Self {
        self.battery = self.battery.with_level(level);
        self
    }

    /// Start with `level` medicine instead of a full tank.
    pub fn with_medicine_level(mut self, level: u32) -> Self {
        self.medicine = self.medicine.with_level(level);
        self
    }

    /// Drone identifier.
    pub fn id(&self) -> DroneId {
        self.id
    }

    /// The charging station this drone was built on.
    pub fn home_station(&self) -> StationId {
        self.home
    }

    /// Controller phase.
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Current target cell, if any.
    pub fn target(&self) -> Option<Position> {
        self.target
    }

    /// The move decided in the last activation, if it was a move.
    pub fn next_move(&self) -> Option<Position> {
        self.next_move
    }

    /// Battery meter.
    pub fn battery(&self) -> &ResourceMeter {
        &self.battery
    }

    /// Medicine meter.
    pub fn medicine(&self) -> &ResourceMeter {
        &self.medicine
    }

    /// Detections from the last activation.
    pub fn detections(&self) -> &Detections {
        &self.detections
    }

    /// Blackboard contents as read at the start of the last activation.
    pub fn snapshot(&self) -> &BlackboardSnapshot {
        &self.snapshot
    }

    /// Announce the current position on the blackboard.
    pub fn publish_position(&self) {
        // Rejections are logged by the blackboard.
        let _ = self.blackboard.publish_position(self.id, self.position);
    }

    /// Run one activation.
    pub fn step(&mut self, env: &mut DroneEnv<'_>) -> ActionOutcome {
        if self.state == ControlState::Dead {
            return ActionOutcome::Inactive;
        }

        // 1. Read.
        self.snapshot = self.blackboard.snapshot();

        // 2. Sense.
        let field = FieldView::new(env.grid, env.plants);
        let window = self.sensor.capture(self.position, &field, env.rng);
        let (detections, errors) = window.to_absolute(self.position, env.grid);
        for e in errors {
            log::debug!("drone {}: skipped detection: {e}", self.id);
        }
        self.detections = detections;

        // 3. Decide.
        let action = self.decide(env.grid, env.rng);
        self.next_move = match action {
            DroneAction::Move(to) => Some(to),
            _ => None,
        };
        log::trace!(
            "drone {} at {} [{}] decided {:?}",
            self.id,
            self.position,
            self.state,
            action
        );

        // 4. Act.
        let outcome = self.act(action, env);

        // 5. Publish, unless the drone just died.
        if self.state != ControlState::Dead {
            self.publish();
        }
        outcome
    }

    fn set_state(&mut self, next: ControlState) {
        if next != self.state {
            log::debug!("drone {} at {}: {} -> {}", self.id, self.position, self.state, next);
            self.state = next;
        }
    }

    fn own_confidence(&self) -> f64 {
        self.detections.get(&self.position).copied().unwrap_or(0.0)
    }

    // ── Decide ─────────────────────────────────────────────────────

    fn decide(&mut self, grid: &GridWorld, rng: &mut dyn RngCore) -> DroneAction {
        let p = self.params;
        let seeking_power = matches!(
            self.state,
            ControlState::GoingToChargingStation | ControlState::Charging
        );
        if !seeking_power && self.battery.is_below(p.critical_battery_floor) {
            log::debug!(
                "drone {}: battery {} below critical floor, abandoning task",
                self.id,
                self.battery.level()
            );
            self.target = None;
            self.set_state(ControlState::GoingToChargingStation);
        } else if !seeking_power
            && (self.battery.is_below(p.low_resource_threshold)
                || self.medicine.is_below(p.low_resource_threshold))
        {
            self.target = None;
            self.set_state(ControlState::GoingToChargingStation);
        }

        match self.state {
            ControlState::Exploring => self.decide_exploring(grid, rng),
            ControlState::MovingToTarget => {
                let known = self.target.filter(|t| self.snapshot.has_target(*t));
                let target = match known {
                    Some(t) => t,
                    None => {
                        log::debug!("drone {}: target gone, back to exploring", self.id);
                        self.target = None;
                        self.set_state(ControlState::Exploring);
                        return self.decide_exploring(grid, rng);
                    }
                };
                if self.position == target {
                    self.set_state(ControlState::Curing);
                    DroneAction::Dispense
                } else {
                    let others = self.snapshot.other_drones(self.id);
                    DroneAction::Move(controller::move_towards(self.position, target, &others, grid))
                }
            }
            ControlState::Curing => {
                if self.own_confidence() > p.detection_threshold {
                    DroneAction::Dispense
                } else {
                    self.target = None;
                    self.set_state(ControlState::Exploring);
                    DroneAction::Hold
                }
            }
            ControlState::GoingToChargingStation => {
                let stations = self.snapshot.stations().keys().copied();
                match controller::nearest_station(self.position, stations) {
                    Some(s) if s == self.position => {
                        self.set_state(ControlState::Charging);
                        DroneAction::Charge
                    }
                    Some(s) => {
                        let others = self.snapshot.other_drones(self.id);
                        DroneAction::Move(controller::move_towards(self.position, s, &others, grid))
                    }
                    None => {
                        log::warn!("drone {}: no charging station known, exploring", self.id);
                        DroneAction::Move(self.explore_move(grid, rng))
                    }
                }
            }
            ControlState::Charging => {
                if self.battery.is_above(p.high_resource_threshold)
                    && self.medicine.is_above(p.high_resource_threshold)
                {
                    self.set_state(ControlState::Exploring);
                    self.decide_exploring(grid, rng)
                } else {
                    DroneAction::Charge
                }
            }
            ControlState::Dead => DroneAction::Hold,
        }
    }

    fn decide_exploring(&mut self, grid: &GridWorld, rng: &mut dyn RngCore) -> DroneAction {
        if self.own_confidence() > self.params.detection_threshold {
            self.target = Some(self.position);
            self.set_state(ControlState::Curing);
            return DroneAction::Dispense;
        }
        // Standing here without a confident detection: this cell is no
        // target for us.
        let here = self.position;
        let candidates: IndexMap<Position, f64> = self
            .snapshot
            .targets()
            .iter()
            .filter(|(pos, _)| **pos != here)
            .map(|(pos, c)| (*pos, *c))
            .collect();
        if let Some(target) = controller::choose_best_target(&candidates, here) {
            self.target = Some(target);
            self.set_state(ControlState::MovingToTarget);
            let others = self.snapshot.other_drones(self.id);
            return DroneAction::Move(controller::move_towards(here, target, &others, grid));
        }
        DroneAction::Move(self.explore_move(grid, rng))
    }

    fn explore_move(&self, grid: &GridWorld, rng: &mut dyn RngCore) -> Position {
        let others = self.snapshot.other_drones(self.id);
        controller::explore(
            self.position,
            self.last_position,
            &others,
            grid,
            self.params.persistence_probability,
            rng,
        )
    }

    // ── Act ────────────────────────────────────────────────────────

    fn act(&mut self, action: DroneAction, env: &mut DroneEnv<'_>) -> ActionOutcome {
        match action {
            DroneAction::Hold => ActionOutcome::Held,
            DroneAction::Move(to) => self.try_move(to, env.grid),
            DroneAction::Dispense => self.dispense(env),
            DroneAction::Charge => {
                let battery = self.battery.recharge(self.params.recharge_amount);
                let medicine = self.medicine.recharge(self.params.refill_amount);
                ActionOutcome::Charged { battery, medicine }
            }
        }
    }

    /// Move to `to`, spending battery.
    ///
    /// Moving onto the current cell is a free no-op. An off-grid
    /// destination is rejected and the drone holds. An empty battery
    /// kills the drone where it stands and retires it from the
    /// blackboard, so live drones stop steering around its wreck.
    pub fn try_move(&mut self, to: Position, grid: &mut GridWorld) -> ActionOutcome {
        let from = self.position;
        if to == from {
            return ActionOutcome::Held;
        }
        if !grid.in_bounds(to) {
            let err = MoveError::OutOfBounds { from, to };
            log::warn!("drone {}: {err}", self.id);
            return ActionOutcome::MoveRejected(err);
        }
        if !self.battery.can_supply(self.params.move_cost) || self.battery.is_empty() {
            let err = MoveError::BatteryExhausted { at: from };
            log::info!("drone {}: {err}", self.id);
            self.target = None;
            self.next_move = None;
            self.set_state(ControlState::Dead);
            self.blackboard.retire_drone(self.id);
            return ActionOutcome::Exhausted(err);
        }
        if let Err(e) = grid.move_occupant(Occupant::Drone(self.id), from, to) {
            let err = MoveError::Blocked { from, to };
            log::warn!("drone {}: {err}: {e}", self.id);
            return ActionOutcome::MoveRejected(err);
        }
        self.battery.drain(self.params.move_cost);
        self.last_position = Some(from);
        self.position = to;
        ActionOutcome::Moved { from, to }
    }

    fn dispense(&mut self, env: &mut DroneEnv<'_>) -> ActionOutcome {
        let plant = env
            .grid
            .cell(self.position)
            .and_then(|c| c.plant())
            .and_then(|id| env.plants.get_mut(id.0 as usize))
            .filter(|p| p.is_treatable());
        let Some(plant) = plant else {
            log::trace!("drone {}: nothing to treat at {}", self.id, self.position);
            return ActionOutcome::NothingToTreat;
        };
        if let Err(e) = self.medicine.try_consume(self.params.dispense_amount) {
            log::debug!("drone {}: dispense refused: {e}", self.id);
            return ActionOutcome::DispenseRefused(e);
        }
        let outcome = plant.apply_treatment(self.treatment_amount);
        log::debug!(
            "drone {} treated plant {} at {}: {:?}",
            self.id,
            plant.id(),
            self.position,
            outcome
        );
        ActionOutcome::Dispensed(outcome)
    }

    // ── Publish ────────────────────────────────────────────────────

    fn publish(&self) {
        self.publish_position();
        // Rejections are logged by the blackboard.
        for (pos, c) in &self.detections {
            if *c > 0.0 {
                let _ = self.blackboard.publish_detection(*pos, *c);
            } else if *c < 0.0 {
                let _ = self.blackboard.report_clear(*pos, *c);
            }
        }
    }
}

impl Mobile for DroneAgent {
    fn position(&self) -> Position {
        self.position
    }

    fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    fn is_operational(&self) -> bool {
        self.state != ControlState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::{Blackboard, StationAssignment};
    use crate::config::PlantParams;
    use crate::sensor::DetectionWindow;
    use canopy_core::PlantId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    /// Reports the same window every time.
    struct FixedSensor(DetectionWindow);

    impl Sensor for FixedSensor {
        fn capture(&mut self, _: Position, _: &FieldView<'_>, _: &mut dyn RngCore) -> DetectionWindow {
            self.0.clone()
        }
    }

    /// Thresholds that never send the drone home.
    fn tireless() -> DroneParams {
        DroneParams {
            low_resource_threshold: 0,
            critical_battery_floor: 0,
            ..DroneParams::default()
        }
    }

    struct Rig {
        grid: GridWorld,
        plants: Vec<Plant>,
        rng: ChaCha8Rng,
        board: BlackboardHandle,
    }

    impl Rig {
        fn new(w: u32, h: u32) -> Self {
            Self {
                grid: GridWorld::new(w, h).unwrap(),
                plants: Vec::new(),
                rng: ChaCha8Rng::seed_from_u64(11),
                board: BlackboardHandle::new(Blackboard::new(w, h, 0.5)),
            }
        }

        /// An infected plant weakened enough that a zero dose leaves it
        /// infected.
        fn infected_plant(&mut self, pos: Position) {
            let id = PlantId(self.plants.len() as u32);
            let mut plant = Plant::new(id, pos, PlantParams::default());
            plant.infect();
            while plant.health() > 90.0 {
                plant.step(0, 0.0, &mut self.rng);
            }
            assert!(plant.is_infected());
            self.grid.place(pos, Occupant::Plant(id)).unwrap();
            self.plants.push(plant);
        }

        fn drone(&mut self, id: u32, pos: Position, params: DroneParams, window: DetectionWindow) -> DroneAgent {
            self.grid.place(pos, Occupant::Drone(DroneId(id))).unwrap();
            DroneAgent::new(
                DroneId(id),
                StationId(id),
                pos,
                params,
                0.0,
                Box::new(FixedSensor(window)),
                self.board.clone(),
            )
        }

        fn step(&mut self, drone: &mut DroneAgent) -> ActionOutcome {
            let mut env = DroneEnv {
                grid: &mut self.grid,
                plants: &mut self.plants,
                rng: &mut self.rng,
            };
            drone.step(&mut env)
        }
    }

    #[test]
    fn eleventh_move_on_ten_battery_is_terminal() {
        let mut rig = Rig::new(5, 5);
        let mut d = rig
            .drone(0, p(0, 0), tireless(), DetectionWindow::new(1))
            .with_battery_level(10);
        for i in 0..10 {
            let out = rig.step(&mut d);
            assert!(matches!(out, ActionOutcome::Moved { .. }), "move {i}: {out:?}");
        }
        assert_eq!(d.battery().level(), 0);
        let before = d.position();
        let out = rig.step(&mut d);
        assert!(matches!(
            out,
            ActionOutcome::Exhausted(MoveError::BatteryExhausted { .. })
        ));
        assert_eq!(d.state(), ControlState::Dead);
        assert_eq!(d.position(), before);
        assert!(!d.is_operational());
        assert_eq!(rig.step(&mut d), ActionOutcome::Inactive);
    }

    #[test]
    fn eleventh_dispense_is_refused() {
        let mut rig = Rig::new(5, 5);
        rig.infected_plant(p(2, 2));
        let window = DetectionWindow::new(1).with(0, 0, 0.9);
        let mut d = rig.drone(0, p(2, 2), tireless(), window);
        for _ in 0..10 {
            assert!(matches!(
                rig.step(&mut d),
                ActionOutcome::Dispensed(TreatmentOutcome::Improved { .. })
            ));
            assert_eq!(d.state(), ControlState::Curing);
        }
        assert_eq!(d.medicine().level(), 0);
        let out = rig.step(&mut d);
        assert!(matches!(out, ActionOutcome::DispenseRefused(_)));
        assert_eq!(d.medicine().level(), 0);
        assert_eq!(d.position(), p(2, 2));
    }

    #[test]
    fn curing_ends_when_own_cell_reads_clear() {
        let mut rig = Rig::new(5, 5);
        let mut d = rig.drone(0, p(2, 2), tireless(), DetectionWindow::new(1).with(0, 0, 0.9));
        rig.step(&mut d);
        assert_eq!(d.state(), ControlState::Curing);

        d.sensor = Box::new(FixedSensor(DetectionWindow::new(1).with(0, 0, -0.9)));
        assert_eq!(rig.step(&mut d), ActionOutcome::Held);
        assert_eq!(d.state(), ControlState::Exploring);
        assert_eq!(d.target(), None);
    }

    #[test]
    fn known_target_is_approached_then_cured() {
        let mut rig = Rig::new(6, 6);
        rig.board.publish_detection(p(3, 3), 0.9).unwrap();
        let mut d = rig.drone(0, p(0, 0), tireless(), DetectionWindow::new(1));
        assert_eq!(rig.step(&mut d), ActionOutcome::Moved { from: p(0, 0), to: p(1, 1) });
        assert_eq!(d.state(), ControlState::MovingToTarget);
        assert_eq!(d.target(), Some(p(3, 3)));
        rig.step(&mut d);
        rig.step(&mut d);
        assert_eq!(d.position(), p(3, 3));
        rig.step(&mut d);
        assert_eq!(d.state(), ControlState::Curing);
    }

    #[test]
    fn vanished_target_returns_to_exploring() {
        let mut rig = Rig::new(6, 6);
        rig.board.publish_detection(p(5, 5), 0.9).unwrap();
        let mut d = rig.drone(0, p(0, 0), tireless(), DetectionWindow::new(1));
        rig.step(&mut d);
        assert_eq!(d.state(), ControlState::MovingToTarget);
        rig.board.report_clear(p(5, 5), -0.9).unwrap();
        rig.step(&mut d);
        assert_eq!(d.state(), ControlState::Exploring);
        assert_eq!(d.target(), None);
    }

    #[test]
    fn low_battery_charging_cycle() {
        let mut rig = Rig::new(5, 5);
        rig.board
            .register_station(
                p(0, 0),
                StationAssignment {
                    station: StationId(0),
                    drone: DroneId(0),
                },
            )
            .unwrap();
        let mut d = rig
            .drone(0, p(2, 2), DroneParams::default(), DetectionWindow::new(1))
            .with_battery_level(19);
        rig.step(&mut d);
        assert_eq!(d.state(), ControlState::GoingToChargingStation);
        assert_eq!(d.position(), p(1, 1));
        rig.step(&mut d);
        assert_eq!(d.position(), p(0, 0));
        assert!(matches!(rig.step(&mut d), ActionOutcome::Charged { .. }));
        assert_eq!(d.state(), ControlState::Charging);
        let mut ticks = 0;
        while d.state() == ControlState::Charging {
            rig.step(&mut d);
            ticks += 1;
            assert!(ticks < 20);
        }
        assert!(d.battery().is_above(90));
        assert!(d.medicine().is_above(90));
        assert_eq!(d.state(), ControlState::Exploring);
    }

    #[test]
    fn no_station_known_explores_while_seeking() {
        let mut rig = Rig::new(5, 5);
        let mut d = rig
            .drone(0, p(2, 2), DroneParams::default(), DetectionWindow::new(1))
            .with_battery_level(10);
        assert!(matches!(rig.step(&mut d), ActionOutcome::Moved { .. }));
        assert_eq!(d.state(), ControlState::GoingToChargingStation);
    }

    #[test]
    fn detections_are_published_and_cleared() {
        let mut rig = Rig::new(5, 5);
        rig.board.publish_detection(p(1, 1), 0.8).unwrap();
        let window = DetectionWindow::new(1)
            .with(1, 1, 0.9)
            .with(-1, -1, -0.95)
            .with(0, -1, -0.3);
        let mut d = rig.drone(0, p(2, 2), tireless(), window);
        rig.step(&mut d);
        assert_eq!(rig.board.confidence_at(p(3, 3)), Some(0.9));
        assert_eq!(rig.board.confidence_at(p(1, 1)), None);
        assert_eq!(rig.board.target_count(), 1);
        let pos = d.position();
        assert_eq!(rig.board.snapshot().drone_positions()[&DroneId(0)], pos);
    }

    #[test]
    fn out_of_bounds_move_holds_position() {
        let mut rig = Rig::new(3, 3);
        let mut d = rig.drone(0, p(0, 0), tireless(), DetectionWindow::new(1));
        let out = d.try_move(p(-1, 0), &mut rig.grid);
        assert_eq!(
            out,
            ActionOutcome::MoveRejected(MoveError::OutOfBounds {
                from: p(0, 0),
                to: p(-1, 0),
            })
        );
        assert_eq!(d.position(), p(0, 0));
        assert_eq!(d.battery().level(), 100);
        assert!(rig.grid.cell(p(0, 0)).unwrap().has_drone());
    }

    #[test]
    fn unregistered_drone_move_is_blocked() {
        let mut rig = Rig::new(3, 3);
        let mut d = DroneAgent::new(
            DroneId(7),
            StationId(0),
            p(1, 1),
            tireless(),
            0.0,
            Box::new(FixedSensor(DetectionWindow::new(1))),
            rig.board.clone(),
        );
        let out = d.try_move(p(2, 2), &mut rig.grid);
        assert_eq!(
            out,
            ActionOutcome::MoveRejected(MoveError::Blocked {
                from: p(1, 1),
                to: p(2, 2),
            })
        );
        assert_eq!(d.position(), p(1, 1));
        assert_eq!(d.battery().level(), 100);
    }

    #[test]
    fn dead_drone_leaves_the_blackboard() {
        let mut rig = Rig::new(5, 5);
        let mut d = rig
            .drone(0, p(2, 2), tireless(), DetectionWindow::new(1).with(1, 0, 0.9))
            .with_battery_level(0);
        d.publish_position();
        assert!(rig.board.snapshot().drone_positions().contains_key(&DroneId(0)));

        assert!(matches!(rig.step(&mut d), ActionOutcome::Exhausted(_)));
        let snap = rig.board.snapshot();
        assert!(!snap.drone_positions().contains_key(&DroneId(0)));
        // Nothing is published on the dying activation.
        assert!(!snap.has_target(p(3, 2)));
    }
}
