//! Capability traits for grid occupants.
//!
//! Behaviour is dispatched on what an occupant can do, not on what it
//! is: a drone's medicine dispenser only needs something [`Treatable`],
//! and the overlay and scheduler only need something [`Mobile`].

use crate::position::Position;

/// Result of applying a dose of treatment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreatmentOutcome {
    /// The target was not in a treatable state; nothing changed.
    NotApplicable,
    /// Health changed but the target is still infected.
    Improved {
        /// Health after the dose.
        health: f64,
    },
    /// The dose pushed health over the recovery threshold.
    Cured,
    /// The dose left health at or below the death threshold.
    Died,
}

impl TreatmentOutcome {
    /// True if the dose had any effect.
    pub fn was_applied(self) -> bool {
        !matches!(self, Self::NotApplicable)
    }
}

/// Something that can receive medicine.
pub trait Treatable {
    /// True if a dose would currently have any effect.
    fn is_treatable(&self) -> bool;

    /// Apply `amount` health points of treatment.
    ///
    /// Must be a no-op returning [`TreatmentOutcome::NotApplicable`] when
    /// [`is_treatable`](Treatable::is_treatable) is false.
    fn apply_treatment(&mut self, amount: f64) -> TreatmentOutcome;
}

/// Something that moves between cells.
pub trait Mobile {
    /// Current cell.
    fn position(&self) -> Position;

    /// Cell occupied before the most recent successful move, if any.
    fn last_position(&self) -> Option<Position>;

    /// False once the occupant can no longer act (e.g. out of battery).
    fn is_operational(&self) -> bool;
}
