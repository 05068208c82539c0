//! Bounded resource counters (battery, medicine).
//!
//! A [`ResourceMeter`] is owned exclusively by one drone. Levels are
//! whole units in `[0, capacity]`; every operation preserves that range.

use std::fmt;

use crate::error::ResourceError;

/// Which resource a meter tracks. Used in error messages and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Flight battery; one unit per move.
    Battery,
    /// Treatment payload; a fixed amount per dispense.
    Medicine,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Battery => write!(f, "battery"),
            Self::Medicine => write!(f, "medicine"),
        }
    }
}

/// A bounded counter with consume / recharge / refill operations and
/// threshold queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceMeter {
    kind: ResourceKind,
    level: u32,
    capacity: u32,
}

impl ResourceMeter {
    /// A full meter of the given kind and capacity.
    pub fn new(kind: ResourceKind, capacity: u32) -> Self {
        Self {
            kind,
            level: capacity,
            capacity,
        }
    }

    /// A full battery.
    pub fn battery(capacity: u32) -> Self {
        Self::new(ResourceKind::Battery, capacity)
    }

    /// A full medicine tank.
    pub fn medicine(capacity: u32) -> Self {
        Self::new(ResourceKind::Medicine, capacity)
    }

    /// Builder-style starting level, clamped to capacity.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.min(self.capacity);
        self
    }

    /// Which resource this meter tracks.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Current level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Maximum level.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Level as a percentage of capacity (0 for a zero-capacity meter).
    pub fn percent(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            f64::from(self.level) * 100.0 / f64::from(self.capacity)
        }
    }

    /// True when nothing is left.
    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    /// True when at capacity.
    pub fn is_full(&self) -> bool {
        self.level == self.capacity
    }

    /// True when the level is strictly below `threshold`.
    pub fn is_below(&self, threshold: u32) -> bool {
        self.level < threshold
    }

    /// True when the level strictly exceeds `threshold`.
    pub fn is_above(&self, threshold: u32) -> bool {
        self.level > threshold
    }

    /// True when at least `amount` is available.
    pub fn can_supply(&self, amount: u32) -> bool {
        self.level >= amount
    }

    /// Take exactly `amount`, or nothing.
    ///
    /// Returns the remaining level on success. On refusal the meter is
    /// unchanged; the level never goes negative.
    pub fn try_consume(&mut self, amount: u32) -> Result<u32, ResourceError> {
        if !self.can_supply(amount) {
            return Err(ResourceError::Insufficient {
                kind: self.kind,
                requested: amount,
                available: self.level,
            });
        }
        self.level -= amount;
        Ok(self.level)
    }

    /// Take up to `amount`, saturating at zero. Returns the units taken.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.level);
        self.level -= taken;
        taken
    }

    /// Add up to `amount`, capped at capacity. Returns the units added.
    pub fn recharge(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.capacity - self.level);
        self.level += added;
        added
    }

    /// Restore to capacity.
    pub fn refill(&mut self) {
        self.level = self.capacity;
    }
}
