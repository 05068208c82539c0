//! Test utilities for Canopy development.
//!
//! Provides a [`ScriptedSensor`] that replays fixed detection windows,
//! preset configurations, and a [`DroneRig`](fixtures::DroneRig) for
//! driving drones by hand without a full [`World`](canopy_engine::World).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;

use canopy_core::Position;
use canopy_engine::{DetectionWindow, FieldView, Sensor};
use rand::RngCore;

/// Sensor that replays a queue of windows.
///
/// Each capture pops the next scripted window. Once the script runs out
/// the last window is repeated; with no script at all it reports an
/// empty window of the configured radius.
pub struct ScriptedSensor {
    radius: u32,
    script: VecDeque<DetectionWindow>,
    last: Option<DetectionWindow>,
}

impl ScriptedSensor {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            script: VecDeque::new(),
            last: None,
        }
    }

    /// Sensor that always reports `window`.
    pub fn constant(window: DetectionWindow) -> Self {
        let radius = window.radius();
        Self::new(radius).then(window)
    }

    /// Sensor that never sees anything.
    pub fn blind() -> Self {
        Self::new(1)
    }

    /// Append a window to the script.
    pub fn then(mut self, window: DetectionWindow) -> Self {
        self.script.push_back(window);
        self
    }
}

impl Sensor for ScriptedSensor {
    fn capture(
        &mut self,
        _center: Position,
        _field: &FieldView<'_>,
        _rng: &mut dyn RngCore,
    ) -> DetectionWindow {
        if let Some(next) = self.script.pop_front() {
            self.last = Some(next.clone());
            return next;
        }
        self.last
            .clone()
            .unwrap_or_else(|| DetectionWindow::new(self.radius))
    }
}
