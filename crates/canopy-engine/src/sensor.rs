//! Drone sensing: the camera abstraction and detection windows.
//!
//! A [`Sensor`] looks at the square window around a drone and reports a
//! signed confidence per cell, relative to the window centre. Positive
//! means "infected", negative means "confirmed clear". The drone turns
//! the window into absolute [`Detections`] with
//! [`DetectionWindow::to_absolute`], which drops cells that fall off the
//! grid and rejects malformed entries.

use canopy_core::{DetectionError, Position};
use canopy_space::GridWorld;
use indexmap::IndexMap;
use rand::{Rng, RngCore};

use crate::config::SensorParams;
use crate::plant::Plant;

/// Absolute detections for one tick: cell to confidence in `[-1, 1]`.
pub type Detections = IndexMap<Position, f64>;

// ── FieldView ──────────────────────────────────────────────────────

/// Read-only view of the field a sensor photographs.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    grid: &'a GridWorld,
    plants: &'a [Plant],
}

impl<'a> FieldView<'a> {
    /// View over `grid`. `plants` is indexed by [`PlantId`](canopy_core::PlantId).
    pub fn new(grid: &'a GridWorld, plants: &'a [Plant]) -> Self {
        Self { grid, plants }
    }

    /// The grid.
    pub fn grid(&self) -> &'a GridWorld {
        self.grid
    }

    /// The plant growing at `pos`, if any.
    pub fn plant_at(&self, pos: Position) -> Option<&'a Plant> {
        let id = self.grid.cell(pos)?.plant()?;
        self.plants.get(id.0 as usize)
    }
}

// ── DetectionWindow ────────────────────────────────────────────────

/// One sensor reading, relative to the window centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalDetection {
    /// Column offset.
    pub dx: i32,
    /// Row offset.
    pub dy: i32,
    /// Signed confidence.
    pub confidence: f64,
}

/// A `(2r+1) x (2r+1)` block of readings centred on the drone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionWindow {
    radius: u32,
    entries: Vec<LocalDetection>,
}

impl DetectionWindow {
    /// An empty window of the given radius.
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            entries: Vec::new(),
        }
    }

    /// Append a reading.
    pub fn push(&mut self, dx: i32, dy: i32, confidence: f64) {
        self.entries.push(LocalDetection { dx, dy, confidence });
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, dx: i32, dy: i32, confidence: f64) -> Self {
        self.push(dx, dy, confidence);
        self
    }

    /// Window radius.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Readings in capture order.
    pub fn entries(&self) -> &[LocalDetection] {
        &self.entries
    }

    /// Convert to absolute grid positions around `center`.
    ///
    /// Cells outside the grid are dropped without complaint: the camera
    /// simply sees nothing there. Entries with an offset beyond the
    /// radius, a confidence outside `[-1, 1]`, or a repeated cell are
    /// skipped and returned as errors alongside the good detections.
    pub fn to_absolute(
        &self,
        center: Position,
        grid: &GridWorld,
    ) -> (Detections, Vec<DetectionError>) {
        let mut out = Detections::new();
        let mut errors = Vec::new();
        let r = self.radius;
        for e in &self.entries {
            if e.dx.unsigned_abs() > r || e.dy.unsigned_abs() > r {
                errors.push(DetectionError::OffsetOutsideWindow {
                    dx: e.dx,
                    dy: e.dy,
                    radius: r,
                });
                continue;
            }
            if !e.confidence.is_finite() || !(-1.0..=1.0).contains(&e.confidence) {
                errors.push(DetectionError::InvalidConfidence {
                    dx: e.dx,
                    dy: e.dy,
                    confidence: e.confidence,
                });
                continue;
            }
            let pos = center.offset(e.dx, e.dy);
            if !grid.in_bounds(pos) {
                continue;
            }
            if out.contains_key(&pos) {
                errors.push(DetectionError::Duplicate { position: pos });
                continue;
            }
            out.insert(pos, e.confidence);
        }
        (out, errors)
    }
}

// ── Sensor ─────────────────────────────────────────────────────────

/// A camera plus classifier.
///
/// Implementations draw any noise from the supplied RNG so that runs stay
/// reproducible from the world seed.
pub trait Sensor {
    /// Photograph and classify the window around `center`.
    fn capture(
        &mut self,
        center: Position,
        field: &FieldView<'_>,
        rng: &mut dyn RngCore,
    ) -> DetectionWindow;
}

/// Stand-in for the vision model.
///
/// Sees the true plant states and reports each window cell with a
/// confidence magnitude drawn uniformly from
/// `[min_confidence, max_confidence]`: positive on infected plants,
/// negative everywhere else (healthy or dead plants, bare cells, and
/// cells beyond the grid edge).
#[derive(Clone, Debug)]
pub struct SimulatedCamera {
    params: SensorParams,
}

impl SimulatedCamera {
    /// Create a camera.
    pub fn new(params: SensorParams) -> Self {
        Self { params }
    }
}

impl Sensor for SimulatedCamera {
    fn capture(
        &mut self,
        center: Position,
        field: &FieldView<'_>,
        rng: &mut dyn RngCore,
    ) -> DetectionWindow {
        let r = self.params.radius as i32;
        let mut window = DetectionWindow::new(self.params.radius);
        for dy in -r..=r {
            for dx in -r..=r {
                let magnitude =
                    rng.random_range(self.params.min_confidence..=self.params.max_confidence);
                let infected = field
                    .plant_at(center.offset(dx, dy))
                    .is_some_and(Plant::is_infected);
                window.push(dx, dy, if infected { magnitude } else { -magnitude });
            }
        }
        window
    }
}
