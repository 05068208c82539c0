//! Per-cell visibility and targeting counters.
//!
//! The overlay is derived data: [`recompute`](VisibilityOverlay::recompute)
//! rebuilds it from the current drone positions and blackboard targets,
//! so the counts after a tick depend only on those sets and never on
//! activation order.

use canopy_core::Position;
use canopy_space::GridWorld;

/// Counters for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellVisibility {
    /// Drones whose Moore window covers the cell.
    pub visible: u32,
    /// Blackboard targets on the cell.
    pub targeted: u32,
}

/// Visibility and targeting counters for every cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityOverlay {
    width: u32,
    height: u32,
    cells: Vec<CellVisibility>,
}

impl VisibilityOverlay {
    /// All-zero overlay matching `grid`.
    pub fn new(grid: &GridWorld) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: vec![CellVisibility::default(); grid.cell_count()],
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let inside = pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height;
        inside.then(|| (pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }

    /// Counters for `pos`, or `None` off the grid.
    pub fn get(&self, pos: Position) -> Option<CellVisibility> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Drones currently seeing `pos`. Zero off the grid.
    pub fn visible_count(&self, pos: Position) -> u32 {
        self.get(pos).map_or(0, |c| c.visible)
    }

    /// Targets on `pos`. Zero off the grid.
    pub fn targeted_count(&self, pos: Position) -> u32 {
        self.get(pos).map_or(0, |c| c.targeted)
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        self.cells.fill(CellVisibility::default());
    }

    /// Increment the visible count of one cell. Off-grid cells are ignored.
    pub fn mark_visible(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i].visible += 1;
        }
    }

    /// Decrement the visible count of one cell, saturating at zero.
    pub fn unmark_visible(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i].visible = self.cells[i].visible.saturating_sub(1);
        }
    }

    /// Increment the targeted count of one cell. Off-grid cells are ignored.
    pub fn mark_target(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i].targeted += 1;
        }
    }

    /// Decrement the targeted count of one cell, saturating at zero.
    pub fn unmark_target(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i].targeted = self.cells[i].targeted.saturating_sub(1);
        }
    }

    /// Rebuild from scratch.
    ///
    /// Each drone marks its in-bounds Moore neighbourhood, itself
    /// included; each target marks its own cell.
    pub fn recompute<D, T>(&mut self, grid: &GridWorld, drones: D, targets: T)
    where
        D: IntoIterator<Item = Position>,
        T: IntoIterator<Item = Position>,
    {
        self.reset();
        for d in drones {
            for n in grid.moore_neighbourhood(d, true) {
                self.mark_visible(n);
            }
        }
        for t in targets {
            self.mark_target(t);
        }
    }

    /// Number of cells seen by at least one drone.
    pub fn visible_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.visible > 0).count()
    }

    /// Fraction of cells seen by at least one drone.
    pub fn coverage(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.visible_cells() as f64 / self.cells.len() as f64
    }
}
