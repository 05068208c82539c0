//! Bounded 2D lattice with multi-occupant cells.

use canopy_core::{DroneId, Occupant, PlantId, Position, StationId, MOORE_OFFSETS, VON_NEUMANN_OFFSETS};
use smallvec::SmallVec;

use crate::error::SpaceError;
use crate::terrain::Terrain;

/// In-bounds neighbourhood of a cell: at most 8 neighbours plus the centre.
pub type Neighbourhood = SmallVec<[Position; 9]>;

// ── Cell ─────────────────────────────────────────────────────────

/// One lattice cell.
///
/// Holds any number of occupants; in practice at most one plant, one
/// station and a few drones.
#[derive(Clone, Debug)]
pub struct Cell {
    position: Position,
    terrain: Terrain,
    occupants: SmallVec<[Occupant; 4]>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            terrain: Terrain::Soil,
            occupants: SmallVec::new(),
        }
    }

    /// Cell coordinate.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Ground type.
    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Everything standing on the cell, in placement order.
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    /// True when nothing stands on the cell.
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// The plant on this cell, if any.
    pub fn plant(&self) -> Option<PlantId> {
        self.occupants.iter().find_map(|o| o.as_plant())
    }

    /// The charging station on this cell, if any.
    pub fn station(&self) -> Option<StationId> {
        self.occupants.iter().find_map(|o| o.as_station())
    }

    /// Drones currently on this cell.
    pub fn drones(&self) -> impl Iterator<Item = DroneId> + '_ {
        self.occupants.iter().filter_map(|o| o.as_drone())
    }

    /// True if at least one drone is on this cell.
    pub fn has_drone(&self) -> bool {
        self.occupants.iter().any(|o| o.is_mobile())
    }
}

// ── GridWorld ────────────────────────────────────────────────────

/// A bounded `width x height` grid. Positions outside
/// `[0, width) x [0, height)` do not exist; there is no wrap-around.
///
/// Cells are stored row-major: index `y * width + x`.
#[derive(Clone, Debug)]
pub struct GridWorld {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl GridWorld {
    /// Largest accepted dimension: coordinates are `i32`.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create an all-soil, unoccupied grid.
    ///
    /// Returns `Err(SpaceError::EmptyGrid)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    pub fn new(width: u32, height: u32) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        if width > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        let mut cells = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(Cell::new(Position::new(x, y)));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True if `pos` is inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// `Ok(())` if `pos` is inside the grid, else [`SpaceError::OutOfBounds`].
    pub fn check_bounds(&self, pos: Position) -> Result<(), SpaceError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(SpaceError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Row-major index of `pos`, or `None` if out of bounds.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y as usize) * (self.width as usize) + (pos.x as usize))
        } else {
            None
        }
    }

    /// The cell at `pos`.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell, SpaceError> {
        self.check_bounds(pos)?;
        let i = (pos.y as usize) * (self.width as usize) + (pos.x as usize);
        Ok(&mut self.cells[i])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All positions in row-major order: `(0,0), (1,0), ..., (w-1,h-1)`.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(Cell::position)
    }

    /// Set the terrain of a cell.
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> Result<(), SpaceError> {
        self.cell_mut(pos)?.terrain = terrain;
        Ok(())
    }

    /// Add an occupant to a cell. Multiplicity is allowed.
    pub fn place(&mut self, pos: Position, occupant: Occupant) -> Result<(), SpaceError> {
        self.cell_mut(pos)?.occupants.push(occupant);
        Ok(())
    }

    /// Remove one instance of `occupant` from the cell at `pos`.
    pub fn remove(&mut self, pos: Position, occupant: Occupant) -> Result<(), SpaceError> {
        let cell = self.cell_mut(pos)?;
        match cell.occupants.iter().position(|o| *o == occupant) {
            Some(i) => {
                cell.occupants.remove(i);
                Ok(())
            }
            None => Err(SpaceError::OccupantNotFound {
                occupant,
                position: pos,
            }),
        }
    }

    /// Move `occupant` from `from` to `to`.
    ///
    /// The destination is bounds-checked before anything is touched, so a
    /// failed move leaves the grid unchanged.
    pub fn move_occupant(
        &mut self,
        occupant: Occupant,
        from: Position,
        to: Position,
    ) -> Result<(), SpaceError> {
        self.check_bounds(to)?;
        self.remove(from, occupant)?;
        self.place(to, occupant)
    }

    /// In-bounds Moore neighbourhood of `pos` (up to 8 cells), in
    /// [`MOORE_OFFSETS`] order, optionally preceded by `pos` itself.
    pub fn moore_neighbourhood(&self, pos: Position, include_center: bool) -> Neighbourhood {
        let mut out = Neighbourhood::new();
        if include_center && self.in_bounds(pos) {
            out.push(pos);
        }
        for (dx, dy) in MOORE_OFFSETS {
            let n = pos.offset(dx, dy);
            if self.in_bounds(n) {
                out.push(n);
            }
        }
        out
    }

    /// In-bounds von Neumann neighbourhood of `pos` (up to 4 cells),
    /// optionally preceded by `pos` itself.
    pub fn von_neumann_neighbourhood(&self, pos: Position, include_center: bool) -> Neighbourhood {
        let mut out = Neighbourhood::new();
        if include_center && self.in_bounds(pos) {
            out.push(pos);
        }
        for (dx, dy) in VON_NEUMANN_OFFSETS {
            let n = pos.offset(dx, dy);
            if self.in_bounds(n) {
                out.push(n);
            }
        }
        out
    }

    /// Occupants of the Moore neighbours of `pos`, excluding `pos`.
    pub fn neighbour_occupants(&self, pos: Position) -> impl Iterator<Item = Occupant> + '_ {
        self.moore_neighbourhood(pos, false)
            .into_iter()
            .filter_map(move |n| self.cell(n))
            .flat_map(|c| c.occupants().iter().copied())
    }

    /// Border cells, clockwise from `(0, 0)`: top row, right column,
    /// bottom row (right to left), left column (bottom to top). Each
    /// border cell appears exactly once.
    pub fn border_positions(&self) -> Vec<Position> {
        let w = self.width as i32;
        let h = self.height as i32;
        let mut out = Vec::new();
        for x in 0..w {
            out.push(Position::new(x, 0));
        }
        for y in 1..h {
            out.push(Position::new(w - 1, y));
        }
        if h > 1 {
            for x in (0..w - 1).rev() {
                out.push(Position::new(x, h - 1));
            }
        }
        if w > 1 {
            for y in (1..h - 1).rev() {
                out.push(Position::new(0, y));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn new_zero_dims_returns_error() {
        assert!(matches!(GridWorld::new(0, 5), Err(SpaceError::EmptyGrid)));
        assert!(matches!(GridWorld::new(5, 0), Err(SpaceError::EmptyGrid)));
    }

    #[test]
    fn new_rejects_dims_exceeding_i32_max() {
        let big = i32::MAX as u32 + 1;
        assert!(matches!(
            GridWorld::new(big, 5),
            Err(SpaceError::DimensionTooLarge { name: "width", .. })
        ));
        assert!(matches!(
            GridWorld::new(5, big),
            Err(SpaceError::DimensionTooLarge { name: "height", .. })
        ));
    }

    #[test]
    fn positions_are_row_major() {
        let g = GridWorld::new(3, 2).unwrap();
        let v: Vec<_> = g.positions().collect();
        assert_eq!(v, vec![p(0, 0), p(1, 0), p(2, 0), p(0, 1), p(1, 1), p(2, 1)]);
        assert_eq!(g.index_of(p(2, 1)), Some(5));
        assert_eq!(g.index_of(p(3, 0)), None);
    }

    // ── Neighbourhoods ──────────────────────────────────────────

    #[test]
    fn moore_interior_corner_edge() {
        let g = GridWorld::new(5, 5).unwrap();
        assert_eq!(g.moore_neighbourhood(p(2, 2), false).len(), 8);
        assert_eq!(g.moore_neighbourhood(p(2, 2), true).len(), 9);
        let corner = g.moore_neighbourhood(p(0, 0), false);
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&p(1, 0)));
        assert!(corner.contains(&p(0, 1)));
        assert!(corner.contains(&p(1, 1)));
        assert_eq!(g.moore_neighbourhood(p(0, 2), false).len(), 5);
    }

    #[test]
    fn von_neumann_corner() {
        let g = GridWorld::new(5, 5).unwrap();
        assert_eq!(g.von_neumann_neighbourhood(p(2, 2), false).len(), 4);
        assert_eq!(g.von_neumann_neighbourhood(p(0, 0), true).as_slice(), &[p(0, 0), p(1, 0), p(0, 1)]);
    }

    #[test]
    fn single_cell_has_no_neighbours() {
        let g = GridWorld::new(1, 1).unwrap();
        assert!(g.moore_neighbourhood(p(0, 0), false).is_empty());
        assert_eq!(g.border_positions(), vec![p(0, 0)]);
    }

    // ── Occupants ───────────────────────────────────────────────

    #[test]
    fn place_move_remove() {
        let mut g = GridWorld::new(4, 4).unwrap();
        let d = Occupant::Drone(DroneId(0));
        g.place(p(1, 1), Occupant::Plant(PlantId(0))).unwrap();
        g.place(p(1, 1), d).unwrap();
        assert_eq!(g.cell(p(1, 1)).unwrap().occupants().len(), 2);
        assert!(g.cell(p(1, 1)).unwrap().has_drone());

        g.move_occupant(d, p(1, 1), p(2, 2)).unwrap();
        assert!(!g.cell(p(1, 1)).unwrap().has_drone());
        assert_eq!(g.cell(p(2, 2)).unwrap().drones().collect::<Vec<_>>(), vec![DroneId(0)]);
        assert_eq!(g.cell(p(1, 1)).unwrap().plant(), Some(PlantId(0)));

        assert!(matches!(
            g.remove(p(1, 1), d),
            Err(SpaceError::OccupantNotFound { .. })
        ));
    }

    #[test]
    fn failed_move_leaves_grid_unchanged() {
        let mut g = GridWorld::new(3, 3).unwrap();
        let d = Occupant::Drone(DroneId(1));
        g.place(p(0, 0), d).unwrap();
        let err = g.move_occupant(d, p(0, 0), p(-1, 0)).unwrap_err();
        assert!(matches!(err, SpaceError::OutOfBounds { .. }));
        assert!(g.cell(p(0, 0)).unwrap().has_drone());
    }

    #[test]
    fn neighbour_occupants_skip_center() {
        let mut g = GridWorld::new(3, 3).unwrap();
        g.place(p(1, 1), Occupant::Plant(PlantId(0))).unwrap();
        g.place(p(0, 0), Occupant::Plant(PlantId(1))).unwrap();
        g.place(p(2, 1), Occupant::Plant(PlantId(2))).unwrap();
        let mut seen: Vec<_> = g.neighbour_occupants(p(1, 1)).collect();
        seen.sort();
        assert_eq!(seen, vec![Occupant::Plant(PlantId(1)), Occupant::Plant(PlantId(2))]);
    }

    #[test]
    fn terrain_is_settable() {
        let mut g = GridWorld::new(2, 2).unwrap();
        g.set_terrain(p(1, 0), Terrain::Barren).unwrap();
        assert_eq!(g.cell(p(1, 0)).unwrap().terrain(), Terrain::Barren);
        assert!(g.set_terrain(p(2, 0), Terrain::Barren).is_err());
    }

    // ── Border ──────────────────────────────────────────────────

    #[test]
    fn border_is_clockwise_and_unique() {
        let g = GridWorld::new(3, 3).unwrap();
        assert_eq!(
            g.border_positions(),
            vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(2, 2), p(1, 2), p(0, 2), p(0, 1)]
        );
    }

    #[test]
    fn border_of_single_row() {
        let g = GridWorld::new(4, 1).unwrap();
        assert_eq!(g.border_positions(), vec![p(0, 0), p(1, 0), p(2, 0), p(3, 0)]);
        let g = GridWorld::new(1, 3).unwrap();
        assert_eq!(g.border_positions(), vec![p(0, 0), p(0, 1), p(0, 2)]);
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn neighbourhoods_stay_in_bounds(
            w in 1u32..12, h in 1u32..12,
            x in -2i32..14, y in -2i32..14,
        ) {
            let g = GridWorld::new(w, h).unwrap();
            for n in g.moore_neighbourhood(p(x, y), true) {
                prop_assert!(g.in_bounds(n));
            }
            for n in g.von_neumann_neighbourhood(p(x, y), true) {
                prop_assert!(g.in_bounds(n));
            }
        }

        #[test]
        fn border_count_matches_perimeter(w in 1u32..15, h in 1u32..15) {
            let g = GridWorld::new(w, h).unwrap();
            let border = g.border_positions();
            let unique: HashSet<_> = border.iter().copied().collect();
            prop_assert_eq!(unique.len(), border.len());
            let expected = if w == 1 || h == 1 {
                (w * h) as usize
            } else {
                (2 * w + 2 * h - 4) as usize
            };
            prop_assert_eq!(border.len(), expected);
            for b in border {
                prop_assert!(b.x == 0 || b.y == 0 || b.x == w as i32 - 1 || b.y == h as i32 - 1);
            }
        }

        #[test]
        fn moore_is_symmetric(w in 2u32..10, h in 2u32..10, x in 0i32..10, y in 0i32..10) {
            let g = GridWorld::new(w, h).unwrap();
            let a = p(x % w as i32, y % h as i32);
            for n in g.moore_neighbourhood(a, false) {
                prop_assert!(g.moore_neighbourhood(n, false).contains(&a));
            }
        }
    }
}
