//! Integer grid positions and neighbourhood offsets.

use std::fmt;

/// The 8 Moore offsets `(dx, dy)`: W, E, S, N, then the four diagonals.
///
/// The order is fixed; collision-avoidance fallbacks scan it front to
/// back, so changing it changes which detour a blocked drone takes.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// The 4 von Neumann offsets `(dx, dy)`: W, E, S, N.
pub const VON_NEUMANN_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A cell coordinate on the simulation grid.
///
/// Signed so that offsets and out-of-bounds candidates can be expressed
/// before bounds checking. The derived ordering is lexicographic on
/// `(x, y)`, which is the tie-break used wherever two candidates are
/// equally good.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position displaced by `(dx, dy)`. No bounds checking.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// L1 distance.
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// L-inf distance (diagonal steps cost 1).
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// One Chebyshev step towards `goal`: `(signum dx, signum dy)` applied
    /// to `self`. Returns `self` when already at the goal.
    pub fn step_towards(self, goal: Self) -> Self {
        self.offset((goal.x - self.x).signum(), (goal.y - self.y).signum())
    }

    /// Displacement `self - from` as `(dx, dy)`.
    pub fn delta_from(self, from: Self) -> (i32, i32) {
        (self.x - from.x, self.y - from.y)
    }

    /// True if `other` is in the Moore neighbourhood of `self` (or equal).
    pub fn is_adjacent_or_same(self, other: Self) -> bool {
        self.chebyshev(other) <= 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
