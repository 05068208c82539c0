//! Path planning and target selection.
//!
//! Pure functions of their inputs: every random choice draws from the
//! RNG passed in. `drones` is always the list of *other* drones' last
//! known positions, cells a drone must not step into.
//!
//! All ties are broken lexicographically on `(x, y)`, so a decision
//! never depends on map iteration order.

use canopy_core::Position;
use canopy_space::GridWorld;
use indexmap::IndexMap;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

/// Chance that exploration keeps the previous heading when it can.
pub const PERSISTENCE_PROBABILITY: f64 = 0.7;

/// L1 distance between two cells.
pub fn manhattan_distance(a: Position, b: Position) -> u32 {
    a.manhattan(b)
}

/// The known target closest to `pos` by Manhattan distance.
pub fn choose_best_target(targets: &IndexMap<Position, f64>, pos: Position) -> Option<Position> {
    targets
        .keys()
        .copied()
        .min_by_key(|t| (manhattan_distance(pos, *t), *t))
}

/// The charging station closest to `pos` by Manhattan distance.
pub fn nearest_station<I>(pos: Position, stations: I) -> Option<Position>
where
    I: IntoIterator<Item = Position>,
{
    stations
        .into_iter()
        .min_by_key(|s| (manhattan_distance(pos, *s), *s))
}

fn safe_moves(pos: Position, drones: &[Position], grid: &GridWorld) -> Vec<Position> {
    grid.moore_neighbourhood(pos, false)
        .into_iter()
        .filter(|n| !drones.contains(n))
        .collect()
}

/// Pick the next exploration cell.
///
/// With probability `persistence` the drone keeps going in the
/// direction of its last move, if that cell is free and on the grid.
/// Otherwise it picks uniformly among free in-bounds Moore neighbours,
/// and stays put when there are none.
pub fn explore(
    pos: Position,
    last: Option<Position>,
    drones: &[Position],
    grid: &GridWorld,
    persistence: f64,
    rng: &mut dyn RngCore,
) -> Position {
    let safe = safe_moves(pos, drones, grid);
    if safe.is_empty() {
        return pos;
    }
    if let Some(last) = last {
        let (dx, dy) = pos.delta_from(last);
        let ahead = pos.offset(dx, dy);
        if rng.random_bool(persistence) && ahead != pos && safe.contains(&ahead) {
            return ahead;
        }
    }
    safe.choose(rng).copied().unwrap_or(pos)
}

/// One step from `pos` towards `goal`.
///
/// Takes the diagonal `(signum dx, signum dy)` step. If that cell holds
/// another drone (or is off the grid), takes the first free in-bounds
/// Moore neighbour instead, or stays put.
pub fn move_towards(pos: Position, goal: Position, drones: &[Position], grid: &GridWorld) -> Position {
    if pos == goal {
        return pos;
    }
    let next = pos.step_towards(goal);
    if grid.in_bounds(next) && !drones.contains(&next) {
        return next;
    }
    safe_moves(pos, drones, grid).first().copied().unwrap_or(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn grid(w: u32, h: u32) -> GridWorld {
        GridWorld::new(w, h).unwrap()
    }

    #[test]
    fn best_target_is_closest() {
        let mut t = IndexMap::new();
        t.insert(p(4, 4), 0.99);
        t.insert(p(1, 0), 0.6);
        assert_eq!(choose_best_target(&t, p(0, 0)), Some(p(1, 0)));
        assert_eq!(choose_best_target(&IndexMap::new(), p(0, 0)), None);
    }

    #[test]
    fn target_ties_break_lexicographically() {
        let mut t = IndexMap::new();
        t.insert(p(3, 2), 0.9);
        t.insert(p(1, 2), 0.9);
        t.insert(p(2, 1), 0.9);
        t.insert(p(2, 3), 0.9);
        // All four are at distance 1 from (2, 2).
        assert_eq!(choose_best_target(&t, p(2, 2)), Some(p(1, 2)));
    }

    #[test]
    fn nearest_station_ties_break_lexicographically() {
        let stations = [p(4, 0), p(0, 4)];
        assert_eq!(nearest_station(p(2, 2), stations), Some(p(0, 4)));
        assert_eq!(nearest_station(p(3, 1), stations), Some(p(4, 0)));
        assert_eq!(nearest_station(p(1, 1), Vec::new()), None);
    }

    #[test]
    fn move_towards_steps_diagonally() {
        let g = grid(5, 5);
        assert_eq!(move_towards(p(0, 0), p(3, 2), &[], &g), p(1, 1));
        assert_eq!(move_towards(p(2, 2), p(2, 0), &[], &g), p(2, 1));
        assert_eq!(move_towards(p(2, 2), p(2, 2), &[], &g), p(2, 2));
    }

    #[test]
    fn move_towards_sidesteps_drones() {
        let g = grid(5, 5);
        // (1, 1) blocked; first free Moore neighbour of (0, 0) is (1, 0).
        assert_eq!(move_towards(p(0, 0), p(3, 3), &[p(1, 1)], &g), p(1, 0));
        // Everything blocked: stay.
        let all = [p(1, 0), p(0, 1), p(1, 1)];
        assert_eq!(move_towards(p(0, 0), p(3, 3), &all, &g), p(0, 0));
    }

    #[test]
    fn explore_stays_when_boxed_in() {
        let g = grid(2, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let all = [p(1, 0), p(0, 1), p(1, 1)];
        assert_eq!(explore(p(0, 0), None, &all, &g, 0.7, &mut rng), p(0, 0));
    }

    #[test]
    fn explore_with_full_persistence_keeps_heading() {
        let g = grid(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(explore(p(2, 2), Some(p(1, 1)), &[], &g, 1.0, &mut rng), p(3, 3));
        }
    }

    #[test]
    fn explore_avoids_blocked_heading() {
        let g = grid(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            let next = explore(p(2, 2), Some(p(1, 2)), &[p(3, 2)], &g, 1.0, &mut rng);
            assert_ne!(next, p(3, 2));
            assert!(next.is_adjacent_or_same(p(2, 2)));
        }
    }

    #[test]
    fn explore_is_reproducible() {
        let g = grid(8, 8);
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut pos = p(4, 4);
            let mut last = None;
            let mut path = Vec::new();
            for _ in 0..30 {
                let next = explore(pos, last, &[], &g, PERSISTENCE_PROBABILITY, &mut rng);
                last = Some(pos);
                pos = next;
                path.push(pos);
            }
            path
        };
        assert_eq!(run(42), run(42));
    }

    proptest! {
        #[test]
        fn moves_stay_in_bounds(
            w in 1u32..10, h in 1u32..10,
            x in 0i32..10, y in 0i32..10,
            gx in 0i32..10, gy in 0i32..10,
            lx in -1i32..=1, ly in -1i32..=1,
            seed in any::<u64>(),
        ) {
            let g = grid(w, h);
            let pos = p(x % w as i32, y % h as i32);
            let goal = p(gx % w as i32, gy % h as i32);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let next = move_towards(pos, goal, &[], &g);
            prop_assert!(g.in_bounds(next));
            let last = Some(pos.offset(lx, ly));
            let next = explore(pos, last, &[], &g, PERSISTENCE_PROBABILITY, &mut rng);
            prop_assert!(g.in_bounds(next));
            prop_assert!(next.is_adjacent_or_same(pos));
        }
    }
}
