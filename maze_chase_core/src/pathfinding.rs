//! Pursuit strategies used by adversaries.
//!
//! Every strategy is a pure function of `(origin, target, grid)`: paths are
//! recomputed from scratch on each call and nothing is cached between calls.
//! A returned path always starts at `origin` and ends at `target`.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet, VecDeque},
};

use serde::{Deserialize, Serialize};

use crate::{
    Direction, Position,
    map::{Cell, Grid},
};

/// Ordered positions from origin to target, both inclusive.
pub type Path = Vec<Position>;

/// Computes a route between two cells of a maze.
pub trait PathFinder {
    /// Returns the path from `origin` to `target`, or `None` when no route
    /// exists. `None` is a normal outcome, not an error.
    fn find_path(&self, origin: Position, target: Position, grid: &Grid<Cell>) -> Option<Path>;
}

/// Uniform-cost search that ignores walls; only the grid boundary constrains
/// movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unobstructed;

/// Breadth-first search over floor cells, 4-connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallRespecting;

/// Breadth-first search moving two cells per hop, falling back to
/// [`WallRespecting`] when no double-step route exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleStep;

/// Strategy bound to an adversary kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Unobstructed,
    WallRespecting,
    DoubleStep,
}

impl PathFinder for Strategy {
    fn find_path(&self, origin: Position, target: Position, grid: &Grid<Cell>) -> Option<Path> {
        match self {
            Strategy::Unobstructed => Unobstructed.find_path(origin, target, grid),
            Strategy::WallRespecting => WallRespecting.find_path(origin, target, grid),
            Strategy::DoubleStep => DoubleStep.find_path(origin, target, grid),
        }
    }
}

impl PathFinder for Unobstructed {
    fn find_path(&self, origin: Position, target: Position, grid: &Grid<Cell>) -> Option<Path> {
        // For priority queue
        #[derive(Clone, Copy, Eq, PartialEq)]
        struct Frontier {
            distance: usize,
            position: Position,
        }

        impl Frontier {
            fn key(&self) -> (usize, usize, usize) {
                (self.distance, self.position.y, self.position.x)
            }
        }

        impl Ord for Frontier {
            fn cmp(&self, other: &Self) -> Ordering {
                // Reverse ordering for min-heap behavior; ties settle by row, then column
                other.key().cmp(&self.key())
            }
        }

        impl PartialOrd for Frontier {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        if !grid.contains(origin) || !grid.contains(target) {
            return None;
        }

        let mut frontier = BinaryHeap::from([Frontier {
            distance: 0,
            position: origin,
        }]);
        let mut distances: HashMap<Position, usize> = HashMap::from([(origin, 0)]);
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut settled: HashSet<Position> = HashSet::new();

        while let Some(Frontier { distance, position }) = frontier.pop() {
            if !settled.insert(position) {
                continue;
            }
            if position == target {
                break;
            }

            for direction in Direction::PRIORITY {
                let (dx, dy) = direction.delta();
                let Some(next) = grid.step(position, dx, dy) else {
                    continue;
                };
                let candidate = distance + 1;
                if distances.get(&next).is_none_or(|known| candidate < *known) {
                    distances.insert(next, candidate);
                    came_from.insert(next, position);
                    frontier.push(Frontier {
                        distance: candidate,
                        position: next,
                    });
                }
            }
        }

        if !settled.contains(&target) {
            return None;
        }
        Some(reconstruct(&came_from, target))
    }
}

impl PathFinder for WallRespecting {
    fn find_path(&self, origin: Position, target: Position, grid: &Grid<Cell>) -> Option<Path> {
        breadth_first(origin, target, grid, 1)
    }
}

impl PathFinder for DoubleStep {
    fn find_path(&self, origin: Position, target: Position, grid: &Grid<Cell>) -> Option<Path> {
        breadth_first(origin, target, grid, 2).or_else(|| {
            tracing::debug!(%origin, %target, "double-step search exhausted, falling back to single steps");
            WallRespecting.find_path(origin, target, grid)
        })
    }
}

/// A cell can be entered when it is plain floor or is the target itself.
fn is_passable(grid: &Grid<Cell>, position: Position, target: Position) -> bool {
    position == target || grid.is_floor(position)
}

/// Breadth-first search where each hop covers `stride` cells in one of the
/// four directions. Every cell crossed by a hop has to be passable.
fn breadth_first(
    origin: Position,
    target: Position,
    grid: &Grid<Cell>,
    stride: isize,
) -> Option<Path> {
    if !grid.contains(origin) || !grid.contains(target) {
        return None;
    }

    let mut frontier = VecDeque::from([origin]);
    let mut visited: HashSet<Position> = HashSet::from([origin]);
    let mut came_from: HashMap<Position, Position> = HashMap::new();

    while let Some(current) = frontier.pop_front() {
        if current == target {
            return Some(reconstruct(&came_from, target));
        }

        for direction in Direction::PRIORITY {
            let (dx, dy) = direction.delta();
            let Some(next) = grid.step(current, dx * stride, dy * stride) else {
                continue;
            };
            if visited.contains(&next) {
                continue;
            }
            let hop_is_clear = (1..=stride).all(|k| {
                grid.step(current, dx * k, dy * k)
                    .is_some_and(|cell| is_passable(grid, cell, target))
            });
            if !hop_is_clear {
                continue;
            }

            visited.insert(next);
            came_from.insert(next, current);
            frontier.push_back(next);
        }
    }

    None
}

/// Walks the predecessor chain back from `target` to the origin (the only
/// node without a predecessor).
fn reconstruct(came_from: &HashMap<Position, Position>, target: Position) -> Path {
    let mut path: Path =
        std::iter::successors(Some(target), |step| came_from.get(step).copied()).collect();
    path.reverse();
    path
}
