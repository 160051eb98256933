use std::collections::HashMap;

use maze_chase_core::{
    Position,
    map::{Cell, Grid},
    pathfinding::{DoubleStep, Path, PathFinder, Unobstructed, WallRespecting},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const TRIALS: u64 = 300;

fn random_maze(rng: &mut StdRng, width: usize, height: usize) -> Grid<Cell> {
    Grid::from_generator(width, height, |_, _| {
        if rng.random_bool(0.3) {
            Cell::Wall
        } else {
            Cell::Floor
        }
    })
}

/// Picks two distinct floor cells, if the maze has that many.
fn random_endpoints(rng: &mut StdRng, grid: &Grid<Cell>) -> Option<(Position, Position)> {
    let floors: Vec<Position> = grid.find(Cell::Floor).collect();
    if floors.len() < 2 {
        return None;
    }
    let origin = floors[rng.random_range(0..floors.len())];
    let target = loop {
        let candidate = floors[rng.random_range(0..floors.len())];
        if candidate != origin {
            break candidate;
        }
    };
    Some((origin, target))
}

/// Shortest hop count over floor cells by repeated relaxation until nothing
/// changes. Deliberately naive.
fn reference_distance(grid: &Grid<Cell>, origin: Position, target: Position) -> Option<usize> {
    let cells: Vec<Position> = grid.enumerate().map(|(position, _)| position).collect();
    let mut distances: HashMap<Position, usize> = HashMap::from([(origin, 0)]);

    loop {
        let mut changed = false;
        for &cell in &cells {
            if cell == origin || !(cell == target || grid.is_floor(cell)) {
                continue;
            }
            for &neighbour in &cells {
                if neighbour.manhattan_distance(cell) != 1 {
                    continue;
                }
                let Some(&known) = distances.get(&neighbour) else {
                    continue;
                };
                if distances.get(&cell).is_none_or(|current| known + 1 < *current) {
                    distances.insert(cell, known + 1);
                    changed = true;
                }
            }
        }
        if !changed {
            return distances.get(&target).copied();
        }
    }
}

fn hop_lengths(path: &Path) -> Vec<(usize, usize)> {
    path.windows(2)
        .map(|hop| (hop[0].x.abs_diff(hop[1].x), hop[0].y.abs_diff(hop[1].y)))
        .collect()
}

#[test]
fn wall_respecting_matches_brute_force_distance() {
    for seed in 0..TRIALS {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = random_maze(&mut rng, 6, 5);
        let Some((origin, target)) = random_endpoints(&mut rng, &grid) else {
            continue;
        };

        let path = WallRespecting.find_path(origin, target, &grid);
        let expected = reference_distance(&grid, origin, target);
        assert_eq!(
            path.as_ref().map(|path| path.len() - 1),
            expected,
            "seed {seed}: {origin} -> {target}"
        );

        if let Some(path) = path {
            assert_eq!(path.first(), Some(&origin));
            assert_eq!(path.last(), Some(&target));
            assert!(hop_lengths(&path).iter().all(|hop| hop.0 + hop.1 == 1));
            assert!(path[1..].iter().all(|cell| grid.is_floor(*cell)));
        }
    }
}

#[test]
fn unobstructed_is_manhattan_and_never_longer_than_wall_respecting() {
    for seed in 0..TRIALS {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = random_maze(&mut rng, 7, 6);
        let Some((origin, target)) = random_endpoints(&mut rng, &grid) else {
            continue;
        };

        let direct = Unobstructed
            .find_path(origin, target, &grid)
            .expect("unobstructed search always reaches in-bounds targets");
        assert_eq!(direct.len() - 1, origin.manhattan_distance(target));
        assert_eq!(direct.first(), Some(&origin));
        assert_eq!(direct.last(), Some(&target));

        if let Some(walled) = WallRespecting.find_path(origin, target, &grid) {
            assert!(direct.len() <= walled.len(), "seed {seed}");
        }
    }
}

#[test]
fn double_step_hops_two_cells_or_equals_the_fallback() {
    let mut double_step_paths = 0;
    for seed in 0..TRIALS {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = random_maze(&mut rng, 7, 7);
        let Some((origin, target)) = random_endpoints(&mut rng, &grid) else {
            continue;
        };

        let single = WallRespecting.find_path(origin, target, &grid);
        let double = DoubleStep.find_path(origin, target, &grid);
        assert_eq!(double.is_some(), single.is_some(), "seed {seed}");

        let Some(path) = double else {
            continue;
        };
        assert_eq!(path.first(), Some(&origin));
        assert_eq!(path.last(), Some(&target));

        let hops = hop_lengths(&path);
        if hops[0] == (2, 0) || hops[0] == (0, 2) {
            double_step_paths += 1;
            assert!(hops.iter().all(|hop| *hop == (2, 0) || *hop == (0, 2)));
            for pair in path.windows(2) {
                let middle = Position::new((pair[0].x + pair[1].x) / 2, (pair[0].y + pair[1].y) / 2);
                for cell in [middle, pair[1]] {
                    assert!(cell == target || grid.is_floor(cell), "seed {seed}");
                }
            }
        } else {
            assert_eq!(Some(path), single, "seed {seed}");
        }
    }
    assert!(double_step_paths > 0);
}

#[test]
fn repeated_searches_are_identical() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = random_maze(&mut rng, 8, 8);
        let Some((origin, target)) = random_endpoints(&mut rng, &grid) else {
            continue;
        };
        assert_eq!(
            Unobstructed.find_path(origin, target, &grid),
            Unobstructed.find_path(origin, target, &grid)
        );
        assert_eq!(
            WallRespecting.find_path(origin, target, &grid),
            WallRespecting.find_path(origin, target, &grid)
        );
        assert_eq!(
            DoubleStep.find_path(origin, target, &grid),
            DoubleStep.find_path(origin, target, &grid)
        );
    }
}
