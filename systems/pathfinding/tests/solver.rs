use std::collections::{HashMap, VecDeque};

use maze_pursuit_core::{Grid, Position};
use maze_pursuit_system_pathfinding::{solve, PathSolver};

const MAZE: [&str; 9] = [
    "###########",
    "#....#....#",
    "#.##.#.##.#",
    "#.#.....#.#",
    "#.#.###.#.#",
    "#...#.#...#",
    "###.#.#.###",
    "#.........#",
    "###########",
];

const ISLANDS: [&str; 7] = [
    "#########",
    "#...#...#",
    "#.#.#.#.#",
    "#...#...#",
    "#####.###",
    "#.#.....#",
    "#########",
];

fn maze() -> Grid {
    Grid::from_rows(&MAZE).expect("maze parses")
}

fn reference_distances(grid: &Grid, start: Position) -> HashMap<Position, usize> {
    let mut distances = HashMap::new();
    let mut queue = VecDeque::new();
    let _ = distances.insert(start, 0);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let distance = distances[&cell];
        let (x, y) = (i64::from(cell.x()), i64::from(cell.y()));
        for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            let (Ok(nx), Ok(ny)) = (u32::try_from(nx), u32::try_from(ny)) else {
                continue;
            };
            let neighbor = Position::new(nx, ny);
            if grid.is_open(neighbor) && !distances.contains_key(&neighbor) {
                let _ = distances.insert(neighbor, distance + 1);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

#[test]
fn routes_match_reference_distances_for_every_reachable_pair() {
    let grid = maze();
    let mut solver = PathSolver::new();
    let open: Vec<Position> = grid.open_cells().collect();

    for &start in &open {
        let reference = reference_distances(&grid, start);
        for &target in &open {
            let route = solver.solve(&grid, start, target);
            match reference.get(&target) {
                Some(&distance) => {
                    assert_eq!(
                        route.steps(),
                        distance,
                        "route {start:?} -> {target:?} is not shortest"
                    );
                    assert_eq!(route.start(), Some(start));
                    assert_eq!(route.destination(), Some(target));
                }
                None => assert!(route.is_empty(), "{start:?} -> {target:?} should fail"),
            }
        }
    }
}

#[test]
fn routes_only_take_single_orthogonal_steps_through_open_cells() {
    let grid = maze();
    let open: Vec<Position> = grid.open_cells().collect();
    let start = Position::new(1, 1);

    for &target in &open {
        let route = solve(&grid, start, target);
        assert!(route.is_contiguous(), "route to {target:?} teleports");
        assert!(
            route.iter().all(|cell| grid.is_open(*cell)),
            "route to {target:?} crosses a wall"
        );
    }
}

#[test]
fn solving_a_cell_to_itself_yields_single_cell_route() {
    let grid = maze();

    for cell in grid.open_cells() {
        assert_eq!(solve(&grid, cell, cell).into_vec(), vec![cell]);
    }
}

#[test]
fn disconnected_targets_yield_empty_routes() {
    let grid = Grid::from_rows(&ISLANDS).expect("islands parse");
    let left_island = Position::new(1, 1);
    let right_island = Position::new(5, 1);
    let pocket = Position::new(1, 5);

    assert!(solve(&grid, left_island, right_island).is_empty());
    assert!(solve(&grid, right_island, left_island).is_empty());
    assert!(solve(&grid, left_island, pocket).is_empty());
    assert!(!solve(&grid, right_island, Position::new(7, 5)).is_empty());
}

#[test]
fn walled_targets_yield_empty_routes() {
    let grid = maze();

    assert!(solve(&grid, Position::new(1, 1), Position::new(0, 0)).is_empty());
    assert!(solve(&grid, Position::new(1, 1), Position::new(5, 1)).is_empty());
}

#[test]
fn enclosed_open_target_yields_empty_route() {
    let grid = Grid::from_rows(&["#####", "#.#.#", "#####"]).expect("grid parses");

    assert!(solve(&grid, Position::new(1, 1), Position::new(3, 1)).is_empty());
}

#[test]
fn repeated_solves_are_identical() {
    let grid = maze();
    let mut reused = PathSolver::new();
    let pairs = [
        (Position::new(1, 1), Position::new(9, 7)),
        (Position::new(9, 1), Position::new(1, 7)),
        (Position::new(5, 5), Position::new(3, 3)),
    ];

    for (start, target) in pairs {
        let first = reused.solve(&grid, start, target);
        let second = reused.solve(&grid, start, target);
        let fresh = solve(&grid, start, target);
        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }
}
