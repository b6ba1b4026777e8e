#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first shortest-route solver for 4-connected mazes.

use std::collections::VecDeque;

use maze_pursuit_core::{Direction, Grid, Position, Route};

const UNREACHED: u32 = u32::MAX;

/// Computes unweighted shortest routes between two cells of a [`Grid`].
///
/// Every edge costs one step, so a breadth-first sweep settles cells in
/// increasing distance order. The solver explores the whole component
/// reachable from the start, records the predecessor that first reached
/// each cell, then walks those links back from the target. Neighbors are
/// expanded up, right, down, left, which fixes tie-breaking between equally
/// short routes.
///
/// The distance, predecessor and queue buffers are kept between calls to
/// avoid reallocating every tick. They are fully reset before each sweep, so
/// a reused solver returns exactly what a fresh one would.
#[derive(Clone, Debug, Default)]
pub struct PathSolver {
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
    predecessors: Vec<Option<usize>>,
    queue: VecDeque<usize>,
}

impl PathSolver {
    /// Creates a solver with empty workspace buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest route from `start` to `target`, both inclusive.
    ///
    /// Returns an empty route when the target was never reached: it is
    /// walled off, sits in another component, is itself a wall, or either
    /// endpoint lies outside the grid. Solving from a cell to itself yields
    /// the single-cell route.
    pub fn solve(&mut self, grid: &Grid, start: Position, target: Position) -> Route {
        self.explore(grid, start);
        self.reconstruct(grid, target)
    }

    /// Distance recorded for the cell by the most recent solve.
    ///
    /// Returns `None` for cells outside the last grid or never reached.
    #[must_use]
    pub fn distance(&self, cell: Position) -> Option<u32> {
        if cell.x() >= self.columns || cell.y() >= self.rows {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let offset = index(width, cell)?;
        self.distances
            .get(offset)
            .copied()
            .filter(|distance| *distance != UNREACHED)
    }

    /// Number of cells reached by the most recent solve, start included.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHED)
            .count()
    }

    fn prepare_workspace(&mut self, grid: &Grid) {
        let cell_count = grid.cell_count();

        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHED; cell_count];
            self.predecessors = vec![None; cell_count];
        } else {
            self.distances.fill(UNREACHED);
            self.predecessors.fill(None);
        }

        self.columns = grid.columns();
        self.rows = grid.rows();
        self.queue.clear();
    }

    fn explore(&mut self, grid: &Grid, start: Position) {
        self.prepare_workspace(grid);

        let Some(start_index) = grid.index(start) else {
            return;
        };

        self.distances[start_index] = 0;
        self.queue.push_back(start_index);

        while let Some(current_index) = self.queue.pop_front() {
            let Some(current) = grid.position_at(current_index) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for direction in Direction::CARDINALS {
                let Some(neighbor) = current.offset(direction) else {
                    continue;
                };

                if !grid.is_open(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] != UNREACHED {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                self.predecessors[neighbor_index] = Some(current_index);
                self.queue.push_back(neighbor_index);
            }
        }
    }

    fn reconstruct(&self, grid: &Grid, target: Position) -> Route {
        let Some(target_index) = grid.index(target) else {
            return Route::empty();
        };

        let distance = self.distances[target_index];
        if distance == UNREACHED {
            return Route::empty();
        }

        let capacity = usize::try_from(distance).map_or(0, |steps| steps.saturating_add(1));
        let mut cells = Vec::with_capacity(capacity);
        let mut cursor = target_index;

        loop {
            let Some(cell) = grid.position_at(cursor) else {
                return Route::empty();
            };
            cells.push(cell);

            match self.predecessors[cursor] {
                Some(previous) => cursor = previous,
                None => break,
            }
        }

        cells.reverse();
        Route::from_cells(cells)
    }
}

/// Solves a single query with a throwaway [`PathSolver`].
#[must_use]
pub fn solve(grid: &Grid, start: Position, target: Position) -> Route {
    PathSolver::new().solve(grid, start, target)
}

fn index(width: usize, cell: Position) -> Option<usize> {
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
