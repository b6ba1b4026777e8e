use std::collections::VecDeque;

use maze_pursuit_core::{Direction, Grid, Position, Route};

use crate::StepOutcome;

/// Turns a [`Route`] into single-cell moves guarded by wall collisions.
///
/// The queue holds the waypoints still to be reached; its head is the next
/// cell to enter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathFollower {
    waypoints: VecDeque<Position>,
}

impl PathFollower {
    /// Creates a follower with no pending waypoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every pending waypoint with the cells of `route`.
    ///
    /// The route's first cell is the one the agent already occupies, so it
    /// is discarded immediately.
    pub fn load(&mut self, route: Route) {
        self.waypoints.clear();
        self.waypoints.extend(route);
        let _ = self.waypoints.pop_front();
    }

    /// Moves `position` toward the head waypoint by at most one cell.
    ///
    /// The head is kept when the collision check fails so the next reload
    /// can correct it, and popped once the agent stands on it.
    pub fn step(&mut self, position: &mut Position, grid: &Grid) -> StepOutcome {
        let Some(next) = self.waypoints.front().copied() else {
            return StepOutcome::Idle;
        };

        let from = *position;
        let direction = Direction::between(from, next);
        if !can_enter(grid, from, direction) {
            return StepOutcome::Blocked { toward: next };
        }

        *position = next;
        let _ = self.waypoints.pop_front();

        StepOutcome::Advanced {
            from,
            to: next,
            direction,
        }
    }

    /// Waypoints still to be reached, head first.
    pub fn waypoints(&self) -> impl Iterator<Item = &Position> {
        self.waypoints.iter()
    }

    /// Cell the follower will try to enter on the next step.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<Position> {
        self.waypoints.front().copied()
    }

    /// Number of pending waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether no waypoint is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Drops every pending waypoint.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}

fn can_enter(grid: &Grid, from: Position, direction: Direction) -> bool {
    direction.is_unit()
        && from
            .offset(direction)
            .is_some_and(|destination| grid.is_open(destination))
}
