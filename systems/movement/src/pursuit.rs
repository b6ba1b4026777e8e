use log::trace;
use maze_pursuit_core::{Direction, Grid, Position};
use maze_pursuit_system_pathfinding::PathSolver;

use crate::{Movable, PathFollower, StepOutcome, TickContext};

/// Coarse behavior of a [`PursuitAgent`] after its latest tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PursuitState {
    /// No route is pending: the target was reached or is unreachable.
    #[default]
    Idle,
    /// Waypoints toward the target remain to be followed.
    Pursuing,
}

/// Agent that chases the target along a shortest route recomputed every tick.
///
/// Each tick discards whatever progress the previous route represented,
/// solves again from the current cell to the target's latest cell, and takes
/// a single step. An unreachable target is a normal transient state: the
/// agent stays put and tries again on the next tick.
#[derive(Clone, Debug)]
pub struct PursuitAgent {
    position: Position,
    heading: Option<Direction>,
    state: PursuitState,
    follower: PathFollower,
    solver: PathSolver,
}

impl PursuitAgent {
    /// Creates an idle pursuer standing on `position`.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            heading: None,
            state: PursuitState::Idle,
            follower: PathFollower::new(),
            solver: PathSolver::new(),
        }
    }

    /// State reached at the end of the most recent tick.
    #[must_use]
    pub const fn state(&self) -> PursuitState {
        self.state
    }

    /// Waypoint queue loaded during the most recent tick.
    #[must_use]
    pub const fn follower(&self) -> &PathFollower {
        &self.follower
    }

    /// Moves the agent to `position` without planning.
    ///
    /// Used to follow the authoritative world when it rejected a step.
    pub fn relocate(&mut self, position: Position) {
        self.position = position;
    }

    /// Recomputes the route toward `target`, reloads the follower and steps.
    pub fn pursue(&mut self, grid: &Grid, target: Position) -> StepOutcome {
        let route = self.solver.solve(grid, self.position, target);
        if route.is_empty() {
            trace!(
                "no route from {:?} to {:?}, holding position",
                self.position,
                target
            );
        }

        self.follower.load(route);
        let from = self.position;
        let outcome = self.follower.step(&mut self.position, grid);

        match outcome {
            StepOutcome::Advanced { direction, .. } => self.heading = Some(direction),
            StepOutcome::Blocked { toward } => {
                self.heading = Some(Direction::between(from, toward));
            }
            StepOutcome::Idle => {}
        }

        self.state = if self.follower.is_empty() {
            PursuitState::Idle
        } else {
            PursuitState::Pursuing
        };

        outcome
    }
}

impl Movable for PursuitAgent {
    fn position(&self) -> Position {
        self.position
    }

    fn heading(&self) -> Option<Direction> {
        self.heading
    }

    fn step(&mut self, context: &TickContext<'_>) -> StepOutcome {
        self.pursue(context.grid, context.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_agent_is_idle_without_heading() {
        let agent = PursuitAgent::new(Position::new(2, 2));

        assert_eq!(agent.state(), PursuitState::Idle);
        assert_eq!(agent.heading(), None);
        assert!(agent.follower().is_empty());
    }

    #[test]
    fn pursue_reloads_route_toward_latest_target() {
        let grid = Grid::open(5, 1).expect("grid builds");
        let mut agent = PursuitAgent::new(Position::new(2, 0));

        let _ = agent.pursue(&grid, Position::new(4, 0));
        assert_eq!(agent.position(), Position::new(3, 0));
        assert_eq!(agent.heading(), Some(Direction::RIGHT));

        let outcome = agent.pursue(&grid, Position::new(0, 0));
        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                from: Position::new(3, 0),
                to: Position::new(2, 0),
                direction: Direction::LEFT,
            }
        );
        assert_eq!(agent.heading(), Some(Direction::LEFT));
        assert_eq!(agent.follower().len(), 2);
        assert_eq!(agent.state(), PursuitState::Pursuing);
    }

    #[test]
    fn reaching_the_target_leaves_agent_idle() {
        let grid = Grid::open(2, 1).expect("grid builds");
        let mut agent = PursuitAgent::new(Position::new(0, 0));

        let _ = agent.pursue(&grid, Position::new(1, 0));
        assert_eq!(agent.position(), Position::new(1, 0));
        assert_eq!(agent.state(), PursuitState::Idle);

        assert_eq!(agent.pursue(&grid, Position::new(1, 0)), StepOutcome::Idle);
        assert_eq!(agent.position(), Position::new(1, 0));
    }

    #[test]
    fn unreachable_target_holds_position() {
        let grid = Grid::from_rows(&[".#."]).expect("grid parses");
        let mut agent = PursuitAgent::new(Position::new(0, 0));

        assert_eq!(agent.pursue(&grid, Position::new(2, 0)), StepOutcome::Idle);
        assert_eq!(agent.position(), Position::new(0, 0));
        assert_eq!(agent.state(), PursuitState::Idle);
        assert_eq!(agent.heading(), None);
    }

    #[test]
    fn relocated_agent_plans_from_new_cell() {
        let grid = Grid::open(5, 1).expect("grid builds");
        let mut agent = PursuitAgent::new(Position::new(0, 0));

        agent.relocate(Position::new(3, 0));
        let outcome = agent.pursue(&grid, Position::new(4, 0));

        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                from: Position::new(3, 0),
                to: Position::new(4, 0),
                direction: Direction::RIGHT,
            }
        );
    }
}
