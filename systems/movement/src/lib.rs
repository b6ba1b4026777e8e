#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that plans ghost routes and proposes steps.
//!
//! Every agent implements [`Movable`]. [`Movement`] keeps one agent per ghost,
//! hands each a [`TickContext`] holding the shared, immutable grid and a
//! snapshot of the target's position, and turns the resulting
//! [`StepOutcome`] into a [`Command::StepGhost`] for the world to validate.

mod follower;
mod pursuit;

pub use follower::PathFollower;
pub use pursuit::{PursuitAgent, PursuitState};

use std::collections::BTreeMap;

use maze_pursuit_core::{Command, Direction, Event, GhostId, Grid, Position, Strategy};
use maze_pursuit_world::query::GhostView;

/// Pure system that reacts to world events and emits ghost step commands.
#[derive(Debug, Default)]
pub struct Movement {
    agents: BTreeMap<GhostId, Agent>,
}

impl Movement {
    /// Creates a movement system that tracks no ghosts yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Agents are created from `GhostSpawned` and dropped on
    /// `MazeConfigured`. Steps are only planned when the batch contains a
    /// `TimeAdvanced` event and both a maze and a target exist. Ghosts are
    /// planned in ascending id order against the same target cell.
    pub fn handle(
        &mut self,
        events: &[Event],
        ghost_view: &GhostView,
        grid: Option<&Grid>,
        target: Option<Position>,
        out: &mut Vec<Command>,
    ) {
        let mut tick = None;
        for event in events {
            match event {
                Event::MazeConfigured { .. } => self.agents.clear(),
                Event::GhostSpawned {
                    ghost,
                    cell,
                    strategy,
                } => {
                    let _ = self.agents.insert(*ghost, Agent::spawn(*strategy, *cell));
                }
                Event::TimeAdvanced { tick: index } => tick = Some(*index),
                _ => {}
            }
        }

        let (Some(tick), Some(grid), Some(target)) = (tick, grid, target) else {
            return;
        };

        let context = TickContext::new(grid, target, tick);
        for ghost in ghost_view.iter() {
            let agent = self
                .agents
                .entry(ghost.id)
                .or_insert_with(|| Agent::spawn(ghost.strategy, ghost.position));
            agent.relocate(ghost.position);

            let direction = match agent.step(&context) {
                StepOutcome::Advanced { direction, .. } => direction,
                StepOutcome::Blocked { toward } => Direction::between(ghost.position, toward),
                StepOutcome::Idle => continue,
            };
            out.push(Command::StepGhost {
                ghost: ghost.id,
                direction,
            });
        }
    }

    /// Agent planning for the provided ghost, if it is tracked.
    #[must_use]
    pub fn agent(&self, ghost: GhostId) -> Option<&Agent> {
        self.agents.get(&ghost)
    }
}

/// Read-only inputs shared by every agent during a single tick.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    /// Maze the agents move through.
    pub grid: &'a Grid,
    /// Cell occupied by the pursued target when the tick started.
    pub target: Position,
    /// Index of the tick being processed.
    pub tick: u64,
}

impl<'a> TickContext<'a> {
    /// Bundles the inputs for one tick.
    #[must_use]
    pub const fn new(grid: &'a Grid, target: Position, tick: u64) -> Self {
        Self { grid, target, tick }
    }
}

/// Result of asking an agent to take one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No waypoint was pending, so the agent stayed put.
    Idle,
    /// The next waypoint failed the collision check; the agent stayed put.
    Blocked {
        /// Waypoint the agent attempted to reach.
        toward: Position,
    },
    /// The agent moved to an adjacent open cell.
    Advanced {
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
        /// Unit vector from `from` to `to`.
        direction: Direction,
    },
}

/// Capability shared by every agent whose position updates once per tick.
pub trait Movable {
    /// Cell the agent currently occupies.
    fn position(&self) -> Position;

    /// Most recent movement vector the agent attempted, if any.
    fn heading(&self) -> Option<Direction>;

    /// Advances the agent by at most one cell.
    fn step(&mut self, context: &TickContext<'_>) -> StepOutcome;
}

/// Agent that never leaves its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stationary {
    position: Position,
}

impl Stationary {
    /// Creates a stationary agent anchored at `position`.
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self { position }
    }
}

impl Movable for Stationary {
    fn position(&self) -> Position {
        self.position
    }

    fn heading(&self) -> Option<Direction> {
        None
    }

    fn step(&mut self, _context: &TickContext<'_>) -> StepOutcome {
        StepOutcome::Idle
    }
}

/// Agent variants selectable through a [`Strategy`].
#[derive(Clone, Debug)]
pub enum Agent {
    /// Chases the target along a freshly computed shortest route.
    Pursuit(PursuitAgent),
    /// Holds its position forever.
    Stationary(Stationary),
}

impl Agent {
    /// Creates the agent variant matching `strategy` at `position`.
    #[must_use]
    pub fn spawn(strategy: Strategy, position: Position) -> Self {
        match strategy {
            Strategy::Pursuit => Self::Pursuit(PursuitAgent::new(position)),
            Strategy::Stationary => Self::Stationary(Stationary::new(position)),
        }
    }

    /// Strategy the agent was spawned with.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Pursuit(_) => Strategy::Pursuit,
            Self::Stationary(_) => Strategy::Stationary,
        }
    }

    /// Pursuit state of the agent; non-pursuing variants are always idle.
    #[must_use]
    pub fn pursuit_state(&self) -> PursuitState {
        match self {
            Self::Pursuit(agent) => agent.state(),
            Self::Stationary(_) => PursuitState::Idle,
        }
    }

    /// Moves the agent to `position` without planning.
    pub fn relocate(&mut self, position: Position) {
        match self {
            Self::Pursuit(agent) => agent.relocate(position),
            Self::Stationary(agent) => agent.position = position,
        }
    }

    /// Next cell the agent intends to enter, if any.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<Position> {
        match self {
            Self::Pursuit(agent) => agent.follower().next_waypoint(),
            Self::Stationary(_) => None,
        }
    }
}

impl Movable for Agent {
    fn position(&self) -> Position {
        match self {
            Self::Pursuit(agent) => agent.position(),
            Self::Stationary(agent) => agent.position(),
        }
    }

    fn heading(&self) -> Option<Direction> {
        match self {
            Self::Pursuit(agent) => agent.heading(),
            Self::Stationary(agent) => agent.heading(),
        }
    }

    fn step(&mut self, context: &TickContext<'_>) -> StepOutcome {
        match self {
            Self::Pursuit(agent) => agent.step(context),
            Self::Stationary(agent) => agent.step(context),
        }
    }
}
