#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Pursuit.

use log::{debug, trace, warn};
use maze_pursuit_core::{
    Command, Direction, Event, GhostId, Grid, PlacementError, Position, Strategy,
};

/// Represents the authoritative Maze Pursuit world state.
#[derive(Debug, Default)]
pub struct World {
    grid: Option<Grid>,
    target: Option<Position>,
    ghosts: Vec<Ghost>,
    next_ghost_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world awaiting a maze.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_cell(&self, cell: Position) -> Result<(), PlacementError> {
        let grid = self.grid.as_ref().ok_or(PlacementError::MissingMaze)?;

        if !grid.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if !grid.is_open(cell) {
            return Err(PlacementError::Wall);
        }

        Ok(())
    }

    fn step_ghost(&mut self, ghost: GhostId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(grid) = self.grid.as_ref() else {
            warn!("ignoring step for ghost {} without a maze", ghost.get());
            return;
        };
        let Some(entry) = self.ghosts.iter_mut().find(|entry| entry.id == ghost) else {
            warn!("ignoring step for unknown ghost {}", ghost.get());
            return;
        };

        let from = entry.cell;
        let destination = if direction.is_unit() {
            from.offset(direction).filter(|cell| grid.is_open(*cell))
        } else {
            None
        };

        match destination {
            Some(to) => {
                entry.cell = to;
                trace!("ghost {} advanced {from:?} -> {to:?}", ghost.get());
                out_events.push(Event::GhostAdvanced { ghost, from, to });
            }
            None => {
                debug!(
                    "ghost {} blocked at {from:?} moving {direction:?}",
                    ghost.get()
                );
                out_events.push(Event::GhostBlocked {
                    ghost,
                    at: from,
                    direction,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze { grid } => {
            let (columns, rows) = (grid.columns(), grid.rows());
            debug!("configuring {columns}x{rows} maze");

            world.grid = Some(grid);
            world.target = None;
            world.ghosts.clear();
            world.next_ghost_id = 0;
            world.tick_index = 0;
            out_events.push(Event::MazeConfigured { columns, rows });
        }
        Command::PlaceTarget { cell } => match world.validate_cell(cell) {
            Ok(()) => {
                world.target = Some(cell);
                out_events.push(Event::TargetPlaced { cell });
            }
            Err(reason) => {
                warn!("rejected target placement at {cell:?}: {reason:?}");
                out_events.push(Event::TargetRejected { cell, reason });
            }
        },
        Command::SpawnGhost { cell, strategy } => match world.validate_cell(cell) {
            Ok(()) => {
                let ghost = GhostId::new(world.next_ghost_id);
                world.next_ghost_id = world.next_ghost_id.saturating_add(1);
                world.ghosts.push(Ghost {
                    id: ghost,
                    cell,
                    strategy,
                });
                debug!("spawned ghost {} at {cell:?}", ghost.get());
                out_events.push(Event::GhostSpawned {
                    ghost,
                    cell,
                    strategy,
                });
            }
            Err(reason) => {
                warn!("rejected ghost spawn at {cell:?}: {reason:?}");
                out_events.push(Event::GhostRejected { cell, reason });
            }
        },
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StepGhost { ghost, direction } => {
            world.step_ghost(ghost, direction, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_pursuit_core::{GhostId, Grid, Position, Strategy};

    use super::World;

    /// Provides read-only access to the configured maze, if any.
    #[must_use]
    pub fn grid(world: &World) -> Option<&Grid> {
        world.grid.as_ref()
    }

    /// Cell currently occupied by the target, if one was placed.
    #[must_use]
    pub fn target(world: &World) -> Option<Position> {
        world.target
    }

    /// Number of ticks processed since the maze was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the ghosts inhabiting the maze.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        let mut snapshots: Vec<GhostSnapshot> = world
            .ghosts
            .iter()
            .map(|ghost| GhostSnapshot {
                id: ghost.id,
                position: ghost.cell,
                strategy: ghost.strategy,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        GhostView { snapshots }
    }

    /// Read-only snapshot describing all ghosts within the maze.
    #[derive(Clone, Debug, Default)]
    pub struct GhostView {
        snapshots: Vec<GhostSnapshot>,
    }

    impl GhostView {
        /// Iterator over the captured ghost snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
            self.snapshots.iter()
        }

        /// Snapshot of the ghost with the provided identifier.
        #[must_use]
        pub fn get(&self, id: GhostId) -> Option<&GhostSnapshot> {
            self.snapshots.iter().find(|snapshot| snapshot.id == id)
        }

        /// Number of ghosts captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the view holds no ghosts.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<GhostSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single ghost's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GhostSnapshot {
        /// Unique identifier assigned to the ghost.
        pub id: GhostId,
        /// Grid cell currently occupied by the ghost.
        pub position: Position,
        /// Strategy the ghost was spawned with.
        pub strategy: Strategy,
    }
}

#[derive(Debug)]
struct Ghost {
    id: GhostId,
    cell: Position,
    strategy: Strategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_world(rows: &[&str]) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        let grid = Grid::from_rows(rows).expect("test grid parses");
        apply(&mut world, Command::ConfigureMaze { grid }, &mut events);
        (world, events)
    }

    #[test]
    fn configure_maze_installs_grid() {
        let (world, events) = configured_world(&["....", "#..#"]);

        assert_eq!(events, vec![Event::MazeConfigured { columns: 4, rows: 2 }]);
        let grid = query::grid(&world).expect("grid installed");
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 2);
        assert_eq!(query::target(&world), None);
        assert!(query::ghost_view(&world).is_empty());
    }

    #[test]
    fn placements_require_a_maze() {
        let mut world = World::new();
        let mut events = Vec::new();
        let cell = Position::new(0, 0);

        apply(&mut world, Command::PlaceTarget { cell }, &mut events);
        apply(
            &mut world,
            Command::SpawnGhost {
                cell,
                strategy: Strategy::Pursuit,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TargetRejected {
                    cell,
                    reason: PlacementError::MissingMaze,
                },
                Event::GhostRejected {
                    cell,
                    reason: PlacementError::MissingMaze,
                },
            ]
        );
    }

    #[test]
    fn placements_reject_walls_and_out_of_bounds_cells() {
        let (mut world, _) = configured_world(&[".#", ".."]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceTarget {
                cell: Position::new(1, 0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnGhost {
                cell: Position::new(2, 0),
                strategy: Strategy::Pursuit,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TargetRejected {
                    cell: Position::new(1, 0),
                    reason: PlacementError::Wall,
                },
                Event::GhostRejected {
                    cell: Position::new(2, 0),
                    reason: PlacementError::OutOfBounds,
                },
            ]
        );
        assert_eq!(query::target(&world), None);
        assert!(query::ghost_view(&world).is_empty());
    }

    #[test]
    fn ghost_identifiers_follow_spawn_order() {
        let (mut world, _) = configured_world(&["...."]);
        let mut events = Vec::new();

        for x in 0..3 {
            apply(
                &mut world,
                Command::SpawnGhost {
                    cell: Position::new(x, 0),
                    strategy: Strategy::Pursuit,
                },
                &mut events,
            );
        }

        let ids: Vec<u32> = query::ghost_view(&world)
            .iter()
            .map(|snapshot| snapshot.id.get())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    fn spawn(world: &mut World, x: u32, y: u32) -> GhostId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnGhost {
                cell: Position::new(x, y),
                strategy: Strategy::Pursuit,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::GhostSpawned { ghost, .. }] => *ghost,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    #[test]
    fn tick_only_advances_time() {
        let (mut world, _) = configured_world(&["...."]);
        let _ = spawn(&mut world, 0, 0);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 1 },
                Event::TimeAdvanced { tick: 2 },
            ]
        );
        assert_eq!(query::tick_index(&world), 2);
        let view = query::ghost_view(&world);
        let ghost = view.get(GhostId::new(0)).expect("ghost exists");
        assert_eq!(ghost.position, Position::new(0, 0));
    }

    #[test]
    fn step_ghost_moves_into_open_neighbor() {
        let (mut world, _) = configured_world(&["...", ".#."]);
        let ghost = spawn(&mut world, 0, 1);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::StepGhost {
                ghost,
                direction: Direction::UP,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::GhostAdvanced {
                ghost,
                from: Position::new(0, 1),
                to: Position::new(0, 0),
            }]
        );
        let view = query::ghost_view(&world);
        assert_eq!(
            view.get(ghost).map(|snapshot| snapshot.position),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn step_ghost_rejects_walls_edges_and_long_jumps() {
        let (mut world, _) = configured_world(&["...", ".#."]);
        let ghost = spawn(&mut world, 0, 1);
        let mut events = Vec::new();

        for direction in [Direction::RIGHT, Direction::LEFT, Direction::new(2, 0)] {
            apply(
                &mut world,
                Command::StepGhost { ghost, direction },
                &mut events,
            );
        }

        assert_eq!(
            events,
            vec![
                Event::GhostBlocked {
                    ghost,
                    at: Position::new(0, 1),
                    direction: Direction::RIGHT,
                },
                Event::GhostBlocked {
                    ghost,
                    at: Position::new(0, 1),
                    direction: Direction::LEFT,
                },
                Event::GhostBlocked {
                    ghost,
                    at: Position::new(0, 1),
                    direction: Direction::new(2, 0),
                },
            ]
        );
        let view = query::ghost_view(&world);
        assert_eq!(
            view.get(ghost).map(|snapshot| snapshot.position),
            Some(Position::new(0, 1))
        );
    }

    #[test]
    fn step_for_unknown_ghost_is_ignored() {
        let (mut world, _) = configured_world(&["..."]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::StepGhost {
                ghost: GhostId::new(9),
                direction: Direction::RIGHT,
            },
            &mut events,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn reconfiguring_discards_ghosts_and_target() {
        let (mut world, _) = configured_world(&["..."]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTarget {
                cell: Position::new(2, 0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnGhost {
                cell: Position::new(0, 0),
                strategy: Strategy::Pursuit,
            },
            &mut events,
        );
        apply(&mut world, Command::Tick, &mut events);

        let grid = Grid::open(2, 2).expect("grid builds");
        apply(&mut world, Command::ConfigureMaze { grid }, &mut events);

        assert_eq!(query::target(&world), None);
        assert!(query::ghost_view(&world).is_empty());
        assert_eq!(query::tick_index(&world), 0);
    }
}
