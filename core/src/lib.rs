#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Pursuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems read world views, keep their own planning state and
//! respond with further commands; they never touch world state directly.

mod grid;

pub use grid::{Cell, Grid, GridError};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a new maze, discarding every ghost and the current target.
    ConfigureMaze {
        /// Immutable layout the simulation runs on until reconfigured.
        grid: Grid,
    },
    /// Moves the pursued target to the provided cell.
    PlaceTarget {
        /// Cell the target should occupy.
        cell: Position,
    },
    /// Requests that a new ghost be created at the provided cell.
    SpawnGhost {
        /// Cell the ghost starts in.
        cell: Position,
        /// Movement strategy driving the ghost every tick.
        strategy: Strategy,
    },
    /// Requests that a ghost move one cell in the provided direction.
    StepGhost {
        /// Identifier of the ghost attempting to move.
        ghost: GhostId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Advances the simulation clock by one discrete tick.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new maze was installed.
    MazeConfigured {
        /// Number of columns in the installed grid.
        columns: u32,
        /// Number of rows in the installed grid.
        rows: u32,
    },
    /// Confirms that the target now occupies the provided cell.
    TargetPlaced {
        /// Cell occupied by the target.
        cell: Position,
    },
    /// Reports that a target placement request was rejected.
    TargetRejected {
        /// Cell provided in the placement request.
        cell: Position,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a ghost was created.
    GhostSpawned {
        /// Identifier assigned to the ghost by the world.
        ghost: GhostId,
        /// Cell the ghost occupies after spawning.
        cell: Position,
        /// Strategy driving the ghost.
        strategy: Strategy,
    },
    /// Reports that a ghost spawn request was rejected.
    GhostRejected {
        /// Cell provided in the spawn request.
        cell: Position,
        /// Specific reason the spawn failed.
        reason: PlacementError,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started, counting from one.
        tick: u64,
    },
    /// Confirms that a ghost moved between two adjacent cells.
    GhostAdvanced {
        /// Identifier of the ghost that moved.
        ghost: GhostId,
        /// Cell the ghost occupied before moving.
        from: Position,
        /// Cell the ghost occupies after moving.
        to: Position,
    },
    /// Reports that a ghost attempted a move that failed the collision check.
    GhostBlocked {
        /// Identifier of the ghost that stayed in place.
        ghost: GhostId,
        /// Cell the ghost still occupies.
        at: Position,
        /// Direction of the rejected step.
        direction: Direction,
    },
}

/// Location of a single grid cell expressed as column (`x`) and row (`y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Cell reached by applying `direction`, or `None` when a coordinate
    /// would leave the unsigned range.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let x = u32::try_from(i64::from(self.x).checked_add(direction.dx())?).ok()?;
        let y = u32::try_from(i64::from(self.y).checked_add(direction.dy())?).ok()?;
        Some(Self::new(x, y))
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Movement vector between two grid cells.
///
/// Directions are derived from positions rather than stored authoritatively:
/// [`Direction::between`] yields whatever vector separates two cells, and
/// [`Direction::is_unit`] tells whether that vector is a single orthogonal
/// step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    dx: i64,
    dy: i64,
}

impl Direction {
    /// Movement toward decreasing row indices.
    pub const UP: Self = Self::new(0, -1);
    /// Movement toward increasing column indices.
    pub const RIGHT: Self = Self::new(1, 0);
    /// Movement toward increasing row indices.
    pub const DOWN: Self = Self::new(0, 1);
    /// Movement toward decreasing column indices.
    pub const LEFT: Self = Self::new(-1, 0);

    /// Cardinal directions in canonical neighbor order: up, right, down, left.
    pub const CARDINALS: [Self; 4] = [Self::UP, Self::RIGHT, Self::DOWN, Self::LEFT];

    /// Creates a direction from raw column and row deltas.
    #[must_use]
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    /// Vector that leads from `from` to `to`.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Self {
        Self {
            dx: i64::from(to.x()) - i64::from(from.x()),
            dy: i64::from(to.y()) - i64::from(from.y()),
        }
    }

    /// Column delta of the vector.
    #[must_use]
    pub const fn dx(&self) -> i64 {
        self.dx
    }

    /// Row delta of the vector.
    #[must_use]
    pub const fn dy(&self) -> i64 {
        self.dy
    }

    /// Reports whether the vector is exactly one orthogonal step.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        self.dx.abs() + self.dy.abs() == 1
    }
}

/// Ordered sequence of cells forming a shortest path.
///
/// A non-empty route starts at the cell it was planned from and ends at the
/// cell it was planned toward, both inclusive. An empty route means no path
/// exists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    cells: Vec<Position>,
}

impl Route {
    /// Route that signals the absence of any path.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Wraps an ordered list of cells in travel order.
    #[must_use]
    pub fn from_cells(cells: Vec<Position>) -> Self {
        Self { cells }
    }

    /// Cells composing the route in travel order.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of cells on the route, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the route is empty, i.e. no path exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of single-cell moves needed to traverse the route.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// First cell on the route.
    #[must_use]
    pub fn start(&self) -> Option<Position> {
        self.cells.first().copied()
    }

    /// Last cell on the route.
    #[must_use]
    pub fn destination(&self) -> Option<Position> {
        self.cells.last().copied()
    }

    /// Reports whether every consecutive pair is one orthogonal step apart.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| Direction::between(pair[0], pair[1]).is_unit())
    }

    /// Iterator over the cells in travel order.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    /// Consumes the route, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<Position> {
        self.cells
    }
}

impl IntoIterator for Route {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

/// Movement strategies a ghost can be spawned with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Recomputes a shortest route to the target every tick and follows it.
    #[default]
    Pursuit,
    /// Never moves.
    Stationary,
}

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons a target or ghost placement may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No maze has been configured yet.
    MissingMaze,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is a wall.
    Wall,
}
