//! Plain-text maze files carrying ghost and target spawn markers.

use maze_pursuit_core::{Grid, GridError, Position};
use thiserror::Error;

const GHOST_MARKER: char = 'G';
const TARGET_MARKER: char = 'P';
const FLOOR: char = '.';

/// Maze used when neither a file nor a layout string is provided.
pub(crate) const DEFAULT_MAZE: &str = "\
###################
#G.......#.......G#
#.##.###.#.###.##.#
#.................#
#.##.#.#####.#.##.#
#....#...#...#....#
####.###.#.###.####
#........P........#
####.#.#####.#.####
#....#...#...#....#
#.##.###.#.###.##.#
#.................#
###################
";

/// Maze grid together with the cells where ghosts and the target start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MazeLayout {
    pub(crate) grid: Grid,
    pub(crate) ghosts: Vec<Position>,
    pub(crate) target: Position,
}

/// Errors raised while reading a maze layout.
#[derive(Debug, Error)]
pub(crate) enum MazeFileError {
    /// The floor plan itself is malformed.
    #[error("invalid maze grid")]
    Grid(#[from] GridError),
    /// No `P` marker was present.
    #[error("maze has no target marker 'P'")]
    MissingTarget,
    /// More than one `P` marker was present.
    #[error("maze has more than one target marker, at {first:?} and {second:?}")]
    DuplicateTarget { first: Position, second: Position },
    /// A spawn cell lies on a wall or outside the grid.
    #[error("spawn cell {cell:?} is not an open maze cell")]
    BlockedSpawn { cell: Position },
}

impl MazeLayout {
    /// Assembles a layout, checking that every spawn cell is open.
    pub(crate) fn from_parts(
        grid: Grid,
        ghosts: Vec<Position>,
        target: Position,
    ) -> Result<Self, MazeFileError> {
        if let Some(&cell) = std::iter::once(&target)
            .chain(ghosts.iter())
            .find(|cell| !grid.is_open(**cell))
        {
            return Err(MazeFileError::BlockedSpawn { cell });
        }

        Ok(Self {
            grid,
            ghosts,
            target,
        })
    }

    /// Parses a maze where `#` is a wall, `.` is floor, `G` marks a ghost
    /// spawn and `P` marks the single target spawn.
    pub(crate) fn parse(text: &str) -> Result<Self, MazeFileError> {
        let mut rows = Vec::new();
        let mut ghosts = Vec::new();
        let mut target: Option<Position> = None;

        for (y, line) in text.lines().filter(|line| !line.is_empty()).enumerate() {
            let mut row = String::with_capacity(line.len());
            for (x, symbol) in line.chars().enumerate() {
                let cell = Position::new(coordinate(x), coordinate(y));
                match symbol {
                    GHOST_MARKER => {
                        ghosts.push(cell);
                        row.push(FLOOR);
                    }
                    TARGET_MARKER => {
                        if let Some(first) = target {
                            return Err(MazeFileError::DuplicateTarget {
                                first,
                                second: cell,
                            });
                        }
                        target = Some(cell);
                        row.push(FLOOR);
                    }
                    other => row.push(other),
                }
            }
            rows.push(row);
        }

        let grid = Grid::from_rows(&rows)?;
        let target = target.ok_or(MazeFileError::MissingTarget)?;
        Self::from_parts(grid, ghosts, target)
    }

    /// Renders the layout back into the text format accepted by [`Self::parse`].
    pub(crate) fn to_text(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .grid
            .to_rows()
            .into_iter()
            .map(|row| row.chars().collect())
            .collect();

        for ghost in &self.ghosts {
            set_symbol(&mut rows, *ghost, GHOST_MARKER);
        }
        set_symbol(&mut rows, self.target, TARGET_MARKER);

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn set_symbol(rows: &mut [Vec<char>], cell: Position, symbol: char) {
    let (Ok(x), Ok(y)) = (usize::try_from(cell.x()), usize::try_from(cell.y())) else {
        return;
    };
    if let Some(slot) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
        *slot = symbol;
    }
}

fn coordinate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
