//! Immutable maze layout shared by reference with every agent.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Position;

const WALL_SYMBOL: char = '#';
const OPEN_SYMBOL: char = '.';

/// Traversability of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Cell agents may enter.
    Open,
    /// Cell that blocks movement.
    Wall,
}

impl Cell {
    /// Reports whether agents may enter the cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            WALL_SYMBOL => Some(Self::Wall),
            OPEN_SYMBOL | ' ' => Some(Self::Open),
            _ => None,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::Open => OPEN_SYMBOL,
            Self::Wall => WALL_SYMBOL,
        }
    }
}

/// Errors raised while constructing a [`Grid`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// At least one dimension was zero.
    #[error("grid dimensions must be positive, got {columns}x{rows}")]
    EmptyDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The dimensions describe more cells than the platform can address.
    #[error("grid dimensions {columns}x{rows} exceed the addressable cell count")]
    TooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The cell vector length disagrees with the dimensions.
    #[error("expected {expected} cells for the grid dimensions, got {actual}")]
    CellCountMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
    /// A layout row differs in width from the first row.
    #[error("row {row} is {actual} cells wide, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A layout contained a character that is neither wall nor open floor.
    #[error("unknown maze symbol '{symbol}' at column {column}, row {row}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
}

/// Static rows × columns matrix of open and wall cells.
///
/// A grid never changes after construction; every query is a pure read.
/// Cells are stored densely in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid from row-major cells.
    pub fn new(columns: u32, rows: u32, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = cell_count(columns, rows)?;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Creates a grid without any walls.
    pub fn open(columns: u32, rows: u32) -> Result<Self, GridError> {
        let count = cell_count(columns, rows)?;
        Self::new(columns, rows, vec![Cell::Open; count])
    }

    /// Parses a grid from layout rows where `#` marks a wall and `.` or a
    /// space marks open floor.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let mut width: Option<usize> = None;
        let mut cells = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let mut row_width = 0;
            for (column, symbol) in row.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(GridError::UnknownSymbol {
                    symbol,
                    column,
                    row: row_index,
                })?;
                cells.push(cell);
                row_width += 1;
            }

            match width {
                None => width = Some(row_width),
                Some(expected) if expected != row_width => {
                    return Err(GridError::RaggedRow {
                        row: row_index,
                        expected,
                        actual: row_width,
                    });
                }
                Some(_) => {}
            }
        }

        let columns = u32::try_from(width.unwrap_or(0)).unwrap_or(u32::MAX);
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        Self::new(columns, row_count, cells)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the position names a cell of this grid.
    #[must_use]
    pub const fn in_bounds(&self, position: Position) -> bool {
        position.x() < self.columns && position.y() < self.rows
    }

    /// Reports whether the position is in bounds and traversable.
    ///
    /// The bounds check runs first, so out-of-bounds positions simply report
    /// `false` instead of reaching the cell lookup.
    #[must_use]
    pub fn is_open(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_open)
    }

    /// State of the cell at the position, if it lies within the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Row-major offset of the position, if it lies within the grid.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.in_bounds(position) {
            return None;
        }

        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Position stored at the provided row-major offset.
    #[must_use]
    pub fn position_at(&self, index: usize) -> Option<Position> {
        if index >= self.cells.len() {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let x = u32::try_from(index % width).ok()?;
        let y = u32::try_from(index / width).ok()?;
        Some(Position::new(x, y))
    }

    /// Iterator over every open cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_open())
            .filter_map(|(index, _)| self.position_at(index))
    }

    /// Layout rows using the same symbols accepted by [`Grid::from_rows`].
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX);
        self.cells
            .chunks(width.max(1))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.to_rows().iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = layout.lines().filter(|line| !line.is_empty()).collect();
        Self::from_rows(&rows)
    }
}

fn cell_count(columns: u32, rows: u32) -> Result<usize, GridError> {
    if columns == 0 || rows == 0 {
        return Err(GridError::EmptyDimensions { columns, rows });
    }

    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).map_err(|_| GridError::TooLarge { columns, rows })
}
