//! Board cells and the mutable building grid.
//!
//! The board trusts its caller: `place` and `clear` never validate game
//! rules. Rule checks live in the placement engine.

use crate::game::{Building, GameConfig};
use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index (street).
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Get orthogonal neighbours (up, down, left, right) inside a
    /// `rows` x `cols` grid.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, rows: usize, cols: usize) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.row > 0 {
            result[usize::from(count)] = Coord::new(self.row - 1, self.col); // up
            count += 1;
        }
        if self.row + 1 < rows {
            result[usize::from(count)] = Coord::new(self.row + 1, self.col); // down
            count += 1;
        }
        if self.col > 0 {
            result[usize::from(count)] = Coord::new(self.row, self.col - 1); // left
            count += 1;
        }
        if self.col + 1 < cols {
            result[usize::from(count)] = Coord::new(self.row, self.col + 1); // right
            count += 1;
        }

        (result, count)
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Unoccupied.
    #[default]
    Empty,
    /// Holds exactly one building.
    Built(Building),
}

impl Cell {
    /// The building in this cell, if any.
    #[must_use]
    pub const fn building(self) -> Option<Building> {
        match self {
            Cell::Empty => None,
            Cell::Built(building) => Some(building),
        }
    }
}

/// The building grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Number of rows (streets).
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Create an empty board sized for a configuration.
    #[must_use]
    pub fn for_config(config: &GameConfig) -> Self {
        Self::new(config.rows, config.cols)
    }

    /// Clear every cell and resize to the configuration.
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::for_config(config);
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Get the raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a coordinate is within the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Flat index of a coordinate (`row * cols + col`).
    #[must_use]
    pub(crate) fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    /// Get the cell at a coordinate, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// The building at a coordinate, if the cell is in bounds and occupied.
    #[must_use]
    pub fn building_at(&self, coord: Coord) -> Option<Building> {
        self.get(coord).and_then(Cell::building)
    }

    /// Whether the cell holds a building. Out-of-bounds cells are not occupied.
    #[must_use]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.building_at(coord).is_some()
    }

    /// Put a building in a cell, overwriting whatever is there.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn place(&mut self, coord: Coord, building: Building) -> bool {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = Cell::Built(building);
            true
        } else {
            false
        }
    }

    /// Empty a cell.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn clear(&mut self, coord: Coord) -> bool {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = Cell::Empty;
            true
        } else {
            false
        }
    }

    /// Iterate over all coordinates and cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (Coord::new(idx / cols, idx % cols), *cell))
    }

    /// Number of empty cells in a column (0 for an out-of-range column).
    #[must_use]
    pub fn empty_in_column(&self, col: usize) -> usize {
        if col >= self.cols {
            return 0;
        }
        (0..self.rows)
            .filter(|&row| !self.is_occupied(Coord::new(row, col)))
            .count()
    }

    /// Number of empty cells on the whole board.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }
}
