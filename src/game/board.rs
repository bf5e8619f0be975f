use serde::{Deserialize, Serialize};

use crate::error::MoveError;

use super::Piece;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Character used for this cell in saved grids. Empty cells are `.`.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::X),
            'O' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        piece.to_cell()
    }
}

/// The 6x7 playing field. Row 0 is the top, row 5 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from raw cells, rejecting layouts with a gap under a
    /// piece. Returns the offending column on failure.
    pub fn from_cells(cells: [[Cell; COLS]; ROWS]) -> Result<Self, usize> {
        for col in 0..COLS {
            let mut seen_empty = false;
            for row in (0..ROWS).rev() {
                match cells[row][col] {
                    Cell::Empty => seen_empty = true,
                    _ if seen_empty => return Err(col),
                    _ => {}
                }
            }
        }
        Ok(Board { cells })
    }

    /// Get the cell at a specific position. Out-of-range coordinates read
    /// as empty.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        if row >= ROWS || col >= COLS {
            return Cell::Empty;
        }
        self.cells[row][col]
    }

    /// Signed variant of [`Board::get`] for scanning along direction vectors.
    pub fn cell_at(&self, row: isize, col: isize) -> Cell {
        if row < 0 || col < 0 {
            return Cell::Empty;
        }
        self.get(row as usize, col as usize)
    }

    pub fn cells(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Check if a column is full. Columns outside the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Columns that can still take a piece, left to right.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, piece: Piece) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }

        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull(col));
        }

        // Lowest empty row in this column
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col].is_empty())
            .ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = piece.to_cell();
        Ok(row)
    }

    /// Drop a piece like [`Board::drop_piece`], reporting only whether it
    /// landed.
    pub fn place(&mut self, col: usize, piece: Piece) -> bool {
        self.drop_piece(col, piece).is_ok()
    }

    /// The top row decides fullness since columns fill bottom-up.
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Row-major flattening, one character per cell.
    pub fn to_row_major(&self) -> String {
        self.cells.iter().flatten().map(|cell| cell.to_char()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
