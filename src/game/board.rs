use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::error::BoardError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of consecutive cells in a winning line and in a heuristic window.
pub const WINDOW: usize = 4;

/// Smallest and largest supported side length.
pub const MIN_SIDE: usize = WINDOW;
pub const MAX_SIDE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// The four line orientations a window can follow. Offsets are in
/// (row, column) with row 0 at the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `(r, c + i)`
    Horizontal,
    /// `(r + i, c)`
    Vertical,
    /// `(r + i, c + i)`
    AscendingDiagonal,
    /// `(r - i, c + i)`
    DescendingDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::AscendingDiagonal,
        Direction::DescendingDiagonal,
    ];

    fn offset(self, row: usize, col: usize, i: usize) -> (usize, usize) {
        match self {
            Direction::Horizontal => (row, col + i),
            Direction::Vertical => (row + i, col),
            Direction::AscendingDiagonal => (row + i, col + i),
            Direction::DescendingDiagonal => (row - i, col + i),
        }
    }
}

/// A rows x cols grid. Row 0 is the top, row `rows - 1` the bottom; pieces
/// settle towards the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty 6x7 board
    pub fn new() -> Self {
        Board {
            rows: ROWS,
            cols: COLS,
            cells: vec![Cell::Empty; ROWS * COLS],
        }
    }

    /// Create an empty board of the given size.
    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self, BoardError> {
        check_dimensions(rows, cols)?;
        Ok(Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// An empty board with the same dimensions.
    pub fn cleared(&self) -> Board {
        Board {
            rows: self.rows,
            cols: self.cols,
            cells: vec![Cell::Empty; self.rows * self.cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// A column accepts a piece iff its top cell is empty. Out-of-range
    /// columns are never valid.
    pub fn is_valid_column(&self, col: usize) -> bool {
        col < self.cols && self.get(0, col) == Cell::Empty
    }

    /// All columns that can still accept a piece, left to right.
    pub fn valid_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| self.is_valid_column(col)).collect()
    }

    /// The bottom-most empty row of `col`, or `None` if the column is full.
    pub fn next_open_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.get(row, col) == Cell::Empty)
    }

    /// Write `player`'s piece into a cell. The cell must be the one
    /// returned by [`Board::next_open_row`] for `col`.
    pub fn drop_piece(&mut self, row: usize, col: usize, player: Player) {
        debug_assert_eq!(self.get(row, col), Cell::Empty);
        self.cells[row * self.cols + col] = player.to_cell();
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop(&mut self, col: usize, player: Player) -> Option<usize> {
        let row = self.next_open_row(col)?;
        self.drop_piece(row, col, player);
        Some(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| !self.is_valid_column(col))
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Number of `player`'s pieces on the board.
    pub fn count_of(&self, player: Player) -> usize {
        let cell = player.to_cell();
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Every window of [`WINDOW`] consecutive cells along `direction`.
    pub fn windows(&self, direction: Direction) -> impl Iterator<Item = [Cell; WINDOW]> + '_ {
        let span = WINDOW - 1;
        let (rows, cols) = match direction {
            Direction::Horizontal => (0..self.rows, 0..self.cols.saturating_sub(span)),
            Direction::Vertical => (0..self.rows.saturating_sub(span), 0..self.cols),
            Direction::AscendingDiagonal => (
                0..self.rows.saturating_sub(span),
                0..self.cols.saturating_sub(span),
            ),
            Direction::DescendingDiagonal => (
                span.min(self.rows)..self.rows,
                0..self.cols.saturating_sub(span),
            ),
        };

        rows.flat_map(move |row| cols.clone().map(move |col| (row, col)))
            .map(move |(row, col)| {
                let window: [Cell; WINDOW] = std::array::from_fn(|i| {
                    let (r, c) = direction.offset(row, col, i);
                    self.get(r, c)
                });
                window
            })
    }

    /// True if `player` has four in a row along any orientation.
    pub fn has_four_in_row(&self, player: Player) -> bool {
        let cell = player.to_cell();
        Direction::ALL.iter().any(|&direction| {
            self.windows(direction)
                .any(|window| window.iter().all(|&c| c == cell))
        })
    }

    /// A win for either player, or no column left to play.
    pub fn is_terminal(&self) -> bool {
        self.has_four_in_row(Player::Red) || self.has_four_in_row(Player::Yellow) || self.is_full()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), BoardError> {
    let supported = MIN_SIDE..=MAX_SIDE;
    if supported.contains(&rows) && supported.contains(&cols) {
        Ok(())
    } else {
        Err(BoardError::Dimensions {
            rows,
            cols,
            min: MIN_SIDE,
            max: MAX_SIDE,
        })
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(grid: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        check_dimensions(rows, cols)?;

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(BoardError::RaggedRow {
                    row,
                    found: line.len(),
                    expected: cols,
                });
            }
            cells.extend(line);
        }

        let board = Board { rows, cols, cells };
        for col in 0..cols {
            for row in 0..rows - 1 {
                if board.get(row, col) != Cell::Empty && board.get(row + 1, col) == Cell::Empty {
                    return Err(BoardError::FloatingPiece { row, col });
                }
            }
        }
        Ok(board)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.cells.chunks(board.cols).map(<[Cell]>::to_vec).collect()
    }
}
