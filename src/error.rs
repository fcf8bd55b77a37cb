use std::path::PathBuf;

use crate::game::{Outcome, Player};

/// Errors produced when a move is rejected. The session is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range (board has {cols} columns)")]
    OutOfRange { column: usize, cols: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: Player, got: Player },

    #[error("game is already over")]
    GameOver,

    #[error("two-player game has no AI opponent")]
    NoAiOpponent,
}

impl MoveError {
    /// The column index was out of range or the column was full.
    pub fn is_invalid_column(&self) -> bool {
        matches!(self, MoveError::OutOfRange { .. } | MoveError::ColumnFull(_))
    }

    /// The move was requested by (or for) an identity that does not hold the turn.
    pub fn is_illegal_turn(&self) -> bool {
        !self.is_invalid_column()
    }
}

/// Errors raised when constructing or deserializing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("unsupported board size {rows}x{cols} (each side must be in {min}..={max})")]
    Dimensions {
        rows: usize,
        cols: usize,
        min: usize,
        max: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("piece at row {row}, column {col} is floating above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// A serialized game whose turn or outcome cannot follow from its board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("{red} red and {yellow} yellow pieces cannot come from alternating turns")]
    PieceCounts { red: usize, yellow: usize },

    #[error("both players have four in a row")]
    BothWin,

    #[error("{winner} has four in a row but {last} moved last")]
    PlayedAfterWin { winner: Player, last: Player },

    #[error("recorded outcome {recorded:?} does not match the board ({actual:?})")]
    OutcomeMismatch { recorded: Outcome, actual: Outcome },

    #[error("recorded turn {recorded} does not match the board ({actual})")]
    TurnMismatch { recorded: Player, actual: Player },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// A string did not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected {expected})")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
