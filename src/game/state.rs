use serde::{Deserialize, Serialize};

use super::{Board, Player};
use crate::error::{BoardError, MoveError, StateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "winner")]
pub enum Outcome {
    InProgress,
    Win(Player),
    Draw,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Board plus whose turn it is. Every transition goes through
/// [`GameState::apply_move`], which checks for a win straight after the
/// placement, so the two players can never both hold four in a row.
/// Deserialization re-derives turn and outcome from the board and rejects
/// records that disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    board: Board,
    turn: Player,
    outcome: Outcome,
}

impl GameState {
    /// Create initial game state on a standard board
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            turn: Player::FIRST,
            outcome: Outcome::InProgress,
        }
    }

    /// Create initial game state on a board of the given size.
    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self, BoardError> {
        Ok(GameState {
            board: Board::with_dimensions(rows, cols)?,
            turn: Player::FIRST,
            outcome: Outcome::InProgress,
        })
    }

    /// Fresh game on an empty board of the same size.
    pub fn restarted(&self) -> Self {
        GameState {
            board: self.board.cleared(),
            turn: Player::FIRST,
            outcome: Outcome::InProgress,
        }
    }

    /// The identity holding the turn. Once the game is over this is the
    /// player who made the final move.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Check if game is over
    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Get list of legal columns (not full). Empty once the game is over.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.valid_columns()
    }

    /// Apply `player`'s move and return the new state. `self` is untouched
    /// when the move is rejected.
    pub fn apply_move(&self, player: Player, column: usize) -> Result<GameState, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if player != self.turn {
            return Err(MoveError::NotYourTurn {
                expected: self.turn,
                got: player,
            });
        }
        if column >= self.board.cols() {
            return Err(MoveError::OutOfRange {
                column,
                cols: self.board.cols(),
            });
        }
        let row = self
            .board
            .next_open_row(column)
            .ok_or(MoveError::ColumnFull(column))?;

        let mut board = self.board.clone();
        board.drop_piece(row, column, player);

        let (turn, outcome) = if board.has_four_in_row(player) {
            (player, Outcome::Win(player))
        } else if board.is_full() {
            (player, Outcome::Draw)
        } else {
            (player.other(), Outcome::InProgress)
        };

        Ok(GameState {
            board,
            turn,
            outcome,
        })
    }
}

#[derive(Deserialize)]
struct RawGameState {
    board: Board,
    turn: Player,
    outcome: Outcome,
}

impl TryFrom<RawGameState> for GameState {
    type Error = StateError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        let derived = GameState::from_board(raw.board)?;
        if raw.outcome != derived.outcome {
            return Err(StateError::OutcomeMismatch {
                recorded: raw.outcome,
                actual: derived.outcome,
            });
        }
        if raw.turn != derived.turn {
            return Err(StateError::TurnMismatch {
                recorded: raw.turn,
                actual: derived.turn,
            });
        }
        Ok(derived)
    }
}

impl GameState {
    /// Rebuild the state a sequence of alternating moves starting with Red
    /// would have left on `board`.
    pub fn from_board(board: Board) -> Result<Self, StateError> {
        let red = board.count_of(Player::Red);
        let yellow = board.count_of(Player::Yellow);
        let last = match red.checked_sub(yellow) {
            Some(0) if red == 0 => None,
            Some(0) => Some(Player::Yellow),
            Some(1) => Some(Player::Red),
            _ => return Err(StateError::PieceCounts { red, yellow }),
        };

        let winner = match (
            board.has_four_in_row(Player::Red),
            board.has_four_in_row(Player::Yellow),
        ) {
            (true, true) => return Err(StateError::BothWin),
            (true, false) => Some(Player::Red),
            (false, true) => Some(Player::Yellow),
            (false, false) => None,
        };

        let (turn, outcome) = match (winner, last) {
            (Some(winner), Some(last)) if winner != last => {
                return Err(StateError::PlayedAfterWin { winner, last });
            }
            (Some(winner), _) => (winner, Outcome::Win(winner)),
            (None, Some(last)) if board.is_full() => (last, Outcome::Draw),
            (None, Some(last)) => (last.other(), Outcome::InProgress),
            (None, None) => (Player::FIRST, Outcome::InProgress),
        };

        Ok(GameState {
            board,
            turn,
            outcome,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
