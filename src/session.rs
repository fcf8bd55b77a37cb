//! Game controller: the session value the presentation layer threads through
//! every call. All rule enforcement for the outside world happens here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{Difficulty, Minimax, TieBreak};
use crate::error::{BoardError, MoveError, ParseOptionError};
use crate::game::{Board, GameState, Outcome, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Human plays Red, the computer plays Yellow.
    #[default]
    OnePlayer,
    TwoPlayer,
}

impl GameMode {
    pub fn name(self) -> &'static str {
        match self {
            GameMode::OnePlayer => "one-player",
            GameMode::TwoPlayer => "two-player",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-player" | "one" | "1" => Ok(GameMode::OnePlayer),
            "two-player" | "two" | "2" => Ok(GameMode::TwoPlayer),
            _ => Err(ParseOptionError {
                kind: "game mode",
                value: s.to_string(),
                expected: "one-player or two-player",
            }),
        }
    }
}

/// Settings that survive a reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Display name of Red, who moves first.
    pub player_one: String,
    /// Display name of Yellow; the computer in one-player mode.
    pub player_two: String,
}

impl SessionConfig {
    pub fn one_player(name: impl Into<String>, difficulty: Difficulty) -> Self {
        SessionConfig {
            mode: GameMode::OnePlayer,
            difficulty,
            player_one: name.into(),
            player_two: "AI".to_string(),
        }
    }

    pub fn two_player(player_one: impl Into<String>, player_two: impl Into<String>) -> Self {
        SessionConfig {
            mode: GameMode::TwoPlayer,
            difficulty: Difficulty::default(),
            player_one: player_one.into(),
            player_two: player_two.into(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::one_player("Player 1", Difficulty::default())
    }
}

/// One game plus its configuration. Transitions never mutate in place:
/// each returns a new session and leaves the old one as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    state: GameState,
    config: SessionConfig,
}

impl Session {
    /// Fresh session with the default one-player configuration.
    pub fn new_game(rows: usize, cols: usize) -> Result<Self, BoardError> {
        Self::with_config(rows, cols, SessionConfig::default())
    }

    pub fn with_config(rows: usize, cols: usize, config: SessionConfig) -> Result<Self, BoardError> {
        Ok(Session {
            state: GameState::with_dimensions(rows, cols)?,
            config,
        })
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn turn(&self) -> Player {
        self.state.turn()
    }

    pub fn current_outcome(&self) -> Outcome {
        self.state.outcome()
    }

    /// Columns a piece can be dropped into right now; empty once the game
    /// is over.
    pub fn valid_columns(&self) -> Vec<usize> {
        self.state.legal_actions()
    }

    /// The identity the computer plays, if any.
    pub fn ai_player(&self) -> Option<Player> {
        match self.config.mode {
            GameMode::OnePlayer => Some(Player::FIRST.other()),
            GameMode::TwoPlayer => None,
        }
    }

    pub fn player_name(&self, player: Player) -> &str {
        match player {
            Player::Red => &self.config.player_one,
            Player::Yellow => &self.config.player_two,
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        match self.current_outcome() {
            Outcome::Win(player) => Some(self.player_name(player)),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }

    /// Drop `player`'s piece into `column`. Fails without changing anything
    /// if the game is over, it is not `player`'s turn, or the column cannot
    /// take a piece.
    pub fn apply_move(&self, player: Player, column: usize) -> Result<Session, MoveError> {
        let state = self.state.apply_move(player, column)?;
        debug!(%player, column, "move applied");

        match state.outcome() {
            Outcome::Win(winner) => {
                info!(winner = %winner, name = self.player_name(winner), "game won")
            }
            Outcome::Draw => info!("game drawn"),
            Outcome::InProgress => {}
        }

        Ok(Session {
            state,
            config: self.config.clone(),
        })
    }

    /// A human move. In one-player mode the human is always Red; in
    /// two-player mode the move is made for whoever holds the turn.
    pub fn apply_human_move(&self, column: usize) -> Result<Session, MoveError> {
        let player = match self.ai_player() {
            Some(ai) => ai.other(),
            None => self.turn(),
        };
        self.apply_move(player, column)
    }

    /// Search for the computer's move at the configured difficulty.
    pub fn ai_select_move<T: TieBreak + ?Sized>(&self, tie_break: &mut T) -> Result<usize, MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver);
        }
        let ai = self.ai_player().ok_or(MoveError::NoAiOpponent)?;
        if self.turn() != ai {
            return Err(MoveError::NotYourTurn {
                expected: self.turn(),
                got: ai,
            });
        }

        let depth = self.config.difficulty.depth();
        let result = Minimax::new(ai).best_move(self.board(), depth, tie_break);
        let column = match result.column {
            Some(column) => column,
            None => tie_break.choose(&self.valid_columns()),
        };
        debug!(
            difficulty = %self.config.difficulty,
            column,
            score = result.score,
            "AI chose column"
        );
        Ok(column)
    }

    /// [`Session::ai_select_move`] followed by [`Session::apply_move`].
    pub fn ai_take_turn<T: TieBreak + ?Sized>(&self, tie_break: &mut T) -> Result<Session, MoveError> {
        let column = self.ai_select_move(tie_break)?;
        let ai = self.ai_player().ok_or(MoveError::NoAiOpponent)?;
        self.apply_move(ai, column)
    }

    /// Start over on an empty board of the same size. Without
    /// `preserve_config` the default configuration is restored.
    pub fn reset(&self, preserve_config: bool) -> Session {
        let config = if preserve_config {
            self.config.clone()
        } else {
            SessionConfig::default()
        };
        info!(preserve_config, mode = %config.mode, "session reset");
        Session {
            state: self.state.restarted(),
            config,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session {
            state: GameState::initial(),
            config: SessionConfig::default(),
        }
    }
}
