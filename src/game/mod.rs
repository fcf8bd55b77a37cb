//! Core Connect Four game logic: board representation, player types, and the
//! turn state machine with immutable transitions.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Direction, COLS, MAX_SIDE, MIN_SIDE, ROWS, WINDOW};
pub use player::Player;
pub use state::{GameState, Outcome};
