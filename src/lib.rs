//! # Connect Four AI
//!
//! Connect Four rules engine with a computer opponent driven by depth-limited
//! minimax search and alpha-beta pruning. Presentation layers drive a game
//! through the [`session::Session`] value.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, turn state machine
//! - [`ai`] — Positional heuristic, minimax search, tie-break policies, difficulty
//! - [`session`] — Game controller and the collaborator-facing API
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
