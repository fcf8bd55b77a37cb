//! Computer opponent: positional heuristic, minimax search with alpha-beta
//! pruning, and the tie-break source the search draws on.

mod difficulty;
pub mod heuristic;
mod minimax;
mod tie_break;

pub use difficulty::Difficulty;
pub use heuristic::{evaluate_window, score_position, Heuristic, WindowHeuristic};
pub use minimax::{Minimax, SearchResult, SearchStats};
pub use tie_break::{FirstColumn, RandomTieBreak, TieBreak};
