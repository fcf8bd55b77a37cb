use tracing::debug;

use crate::game::{Board, Player};

use super::heuristic::{Heuristic, WindowHeuristic};
use super::tie_break::TieBreak;

/// Node and cutoff counts for one top-level search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// `None` only when the root itself is terminal or `depth` is 0.
    pub column: Option<usize>,
    /// From the AI's side: `+inf` is a forced win, `-inf` a forced loss.
    pub score: f64,
    pub stats: SearchStats,
}

/// Depth-limited minimax with alpha-beta pruning. The AI piece maximizes,
/// its opponent minimizes.
///
/// Each node starts from a column picked by the [`TieBreak`] and only moves
/// off it on a strictly better score, so when every column ties at the
/// initial bound the tie-break choice is what gets played.
pub struct Minimax {
    ai: Player,
    heuristic: Box<dyn Heuristic>,
    pruning: bool,
}

impl Minimax {
    pub fn new(ai: Player) -> Self {
        Self::with_heuristic(ai, Box::new(WindowHeuristic))
    }

    pub fn with_heuristic(ai: Player, heuristic: Box<dyn Heuristic>) -> Self {
        Minimax {
            ai,
            heuristic,
            pruning: true,
        }
    }

    /// Full minimax without cutoffs. Same scores, many more nodes.
    pub fn exhaustive(ai: Player) -> Self {
        Minimax {
            pruning: false,
            ..Self::new(ai)
        }
    }

    pub fn ai(&self) -> Player {
        self.ai
    }

    /// Search `depth` plies from `board` with the AI to move.
    pub fn best_move<T: TieBreak + ?Sized>(
        &self,
        board: &Board,
        depth: usize,
        tie_break: &mut T,
    ) -> SearchResult {
        let mut search = Search {
            engine: self,
            tie_break,
            stats: SearchStats::default(),
        };
        let (column, score) =
            search.minimax(board, depth, f64::NEG_INFINITY, f64::INFINITY, true);
        let stats = search.stats;

        debug!(
            ai = %self.ai,
            depth,
            column = ?column,
            score,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            pruning = self.pruning,
            "search finished"
        );

        SearchResult {
            column,
            score,
            stats,
        }
    }

    /// One minimax node: returns the chosen column (if any) and its score.
    pub fn minimax<T: TieBreak + ?Sized>(
        &self,
        board: &Board,
        depth: usize,
        alpha: f64,
        beta: f64,
        maximizing: bool,
        tie_break: &mut T,
    ) -> (Option<usize>, f64) {
        Search {
            engine: self,
            tie_break,
            stats: SearchStats::default(),
        }
        .minimax(board, depth, alpha, beta, maximizing)
    }
}

struct Search<'a, T: TieBreak + ?Sized> {
    engine: &'a Minimax,
    tie_break: &'a mut T,
    stats: SearchStats,
}

impl<T: TieBreak + ?Sized> Search<'_, T> {
    fn minimax(
        &mut self,
        board: &Board,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> (Option<usize>, f64) {
        self.stats.nodes += 1;
        let ai = self.engine.ai;

        if depth == 0 || board.is_terminal() {
            let score = if board.has_four_in_row(ai) {
                f64::INFINITY
            } else if board.has_four_in_row(ai.other()) {
                f64::NEG_INFINITY
            } else if board.is_full() {
                0.0
            } else {
                f64::from(self.engine.heuristic.evaluate(board, ai))
            };
            return (None, score);
        }

        let columns = board.valid_columns();
        let mut best_column = self.tie_break.choose(&columns);
        let (piece, mut value) = if maximizing {
            (ai, f64::NEG_INFINITY)
        } else {
            (ai.other(), f64::INFINITY)
        };

        for &col in &columns {
            let Some(row) = board.next_open_row(col) else {
                continue;
            };
            let mut child = board.clone();
            child.drop_piece(row, col, piece);
            let (_, score) = self.minimax(&child, depth - 1, alpha, beta, !maximizing);

            if maximizing {
                if score > value {
                    value = score;
                    best_column = col;
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_column = col;
                }
                beta = beta.min(value);
            }

            if self.engine.pruning && alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        (Some(best_column), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::heuristic::score_position;
    use crate::ai::{FirstColumn, RandomTieBreak};
    use crate::game::{GameState, Outcome};

    /// Always returns a fixed column when it is a candidate.
    struct Prefer(usize);

    impl TieBreak for Prefer {
        fn choose(&mut self, columns: &[usize]) -> usize {
            if columns.contains(&self.0) {
                self.0
            } else {
                columns[0]
            }
        }
    }

    fn board_from(moves: &[usize]) -> Board {
        let mut state = GameState::initial();
        for &col in moves {
            state = state.apply_move(state.turn(), col).unwrap();
        }
        state.board().clone()
    }

    #[test]
    fn depth_zero_returns_heuristic() {
        let board = board_from(&[3, 2, 3]);
        let engine = Minimax::new(Player::Red);
        let (column, score) = engine.minimax(
            &board,
            0,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            &mut FirstColumn,
        );
        assert_eq!(column, None);
        assert_eq!(score, f64::from(score_position(&board, Player::Red)));
    }

    #[test]
    fn terminal_scores() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop(0, Player::Yellow).unwrap();
        }
        let yellow = Minimax::new(Player::Yellow).best_move(&board, 4, &mut FirstColumn);
        assert_eq!(yellow.column, None);
        assert_eq!(yellow.score, f64::INFINITY);

        let red = Minimax::new(Player::Red).best_move(&board, 4, &mut FirstColumn);
        assert_eq!(red.score, f64::NEG_INFINITY);
    }

    #[test]
    fn takes_winning_move() {
        // Red has [0,1,2] on the bottom row; col 3 completes it.
        let board = board_from(&[0, 0, 1, 1, 2, 2]);
        let engine = Minimax::new(Player::Red);
        for seed in 0..5 {
            let result = engine.best_move(&board, 2, &mut RandomTieBreak::seeded(seed));
            assert_eq!(result.column, Some(3), "Should take winning move at col 3");
            assert_eq!(result.score, f64::INFINITY);
        }
    }

    #[test]
    fn blocks_opponent_win() {
        // Yellow has [0,1,2] at bottom row. Red must play col 3 to block.
        let board = board_from(&[6, 0, 6, 1, 5, 2]);
        let engine = Minimax::new(Player::Red);
        for seed in 0..5 {
            let result = engine.best_move(&board, 2, &mut RandomTieBreak::seeded(seed));
            assert_eq!(
                result.column,
                Some(3),
                "Should block opponent's winning move at col 3"
            );
            assert!(result.score.is_finite());
        }
    }

    #[test]
    fn lost_position_keeps_tie_break_column() {
        // Yellow threatens (5,3) and (2,6); Red can only block one.
        let mut board = Board::new();
        for (row, col) in [(5, 0), (5, 1), (5, 2), (5, 6), (4, 6), (3, 6)] {
            board.drop_piece(row, col, Player::Yellow);
        }
        for (row, col) in [(4, 0), (4, 1), (5, 5)] {
            board.drop_piece(row, col, Player::Red);
        }

        let engine = Minimax::new(Player::Red);
        for preferred in [0, 4, 6] {
            let result = engine.best_move(&board, 2, &mut Prefer(preferred));
            assert_eq!(result.score, f64::NEG_INFINITY);
            assert_eq!(result.column, Some(preferred));
        }
        assert_eq!(engine.best_move(&board, 2, &mut FirstColumn).column, Some(0));
    }

    #[test]
    fn pruning_matches_exhaustive_score() {
        let positions: [&[usize]; 4] = [&[], &[3, 3, 2], &[3, 4, 2, 1, 3, 3], &[0, 6, 1, 5, 2]];
        for moves in positions {
            let board = board_from(moves);
            let ai = if moves.len() % 2 == 0 {
                Player::Red
            } else {
                Player::Yellow
            };
            for depth in 1..=4 {
                let pruned = Minimax::new(ai).best_move(&board, depth, &mut FirstColumn);
                let full = Minimax::exhaustive(ai).best_move(&board, depth, &mut FirstColumn);
                assert_eq!(
                    pruned.score, full.score,
                    "moves {moves:?} depth {depth}: pruned {} vs full {}",
                    pruned.score, full.score
                );
                assert!(pruned.stats.nodes <= full.stats.nodes);
                assert_eq!(full.stats.cutoffs, 0);
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let board = Board::new();
        let pruned = Minimax::new(Player::Red).best_move(&board, 4, &mut FirstColumn);
        let full = Minimax::exhaustive(Player::Red).best_move(&board, 4, &mut FirstColumn);
        // 1 + 7 + 49 + 343 + 2401 nodes without cutoffs
        assert_eq!(full.stats.nodes, 2801);
        assert!(pruned.stats.nodes < full.stats.nodes);
        assert!(pruned.stats.cutoffs > 0);
    }

    #[test]
    fn search_leaves_board_untouched() {
        let board = board_from(&[3, 3, 4]);
        let before = board.clone();
        let _ = Minimax::new(Player::Yellow).best_move(&board, 4, &mut FirstColumn);
        assert_eq!(board, before);
    }

    #[test]
    fn full_game_vs_self_completes() {
        let red = Minimax::new(Player::Red);
        let yellow = Minimax::new(Player::Yellow);
        let mut tie_break = RandomTieBreak::seeded(3);
        let mut state = GameState::initial();

        while !state.is_over() {
            let engine = if state.turn() == Player::Red { &red } else { &yellow };
            let column = engine
                .best_move(state.board(), 2, &mut tie_break)
                .column
                .expect("non-terminal position has a move");
            state = state.apply_move(state.turn(), column).unwrap();
        }

        assert!(state.is_over());
        assert_ne!(state.outcome(), Outcome::InProgress);
    }

    #[test]
    fn beats_random_opponent() {
        let games = 20;
        let mut wins = 0;
        let engine = Minimax::new(Player::Yellow);
        let mut random = RandomTieBreak::seeded(11);
        let mut tie_break = RandomTieBreak::seeded(12);

        for _ in 0..games {
            let mut state = GameState::initial();
            while !state.is_over() {
                let column = if state.turn() == Player::Red {
                    random.choose(&state.legal_actions())
                } else {
                    engine
                        .best_move(state.board(), 4, &mut tie_break)
                        .column
                        .expect("non-terminal position has a move")
                };
                state = state.apply_move(state.turn(), column).unwrap();
            }
            if state.outcome() == Outcome::Win(Player::Yellow) {
                wins += 1;
            }
        }

        assert!(
            wins * 10 >= games * 8,
            "Minimax should beat random at least 80% of the time, got {wins}/{games}"
        );
    }
}
