use crate::game::{Board, Cell, Direction, Player, WINDOW};

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

const FOUR: i32 = 100;
const OPEN_THREE: i32 = 5;
const OPEN_TWO: i32 = 2;
const OPPONENT_OPEN_THREE: i32 = -4;
const CENTER_PIECE: i32 = 3;

/// Score a single window for `player`.
pub fn evaluate_window(window: &[Cell; WINDOW], player: Player) -> i32 {
    let own_cell = player.to_cell();
    let opp_cell = player.other().to_cell();
    let count = |target: Cell| window.iter().filter(|&&c| c == target).count();
    let (own, opp, empty) = (count(own_cell), count(opp_cell), count(Cell::Empty));

    let mut score = 0;
    if own == 4 {
        score += FOUR;
    } else if own == 3 && empty == 1 {
        score += OPEN_THREE;
    } else if own == 2 && empty == 2 {
        score += OPEN_TWO;
    }

    if opp == 3 && empty == 1 {
        score += OPPONENT_OPEN_THREE;
    }

    score
}

/// Center-column bonus plus [`evaluate_window`] over every window in all
/// four orientations.
pub fn score_position(board: &Board, player: Player) -> i32 {
    let center = board.cols() / 2;
    let center_count = (0..board.rows())
        .filter(|&row| board.get(row, center) == player.to_cell())
        .count() as i32;

    let windows: i32 = Direction::ALL
        .iter()
        .flat_map(|&direction| board.windows(direction))
        .map(|window| evaluate_window(&window, player))
        .sum();

    center_count * CENTER_PIECE + windows
}

/// Default heuristic: weighted local windows with a center-column bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowHeuristic;

impl Heuristic for WindowHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        score_position(board, player)
    }
}
