//! Non-learning opponents used to inject pressure during training

use crate::{
    Error, Result,
    tictactoe::{Board, Player, WinningLines},
};

/// Largest count of `player`'s marks on any single winning line
pub fn max_line_count(board: &Board, player: Player, lines: &WinningLines) -> usize {
    lines.max_marks(board, player)
}

/// Greedy line-extending move for `player`
///
/// Tries every action and keeps the one whose resulting board has the
/// longest own-mark count on a single line. Ties go to the earliest action
/// in `valid_actions`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `valid_actions` is empty.
pub fn choose_aggressive(
    board: &Board,
    valid_actions: &[usize],
    player: Player,
    lines: &WinningLines,
) -> Result<usize> {
    let mut best: Option<(usize, usize)> = None;
    for &action in valid_actions {
        if !board.is_vacant(action) {
            return Err(Error::InvalidInput {
                message: format!("action {action} is not an empty cell"),
            });
        }
        let score = max_line_count(&board.with_mark(action, player), player, lines);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((action, score));
        }
    }
    best.map(|(action, _)| action)
        .ok_or_else(Error::no_valid_actions)
}
