//! Mover-relative board encoding

use super::{Board, Player};
use crate::types::CanonicalState;

/// Re-express `board` so `mover`'s marks read `+1` and the opponent's `-1`
///
/// Cell `i` of the result is `mover.sign() * board[i]`, which lets a single
/// Q-table serve both sides.
pub fn canonicalize(board: &Board, mover: Player) -> CanonicalState {
    canonicalize_cells(board.cells(), mover)
}

/// Same as [`canonicalize`] for a raw cell slice
pub fn canonicalize_cells(cells: &[i8], mover: Player) -> CanonicalState {
    let sign = mover.sign();
    CanonicalState::from_cells(cells.iter().map(|&c| c * sign).collect())
}
