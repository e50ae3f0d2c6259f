//! Generalized N x N, K-in-a-row tic-tac-toe

pub mod board;
pub mod canonical;
pub mod game;
pub mod lines;
pub mod render;

pub use board::{Board, EMPTY, LineCount, Player};
pub use canonical::{canonicalize, canonicalize_cells};
pub use game::{GameEngine, GameOutcome, StepResult, WIN_REWARD};
pub use lines::{WinningLine, WinningLines};
pub use render::{format_board, render_history};
