//! Game engine enforcing K-in-a-row rules on an N x N board

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Board, Player, WinningLines};
use crate::{Error, Result};

/// Reward paid to the mover for completing a line
pub const WIN_REWARD: f64 = 1.0;

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }
}

/// Result of applying one move
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Board after the move
    pub board: Board,
    /// Environment reward for the mover (1.0 on a win, otherwise 0.0)
    pub reward: f64,
    /// Whether the game has ended
    pub done: bool,
}

/// Rules engine for one game at a time
///
/// Owns the board, whose turn it is and the snapshot history used for
/// replays. Knows nothing about learning.
#[derive(Debug, Clone)]
pub struct GameEngine {
    lines: Arc<WinningLines>,
    board: Board,
    to_move: Player,
    outcome: Option<GameOutcome>,
    history: Vec<Board>,
}

impl GameEngine {
    /// Create an engine for an N x N board requiring K in a row
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `size >= k >= 1`.
    pub fn new(size: usize, k: usize) -> Result<Self> {
        let lines = Arc::new(WinningLines::generate(size, k)?);
        Ok(Self {
            lines,
            board: Board::new(size),
            to_move: Player::X,
            outcome: None,
            history: Vec::new(),
        })
    }

    /// Start a new game: empty board, X to move, no history
    pub fn reset(&mut self) -> Board {
        self.board = Board::new(self.lines.size());
        self.to_move = Player::X;
        self.outcome = None;
        self.history.clear();
        self.board.clone()
    }

    /// Empty cells of `board`, ascending
    pub fn available_actions(board: &Board) -> Vec<usize> {
        board.empty_cells()
    }

    /// Empty cells of the engine's current board
    pub fn legal_actions(&self) -> Vec<usize> {
        self.board.empty_cells()
    }

    /// Place the current mover's mark at `action`
    ///
    /// Outcomes are checked in order: mover completes a line, board full,
    /// then neither side has a line free of the other's marks. Only a
    /// non-terminal move passes the turn.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] once the game has ended, [`Error::InvalidPosition`]
    /// for an index off the board and [`Error::InvalidMove`] for an occupied
    /// cell. State is left untouched in every case.
    pub fn step(&mut self, action: usize) -> Result<StepResult> {
        if self.outcome.is_some() {
            return Err(Error::GameOver);
        }

        let mover = self.to_move;
        self.board.place(action, mover)?;

        let reward = if self.lines.has_won(&self.board, mover) {
            self.outcome = Some(GameOutcome::Win(mover));
            WIN_REWARD
        } else if self.board.is_full() || self.is_dead_position() {
            self.outcome = Some(GameOutcome::Draw);
            0.0
        } else {
            self.to_move = mover.opponent();
            0.0
        };

        self.history.push(self.board.clone());
        Ok(StepResult {
            board: self.board.clone(),
            reward,
            done: self.outcome.is_some(),
        })
    }

    /// Neither player has a line without the other's marks
    fn is_dead_position(&self) -> bool {
        !self.lines.can_still_win(&self.board, Player::X)
            && !self.lines.can_still_win(&self.board, Player::O)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(GameOutcome::winner)
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    /// Board snapshots after each move of the current game
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// Shared handle to the precomputed winning lines
    pub fn winning_lines(&self) -> Arc<WinningLines> {
        Arc::clone(&self.lines)
    }

    pub fn size(&self) -> usize {
        self.lines.size()
    }

    pub fn k(&self) -> usize {
        self.lines.k()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(engine: &mut GameEngine, moves: &[usize]) -> StepResult {
        let mut last = None;
        for &m in moves {
            last = Some(engine.step(m).unwrap());
        }
        last.unwrap()
    }

    #[test]
    fn test_reset_gives_empty_board_and_x_to_move() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        engine.step(4).unwrap();
        let board = engine.reset();
        assert!(board.cells().iter().all(|&c| c == 0));
        assert_eq!(engine.to_move(), Player::X);
        assert!(engine.history().is_empty());
        assert_eq!(engine.outcome(), None);
    }

    #[test]
    fn test_turn_alternates() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        engine.step(0).unwrap();
        assert_eq!(engine.to_move(), Player::O);
        engine.step(1).unwrap();
        assert_eq!(engine.to_move(), Player::X);
        assert_eq!(&engine.board().cells()[..2], &[1, -1]);
    }

    #[test]
    fn test_row_win_reports_reward_and_winner() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        let result = play(&mut engine, &[0, 3, 1, 4, 2]);
        assert_eq!(result.reward, 1.0);
        assert!(result.done);
        assert_eq!(engine.winner(), Some(Player::X));
        // The winner stays the mover
        assert_eq!(engine.to_move(), Player::X);
    }

    #[test]
    fn test_occupied_cell_is_rejected_without_mutation() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        engine.step(4).unwrap();
        let before = engine.board().clone();
        let err = engine.step(4).unwrap_err();
        assert!(matches!(err, Error::InvalidMove { position: 4 }));
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.to_move(), Player::O);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        assert!(matches!(
            engine.step(9),
            Err(Error::InvalidPosition {
                position: 9,
                cells: 9
            })
        ));
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_step_after_game_over_fails() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        play(&mut engine, &[0, 3, 1, 4, 2]);
        assert!(matches!(engine.step(8), Err(Error::GameOver)));
        assert_eq!(engine.history().len(), 5);
    }

    #[test]
    fn test_early_draw_before_board_is_full() {
        // X O X
        // X O O
        // O X .
        let mut engine = GameEngine::new(3, 3).unwrap();
        let result = play(&mut engine, &[0, 1, 2, 4, 7, 6, 3, 5]);
        assert!(result.done);
        assert_eq!(result.reward, 0.0);
        assert_eq!(engine.outcome(), Some(GameOutcome::Draw));
        assert_eq!(engine.legal_actions(), vec![8]);
    }

    #[test]
    fn test_no_early_draw_while_a_line_is_open() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        let result = play(&mut engine, &[0, 1, 2, 4, 7, 6, 3]);
        assert!(!result.done);
        assert_eq!(engine.to_move(), Player::O);
    }

    #[test]
    fn test_history_records_each_move() {
        let mut engine = GameEngine::new(3, 3).unwrap();
        play(&mut engine, &[4, 0]);
        let history = engine.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].cells()[4], 1);
        assert_eq!(history[0].cells()[0], 0);
        assert_eq!(history[1].cells()[0], -1);
    }

    #[test]
    fn test_available_actions_on_arbitrary_board() {
        let board = Board::parse(2, "X..O").unwrap();
        assert_eq!(GameEngine::available_actions(&board), vec![1, 2]);
    }
}
