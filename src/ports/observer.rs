//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to specific output formats or metrics.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    tictactoe::{Board, GameOutcome, Player},
};

/// A single applied move
#[derive(Debug, Clone, Copy)]
pub struct MoveObservation<'a> {
    /// Episode number (1-based)
    pub episode: usize,
    /// Move number within the episode (0-based)
    pub step: usize,
    /// Player who moved
    pub mover: Player,
    /// Cell marked
    pub action: usize,
    /// Environment reward for the move
    pub reward: f64,
    /// Whether the move ended the game
    pub done: bool,
    /// Whether the aggressive opponent chose the move
    pub scripted: bool,
    /// Board after the move
    pub board: &'a Board,
}

/// Summary of a finished episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode number (1-based)
    pub episode: usize,
    /// Final outcome
    pub outcome: GameOutcome,
    /// Moves played
    pub moves: usize,
    /// Whether the aggressive opponent played one side
    pub aggressive: bool,
    /// Draw declared before the board filled up
    pub early_draw: bool,
    /// Exploration rate used during the episode
    pub epsilon: f64,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode, aggressive)`
///    - `on_move(...)` - For each move, after the agent has learned from it
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use kinarow::ports::{EpisodeSummary, Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> kinarow::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    fn on_episode_start(&mut self, _episode: usize, _aggressive: bool) -> Result<()> {
        Ok(())
    }

    /// Called for each move of an episode.
    fn on_move(&mut self, _observation: &MoveObservation<'_>) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal state.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
