//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{EpisodeSummary, MoveObservation, Observer},
    tictactoe::{GameOutcome, Player},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (X:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        pb.set_message(self.message());
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64);
            // Redrawing the message on every episode dominates short runs
            if summary.episode == 1 || summary.episode.is_multiple_of(100) {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub early_draws: usize,
    pub aggressive_episodes: usize,
    pub avg_episode_length: f64,
    /// Draw rate over the most recent window of episodes
    pub recent_draw_rate: f64,
}

#[derive(Debug, Default)]
struct MetricsState {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    early_draws: usize,
    aggressive_episodes: usize,
    total_moves: usize,
    total_episodes: usize,
    recent: VecDeque<GameOutcome>,
}

/// Metrics observer - Tracks training metrics
///
/// Counts live behind a shared handle so they can be read after the
/// observer has been handed to a pipeline.
#[derive(Clone)]
pub struct MetricsObserver {
    state: Arc<Mutex<MetricsState>>,
    window: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer with a 1000-episode recent window
    pub fn new() -> Self {
        Self::with_window(1000)
    }

    /// Create a metrics observer with a custom recent-outcome window
    pub fn with_window(window: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState::default())),
            window: window.max(1),
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let recent_draws = state
            .recent
            .iter()
            .filter(|o| **o == GameOutcome::Draw)
            .count();
        MetricsSummary {
            total_episodes: state.total_episodes,
            x_wins: state.x_wins,
            o_wins: state.o_wins,
            draws: state.draws,
            early_draws: state.early_draws,
            aggressive_episodes: state.aggressive_episodes,
            avg_episode_length: if state.total_episodes == 0 {
                0.0
            } else {
                state.total_moves as f64 / state.total_episodes as f64
            },
            recent_draw_rate: if state.recent.is_empty() {
                0.0
            } else {
                recent_draws as f64 / state.recent.len() as f64
            },
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.total_episodes += 1;
        state.total_moves += summary.moves;
        match summary.outcome {
            GameOutcome::Win(Player::X) => state.x_wins += 1,
            GameOutcome::Win(Player::O) => state.o_wins += 1,
            GameOutcome::Draw => state.draws += 1,
        }
        if summary.early_draw {
            state.early_draws += 1;
        }
        if summary.aggressive {
            state.aggressive_episodes += 1;
        }
        if state.recent.len() == self.window {
            state.recent.pop_front();
        }
        state.recent.push_back(summary.outcome);
        Ok(())
    }
}

/// One JSONL line: an episode summary plus its move sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    pub actions: Vec<usize>,
}

/// JSONL observer - Exports one record per episode in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_actions: Vec<usize>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_actions: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, _aggressive: bool) -> Result<()> {
        self.current_actions.clear();
        Ok(())
    }

    fn on_move(&mut self, observation: &MoveObservation<'_>) -> Result<()> {
        self.current_actions.push(observation.action);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            summary: *summary,
            actions: std::mem::take(&mut self.current_actions),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(episode: usize, outcome: GameOutcome, early_draw: bool) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            outcome,
            moves: 5,
            aggressive: episode % 2 == 0,
            early_draw,
            epsilon: 0.1,
        }
    }

    fn bar_message(observer: &ProgressObserver) -> Option<String> {
        observer.progress_bar.as_ref().map(ProgressBar::message)
    }

    #[test]
    fn test_progress_message_shown_before_hundredth_episode() {
        let mut observer = ProgressObserver::new();
        observer.on_training_start(10).unwrap();
        assert_eq!(bar_message(&observer).as_deref(), Some("0 O:0 D:0"));

        observer
            .on_episode_end(&summary(1, GameOutcome::Win(Player::X), false))
            .unwrap();
        assert_eq!(bar_message(&observer).as_deref(), Some("1 O:0 D:0"));

        observer
            .on_episode_end(&summary(2, GameOutcome::Draw, false))
            .unwrap();
        observer.on_training_end().unwrap();
        assert_eq!(bar_message(&observer).as_deref(), Some("1 O:0 D:1"));
    }

    #[test]
    fn test_metrics_observer_counts() {
        let mut observer = MetricsObserver::with_window(2);
        let handle = observer.clone();
        observer
            .on_episode_end(&summary(1, GameOutcome::Win(Player::X), false))
            .unwrap();
        observer
            .on_episode_end(&summary(2, GameOutcome::Draw, true))
            .unwrap();
        observer
            .on_episode_end(&summary(3, GameOutcome::Draw, false))
            .unwrap();

        let metrics = handle.summary();
        assert_eq!(metrics.total_episodes, 3);
        assert_eq!(metrics.x_wins, 1);
        assert_eq!(metrics.draws, 2);
        assert_eq!(metrics.early_draws, 1);
        assert_eq!(metrics.aggressive_episodes, 1);
        assert_eq!(metrics.avg_episode_length, 5.0);
        assert_eq!(metrics.recent_draw_rate, 1.0);
    }
}
