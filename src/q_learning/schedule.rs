//! Linear exploration schedule

use serde::{Deserialize, Serialize};

/// ε interpolated linearly from `start` to `end` over a fixed episode budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub end: f64,
}

impl EpsilonSchedule {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// ε(t) = start + min(1, t/T)·(end − start)
    ///
    /// A zero budget is treated as already exhausted.
    pub fn value(&self, episode: usize, total_episodes: usize) -> f64 {
        let progress = if total_episodes == 0 {
            1.0
        } else {
            (episode as f64 / total_episodes as f64).min(1.0)
        };
        self.start + progress * (self.end - self.start)
    }
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self::new(0.3, 0.0)
    }
}
