//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{EpsilonSchedule, ShapingRewards},
};

/// Configuration for creating a shaping Q-learning agent.
///
/// Builder-style API; values are checked by [`AgentConfig::validate`] when
/// the agent is constructed.
///
/// # Examples
///
/// ```
/// use kinarow::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.5)
///     .with_discount(0.9)
///     .with_epsilon(0.3, 0.0)
///     .with_total_episodes(10_000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount: f64,
    /// Exploration schedule endpoints
    pub epsilon: EpsilonSchedule,
    /// Episode budget T for the exploration schedule
    pub total_episodes: usize,
    /// Shaping magnitudes
    pub shaping: ShapingRewards,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self {
            learning_rate: 0.5,
            discount: 0.9,
            epsilon: EpsilonSchedule::default(),
            total_episodes: 100_000,
            shaping: ShapingRewards::default(),
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Set the exploration schedule endpoints.
    pub fn with_epsilon(mut self, start: f64, end: f64) -> Self {
        self.epsilon = EpsilonSchedule::new(start, end);
        self
    }

    pub fn with_total_episodes(mut self, total_episodes: usize) -> Self {
        self.total_episodes = total_episodes;
        self
    }

    pub fn with_shaping(mut self, shaping: ShapingRewards) -> Self {
        self.shaping = shaping;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when α is outside (0, 1],
    /// γ or either ε endpoint outside [0, 1], or the episode budget is zero.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning rate {} must be in (0, 1]",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount {} must be in [0, 1]",
                self.discount
            )));
        }
        for (name, value) in [("start", self.epsilon.start), ("end", self.epsilon.end)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "epsilon {name} {value} must be in [0, 1]"
                )));
            }
        }
        if self.total_episodes == 0 {
            return Err(Error::config("total episodes must be positive"));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.discount, 0.9);
        assert_eq!(config.epsilon, EpsilonSchedule::new(0.3, 0.0));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(AgentConfig::new().with_learning_rate(0.0).validate().is_err());
        assert!(AgentConfig::new().with_discount(1.5).validate().is_err());
        assert!(AgentConfig::new().with_epsilon(0.3, -0.1).validate().is_err());
        assert!(AgentConfig::new().with_total_episodes(0).validate().is_err());
    }
}
