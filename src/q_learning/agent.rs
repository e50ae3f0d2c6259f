//! Two-step Q-learning agent with reward shaping
//!
//! The agent plays both sides from a single table keyed by canonical
//! states. Each move is buffered as a [`Transition`]; once a second
//! transition arrives the oldest one is resolved:
//!
//! - consecutive moves by the same player get a 2-step target
//!   `r0 + γ·r1 + γ²·max Q(s2, ·)` (bootstrap omitted if the second move
//!   ended the game),
//! - otherwise, or if the oldest move was already blamed for a loss, a
//!   1-step target `r0`.
//!
//! When a move wins, the latest unresolved move of the other player is
//! rewritten to a terminal −1.0 before the new move is stored. At the end
//! of an episode everything left is flushed with 1-step targets.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    app::AgentConfig,
    q_learning::{
        EpsilonSchedule, PendingBuffer, QTable, RewardShaper, Transition,
        shaping::ShapingRewards,
    },
    tictactoe::{Board, Player, WIN_REWARD, WinningLines},
    types::CanonicalState,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Everything the agent learns from one move
#[derive(Debug, Clone)]
pub struct Experience<'a> {
    /// Player who made the move
    pub mover: Player,
    /// Canonical state the mover saw
    pub state: CanonicalState,
    /// Cell the mover marked
    pub action: usize,
    /// Raw environment reward for the mover
    pub reward: f64,
    /// Canonical state for the next mover, `None` once the game is over
    pub next_state: Option<CanonicalState>,
    /// Legal actions in `next_state`
    pub next_actions: Vec<usize>,
    /// Whether the move ended the game
    pub done: bool,
    /// Raw board before the move
    pub board_before: &'a Board,
    /// Raw board after the move
    pub board_after: &'a Board,
}

/// Tabular agent with 2-step lookback, lose penalty and shaping
#[derive(Debug, Clone)]
pub struct ShapingAgent<R = StdRng> {
    q_table: QTable,
    pending: PendingBuffer,
    shaper: RewardShaper,
    learning_rate: f64,
    discount: f64,
    epsilon: EpsilonSchedule,
    episode: usize,
    total_episodes: usize,
    rng: R,
}

impl ShapingAgent<StdRng> {
    /// Create an agent seeded from `config.seed`, or from entropy
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: &AgentConfig, lines: Arc<WinningLines>) -> Result<Self> {
        Self::with_rng(config, lines, build_rng(config.seed))
    }
}

impl<R: Rng> ShapingAgent<R> {
    /// Create an agent drawing exploration and tie-breaks from `rng`
    pub fn with_rng(config: &AgentConfig, lines: Arc<WinningLines>, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            pending: PendingBuffer::new(),
            shaper: RewardShaper::new(lines, config.shaping),
            learning_rate: config.learning_rate,
            discount: config.discount,
            epsilon: config.epsilon,
            episode: 1,
            total_episodes: config.total_episodes,
            rng,
        })
    }

    /// Set the 1-based episode counter driving the ε schedule
    pub fn set_episode(&mut self, episode: usize) {
        self.episode = episode;
    }

    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Set the episode budget T of the ε schedule
    pub fn set_total_episodes(&mut self, total_episodes: usize) {
        self.total_episodes = total_episodes;
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon.value(self.episode, self.total_episodes)
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    /// Transitions still waiting for a target
    pub fn pending(&self) -> &PendingBuffer {
        &self.pending
    }

    pub fn shaping_rewards(&self) -> &ShapingRewards {
        self.shaper.rewards()
    }

    /// ε-greedy action selection
    ///
    /// Explores uniformly with probability ε; otherwise picks uniformly among
    /// the actions sharing the highest value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `valid_actions` is empty.
    pub fn choose_action(
        &mut self,
        state: &CanonicalState,
        valid_actions: &[usize],
    ) -> Result<usize> {
        if valid_actions.is_empty() {
            return Err(Error::no_valid_actions());
        }
        if self.rng.random::<f64>() < self.epsilon() {
            // Explore: random action
            return valid_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or_else(Error::no_valid_actions);
        }
        self.choose_greedy(state, valid_actions)
    }

    /// Greedy selection with uniform tie-breaking, ignoring ε
    pub fn choose_greedy(
        &mut self,
        state: &CanonicalState,
        valid_actions: &[usize],
    ) -> Result<usize> {
        let best = self.q_table.best_actions(state, valid_actions);
        best.choose(&mut self.rng)
            .copied()
            .ok_or_else(Error::no_valid_actions)
    }

    /// Threat-blocking shaping for a move
    pub fn shape_block(&self, before: &Board, after: &Board, mover: Player) -> f64 {
        self.shaper.shape_block(before, after, mover)
    }

    /// Line-building shaping for a move
    pub fn shape_build(&self, before: &Board, after: &Board, mover: Player) -> f64 {
        self.shaper.shape_build(before, after, mover)
    }

    /// Ingest one move and resolve whatever it makes resolvable
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the action is not a cell of the
    /// state or the boards do not match the state's size. Nothing is
    /// recorded in that case.
    pub fn update(&mut self, experience: Experience<'_>) -> Result<()> {
        let cells = experience.state.len();
        if experience.action >= cells {
            return Err(Error::InvalidInput {
                message: format!(
                    "action {} outside a board of {cells} cells",
                    experience.action
                ),
            });
        }
        if experience.board_before.len() != cells || experience.board_after.len() != cells {
            return Err(Error::InvalidInput {
                message: format!("boards do not match a state of {cells} cells"),
            });
        }

        if experience.reward == WIN_REWARD {
            self.pending.apply_lose_penalty(experience.mover);
        }

        let shaped = experience.reward
            + self.shaper.shape(
                experience.board_before,
                experience.board_after,
                experience.mover,
            );

        self.pending.push(Transition {
            mover: experience.mover,
            state: experience.state,
            action: experience.action,
            reward: shaped,
            next_state: experience.next_state,
            next_actions: experience.next_actions,
            terminal: experience.done,
        });

        self.resolve_oldest();

        if experience.done {
            self.flush();
        }
        Ok(())
    }

    /// Resolve the front transition once a successor is buffered
    fn resolve_oldest(&mut self) {
        if self.pending.len() < 2 {
            return;
        }
        let Some(first) = self.pending.pop_front() else {
            return;
        };

        let target = match self.pending.front() {
            Some(second) if second.mover == first.mover && !first.terminal => {
                let mut target = first.reward + self.discount * second.reward;
                if !second.terminal {
                    let max_next = match &second.next_state {
                        Some(next) => self.q_table.max_over(next, &second.next_actions),
                        None => 0.0,
                    };
                    target += self.discount.powi(2) * max_next;
                }
                target
            }
            _ => first.reward,
        };

        self.q_table
            .update_toward(&first.state, first.action, target, self.learning_rate);
    }

    /// Drain the buffer with 1-step targets at episode end
    fn flush(&mut self) {
        while let Some(transition) = self.pending.pop_front() {
            self.q_table.update_toward(
                &transition.state,
                transition.action,
                transition.reward,
                self.learning_rate,
            );
        }
    }

    /// Drop unresolved transitions without learning from them
    ///
    /// The training pipeline calls this when an episode is abandoned part-way.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::canonicalize;

    fn agent(config: AgentConfig) -> ShapingAgent {
        let lines = Arc::new(WinningLines::generate(3, 3).unwrap());
        ShapingAgent::new(&config.with_seed(7), lines).unwrap()
    }

    #[test]
    fn test_choose_action_rejects_empty_actions() {
        let mut agent = agent(AgentConfig::new());
        let state = canonicalize(&Board::new(3), Player::X);
        assert!(matches!(
            agent.choose_action(&state, &[]),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_greedy_picks_unique_maximum() {
        let mut agent = agent(AgentConfig::new().with_epsilon(0.0, 0.0));
        let state = canonicalize(&Board::new(3), Player::X);
        agent.q_table_mut().set(&state, 6, 0.9);
        agent.q_table_mut().set(&state, 2, 0.4);
        for _ in 0..50 {
            assert_eq!(agent.choose_action(&state, &[0, 2, 4, 6, 8]).unwrap(), 6);
        }
    }

    #[test]
    fn test_greedy_ties_are_not_positional() {
        let mut agent = agent(AgentConfig::new().with_epsilon(0.0, 0.0));
        let state = canonicalize(&Board::new(3), Player::X);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(agent.choose_action(&state, &[1, 3, 5]).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_exploration_stays_within_valid_actions() {
        let mut agent = agent(AgentConfig::new().with_epsilon(1.0, 1.0));
        let state = canonicalize(&Board::new(3), Player::X);
        for _ in 0..100 {
            let action = agent.choose_action(&state, &[2, 7]).unwrap();
            assert!(action == 2 || action == 7);
        }
    }

    #[test]
    fn test_epsilon_follows_episode_counter() {
        let mut agent = agent(
            AgentConfig::new()
                .with_epsilon(0.3, 0.0)
                .with_total_episodes(10),
        );
        agent.set_episode(5);
        assert!((agent.epsilon() - 0.15).abs() < 1e-12);
        agent.set_episode(20);
        assert!(agent.epsilon().abs() < 1e-12);
    }

    #[test]
    fn test_update_rejects_out_of_range_action() {
        let mut agent = agent(AgentConfig::new());
        let board = Board::new(3);
        let result = agent.update(Experience {
            mover: Player::X,
            state: canonicalize(&board, Player::X),
            action: 9,
            reward: 0.0,
            next_state: None,
            next_actions: Vec::new(),
            done: false,
            board_before: &board,
            board_after: &board,
        });
        assert!(result.is_err());
        assert!(agent.pending().is_empty());
    }
}
