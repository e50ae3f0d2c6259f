//! Self-play training pipeline

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    opponents::choose_aggressive,
    ports::{EpisodeSummary, MoveObservation, Observer},
    q_learning::{Experience, ShapingAgent},
    tictactoe::{GameEngine, GameOutcome, Player, canonicalize},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub num_episodes: usize,

    /// Probability that an episode uses the aggressive opponent
    pub aggressive_probability: f64,

    /// Side the aggressive opponent plays when active
    pub aggressive_player: Player,

    /// Random seed for the opponent draw
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 100_000,
            aggressive_probability: 0.1,
            aggressive_player: Player::O,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.aggressive_probability) {
            return Err(Error::config(format!(
                "aggressive probability {} must be in [0, 1]",
                self.aggressive_probability
            )));
        }
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played
    pub episodes: usize,

    /// Episodes won by X
    pub x_wins: usize,

    /// Episodes won by O
    pub o_wins: usize,

    /// Drawn episodes, early draws included
    pub draws: usize,

    /// Draws declared before the board was full
    pub early_draws: usize,

    /// Episodes where the aggressive opponent played
    pub aggressive_episodes: usize,

    /// Mean moves per episode
    pub average_moves: f64,

    /// Distinct canonical states in the agent's table
    pub table_size: usize,
}

impl TrainingResult {
    fn rate(&self, count: usize) -> f64 {
        if self.episodes > 0 {
            count as f64 / self.episodes as f64
        } else {
            0.0
        }
    }

    pub fn x_win_rate(&self) -> f64 {
        self.rate(self.x_wins)
    }

    pub fn o_win_rate(&self) -> f64 {
        self.rate(self.o_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Self-play training loop for a single shaping agent
///
/// Both sides are played by the same agent, except that in a configurable
/// share of episodes the aggressive opponent takes over one side. The agent
/// still learns from those scripted moves.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    rng: StdRng,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            observers: Vec::new(),
            rng,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured episode
    ///
    /// The agent's episode budget is set to the configured episode count and
    /// its counter advanced before each episode.
    pub fn run<R: Rng>(
        &mut self,
        engine: &mut GameEngine,
        agent: &mut ShapingAgent<R>,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        agent.set_total_episodes(self.config.num_episodes);

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_episodes)?;
        }

        let mut result = TrainingResult {
            episodes: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            early_draws: 0,
            aggressive_episodes: 0,
            average_moves: 0.0,
            table_size: 0,
        };
        let mut total_moves = 0;

        for episode in 1..=self.config.num_episodes {
            agent.set_episode(episode);
            let summary = match self.play_episode(episode, engine, agent) {
                Ok(summary) => summary,
                Err(err) => {
                    // An abandoned episode must not leak into the next game
                    agent.discard_pending();
                    return Err(err);
                }
            };

            match summary.outcome {
                GameOutcome::Win(Player::X) => result.x_wins += 1,
                GameOutcome::Win(Player::O) => result.o_wins += 1,
                GameOutcome::Draw => result.draws += 1,
            }
            if summary.early_draw {
                result.early_draws += 1;
            }
            if summary.aggressive {
                result.aggressive_episodes += 1;
            }
            total_moves += summary.moves;
            result.episodes += 1;

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        if result.episodes > 0 {
            result.average_moves = total_moves as f64 / result.episodes as f64;
        }
        result.table_size = agent.q_table().len();
        Ok(result)
    }

    fn play_episode<R: Rng>(
        &mut self,
        episode: usize,
        engine: &mut GameEngine,
        agent: &mut ShapingAgent<R>,
    ) -> Result<EpisodeSummary> {
        let aggressive = self.rng.random::<f64>() < self.config.aggressive_probability;
        let epsilon = agent.epsilon();
        let lines = engine.winning_lines();

        for observer in &mut self.observers {
            observer.on_episode_start(episode, aggressive)?;
        }

        let mut board = engine.reset();
        let mut step = 0;

        let outcome = loop {
            let mover = engine.to_move();
            let state = canonicalize(&board, mover);
            let valid_actions = engine.legal_actions();

            let scripted = aggressive && mover == self.config.aggressive_player;
            let action = if scripted {
                choose_aggressive(&board, &valid_actions, mover, &lines)?
            } else {
                agent.choose_action(&state, &valid_actions)?
            };

            let result = engine.step(action)?;
            let (next_state, next_actions) = if result.done {
                (None, Vec::new())
            } else {
                (
                    Some(canonicalize(&result.board, engine.to_move())),
                    engine.legal_actions(),
                )
            };

            agent.update(Experience {
                mover,
                state,
                action,
                reward: result.reward,
                next_state,
                next_actions,
                done: result.done,
                board_before: &board,
                board_after: &result.board,
            })?;

            for observer in &mut self.observers {
                observer.on_move(&MoveObservation {
                    episode,
                    step,
                    mover,
                    action,
                    reward: result.reward,
                    done: result.done,
                    scripted,
                    board: &result.board,
                })?;
            }

            step += 1;
            board = result.board;

            if let Some(outcome) = engine.outcome() {
                break outcome;
            }
        };

        Ok(EpisodeSummary {
            episode,
            outcome,
            moves: step,
            aggressive,
            early_draw: outcome == GameOutcome::Draw && !board.is_full(),
            epsilon,
        })
    }
}

/// Play one game with the agent on both sides, without learning
///
/// Moves are greedy with random tie-breaks. The engine keeps the move
/// history for replay.
pub fn demo_game<R: Rng>(
    engine: &mut GameEngine,
    agent: &mut ShapingAgent<R>,
) -> Result<GameOutcome> {
    let mut board = engine.reset();
    loop {
        let state = canonicalize(&board, engine.to_move());
        let action = agent.choose_greedy(&state, &engine.legal_actions())?;
        board = engine.step(action)?.board;
        if let Some(outcome) = engine.outcome() {
            return Ok(outcome);
        }
    }
}
