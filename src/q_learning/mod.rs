//! Two-step Q-learning with reward shaping
//!
//! This module implements the learning side of the crate: a tabular agent
//! that plays both X and O from one table of canonical states.
//!
//! ## Update rule
//!
//! | Situation | Target for the oldest buffered move |
//! |-----------|--------------------------------------|
//! | Next buffered move is by the same player | r0 + γ·r1 + γ²·max Q(s2, ·) |
//! | Same player, but that move ended the game | r0 + γ·r1 |
//! | Different player, or oldest move blamed for a loss | r0 |
//! | Episode over | r (every remaining move) |
//!
//! Rewards are the environment reward plus the threat-blocking and
//! line-building shaping terms from [`shaping`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use kinarow::{
//!     app::AgentConfig,
//!     q_learning::ShapingAgent,
//!     tictactoe::{GameEngine, canonicalize},
//! };
//!
//! let mut engine = GameEngine::new(4, 4)?;
//! let config = AgentConfig::default().with_seed(1);
//! let mut agent = ShapingAgent::new(&config, engine.winning_lines())?;
//!
//! let board = engine.reset();
//! let state = canonicalize(&board, engine.to_move());
//! let action = agent.choose_action(&state, &engine.legal_actions())?;
//! # Ok::<(), kinarow::Error>(())
//! ```

pub mod agent;
pub mod buffer;
pub mod q_table;
pub mod schedule;
pub mod shaping;

// Public re-exports
pub use agent::{Experience, ShapingAgent};
pub use buffer::{LOSE_PENALTY, PendingBuffer, Transition};
pub use q_table::QTable;
pub use schedule::EpsilonSchedule;
pub use shaping::{RewardShaper, ShapingRewards};
