//! Self-play reinforcement learning for N x N, K-in-a-row tic-tac-toe
//!
//! This crate provides:
//! - A rules engine for generalized tic-tac-toe with early draw detection
//! - A tabular two-step Q-learning agent with lose-penalty credit
//!   assignment and threat-blocking / line-building reward shaping
//! - An aggressive line-extending opponent for training pressure
//! - A self-play training pipeline with composable observers
//! - A command-line trainer

pub mod app;
pub mod cli;
pub mod error;
pub mod opponents;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use app::AgentConfig;
pub use error::{Error, Result};
pub use q_learning::{Experience, ShapingAgent};
pub use tictactoe::{Board, GameEngine, GameOutcome, Player, WinningLines, canonicalize};
pub use types::CanonicalState;
