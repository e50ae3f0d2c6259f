//! Application layer: configuration shared by the library and the CLI.
//!
//! # Usage
//!
//! ```
//! use kinarow::app::AgentConfig;
//! use kinarow::q_learning::ShapingAgent;
//! use kinarow::tictactoe::GameEngine;
//!
//! let engine = GameEngine::new(3, 3)?;
//! let config = AgentConfig::new().with_seed(42);
//! let agent = ShapingAgent::new(&config, engine.winning_lines())?;
//! assert_eq!(agent.episode(), 1);
//! # Ok::<(), kinarow::Error>(())
//! ```

pub mod config;

pub use config::AgentConfig;
