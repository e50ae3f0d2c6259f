//! Training pipeline abstractions
//!
//! This module provides:
//! - The self-play training loop with optional aggressive-opponent episodes
//! - A demo game for inspecting a trained agent
//! - Observers that record progress, metrics and per-episode logs

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult, demo_game};

pub use crate::ports::Observer;
