//! Ports (trait boundaries) for external dependencies.
//!
//! The training loop reports through these traits; adapters in
//! [`crate::pipeline::observers`] decide where the data goes.

pub mod observer;

pub use observer::{EpisodeSummary, MoveObservation, Observer};
