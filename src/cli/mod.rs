//! CLI infrastructure for the kinarow trainer
//!
//! This module provides the command-line interface for training the shaping
//! agent and watching it play.

pub mod commands;
pub mod output;
