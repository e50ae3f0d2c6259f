//! kinarow CLI - self-play trainer for N x N, K-in-a-row tic-tac-toe
//!
//! Trains a two-step Q-learning agent with reward shaping against itself
//! and optionally shows a demo game afterwards.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kinarow")]
#[command(version, about = "Tabular self-play trainer for K-in-a-row games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the shaping Q-learning agent through self-play
    Train(kinarow::cli::commands::train::TrainArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => kinarow::cli::commands::train::execute(args),
    }
}
