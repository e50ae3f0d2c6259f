//! Train command - Self-play training of the shaping Q-learning agent

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::AgentConfig,
    cli::output::{
        format_count_rate, format_number, print_kv, print_section, print_stats_table,
        print_subsection,
    },
    pipeline::{
        JsonlObserver, MetricsObserver, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult, demo_game,
    },
    q_learning::ShapingAgent,
    tictactoe::{GameEngine, GameOutcome, Player, render_history},
};

#[derive(Debug, Serialize)]
struct BoardMetadata {
    size: usize,
    k: usize,
    winning_lines: usize,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    board: BoardMetadata,
    agent: &'a AgentConfig,
    training: &'a TrainingConfig,
    result: &'a TrainingResult,
    demo_outcome: Option<String>,
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Player::X),
        "o" | "second" | "player2" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn describe_outcome(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Win(player) => format!("{player} has won!"),
        GameOutcome::Draw => "It's a draw!".to_string(),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent through self-play")]
pub struct TrainArgs {
    /// Board side length N
    #[arg(long, short = 'n', default_value_t = 4)]
    pub size: usize,

    /// Marks in a row needed to win (K)
    #[arg(long, short = 'k', default_value_t = 4)]
    pub k: usize,

    /// Number of self-play episodes
    #[arg(long, short = 'e', default_value_t = 100_000)]
    pub episodes: usize,

    /// Learning rate α (0.0-1.0]
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Exploration rate at the first episode
    #[arg(long, default_value_t = 0.3)]
    pub epsilon_start: f64,

    /// Exploration rate reached at the last episode
    #[arg(long, default_value_t = 0.0)]
    pub epsilon_end: f64,

    /// Share of episodes where the aggressive opponent plays one side
    #[arg(long, default_value_t = 0.1)]
    pub aggressive_fraction: f64,

    /// Which side the aggressive opponent plays (`x` or `o`)
    #[arg(long, default_value = "o")]
    pub aggressive_player: String,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL episode records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,

    /// Play and print a self-play game after training
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub demo: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut engine = GameEngine::new(args.size, args.k).context("invalid board dimensions")?;
    let aggressive_player = parse_player_token(&args.aggressive_player, "--aggressive-player")?;

    let mut agent_config = AgentConfig::new()
        .with_learning_rate(args.alpha)
        .with_discount(args.gamma)
        .with_epsilon(args.epsilon_start, args.epsilon_end)
        .with_total_episodes(args.episodes.max(1));
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }
    let mut agent = ShapingAgent::new(&agent_config, engine.winning_lines())?;

    let training_config = TrainingConfig {
        num_episodes: args.episodes,
        aggressive_probability: args.aggressive_fraction,
        aggressive_player,
        seed: args.seed.map(|seed| seed.wrapping_add(1)),
    };

    print_section("Two-step shaping Q-learning");
    print_stats_table(&[
        ("Board", format!("{0}x{0}, {1} in a row", args.size, args.k)),
        ("Winning lines", engine.winning_lines().len().to_string()),
        ("Episodes", format_number(args.episodes)),
        ("Alpha / gamma", format!("{} / {}", args.alpha, args.gamma)),
        (
            "Epsilon",
            format!("{} -> {}", args.epsilon_start, args.epsilon_end),
        ),
        (
            "Aggressive opponent",
            format!("{aggressive_player} in {:.0}% of episodes", 100.0 * args.aggressive_fraction),
        ),
    ]);
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = MetricsObserver::new();
    let mut pipeline =
        TrainingPipeline::new(training_config.clone()).with_observer(Box::new(metrics.clone()));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut engine, &mut agent)?;
    let recent = metrics.summary();

    print_subsection("Training summary");
    print_stats_table(&[
        ("X wins", format_count_rate(result.x_wins, result.episodes)),
        ("O wins", format_count_rate(result.o_wins, result.episodes)),
        ("Draws", format_count_rate(result.draws, result.episodes)),
        ("Early draws", format_count_rate(result.early_draws, result.episodes)),
        (
            "Aggressive episodes",
            format_count_rate(result.aggressive_episodes, result.episodes),
        ),
        ("Average moves", format!("{:.2}", result.average_moves)),
        ("Recent draw rate", format!("{:.1}%", 100.0 * recent.recent_draw_rate)),
        ("Table states", format_number(result.table_size)),
    ]);

    let demo_outcome = if args.demo {
        print_subsection("Demo game (self-play)");
        let outcome = demo_game(&mut engine, &mut agent)?;
        println!("{}", render_history(engine.history()));
        println!("{}", describe_outcome(outcome));
        Some(describe_outcome(outcome))
    } else {
        None
    };

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create summary file {}", path.display()))?;
        let summary = TrainingSummaryFile {
            board: BoardMetadata {
                size: engine.size(),
                k: engine.k(),
                winning_lines: engine.winning_lines().len(),
            },
            agent: &agent_config,
            training: &training_config,
            result: &result,
            demo_outcome,
        };
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
