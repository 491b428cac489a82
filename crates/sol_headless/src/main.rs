//! Headless Sol Dominion runner.
//!
//! This binary runs sessions without graphics, controlled via JSON on
//! stdin/stdout or by scripted player strategies.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p sol_headless
//!
//! # Play one game with an autopilot and print its metrics
//! cargo run -p sol_headless -- play --level 2 --strategy greedy
//!
//! # Run batch balance test
//! cargo run -p sol_headless -- batch --level 1 --count 1000 --output results/
//!
//! # Verify determinism
//! cargo run -p sol_headless -- verify --level 5 --seed 12345 --runs 5
//!
//! # Record a game and check the replay
//! cargo run -p sol_headless -- record --level 3 --output game.replay
//! cargo run -p sol_headless -- replay --file game.replay
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sol_core::data::LevelRegistry;
use sol_core::replay::{Replay, ReplayPlayer};
use sol_headless::{
    batch::{run_batch, verify_determinism, BatchConfig},
    game_runner::{record_game, run_game, GameConfig, DEFAULT_MAX_TICKS},
    level_loader::load_levels,
    protocol::LevelInfo,
    runner::{HeadlessConfig, HeadlessRunner},
    strategies::Strategy,
    Result,
};

#[derive(Parser)]
#[command(name = "sol_headless")]
#[command(about = "Headless Sol Dominion runner for autopilot play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Level catalog (RON); defaults to the built-in campaign
    #[arg(long, global = true)]
    levels: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session on stdin/stdout
    Run {
        /// AI seed
        #[arg(long, default_value_t = sol_core::constants::DEFAULT_SEED)]
        seed: u64,
    },

    /// Play one game with a player strategy and print its metrics as JSON
    Play {
        /// Level to play
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// AI seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Strategy preset (passive, greedy, turtle) or RON file
        #[arg(short, long, default_value = "greedy")]
        strategy: String,

        /// Tick limit
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
        max_ticks: u64,
    },

    /// Run batch of games for balance testing
    Batch {
        /// Level to play
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Number of games to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Maximum parallel games (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Strategy preset (passive, greedy, turtle) or RON file
        #[arg(short, long, default_value = "greedy")]
        strategy: String,

        /// Maximum game duration in minutes of game time
        #[arg(long, default_value = "20")]
        duration_minutes: u32,
    },

    /// Verify determinism by running same seed multiple times
    Verify {
        /// Level to test
        #[arg(short, long, default_value = "5")]
        level: u32,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,

        /// Strategy preset or RON file
        #[arg(short, long, default_value = "greedy")]
        strategy: String,
    },

    /// Record a game played by a strategy to a replay file
    Record {
        /// Level to play
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// AI seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Strategy preset or RON file
        #[arg(short, long, default_value = "greedy")]
        strategy: String,

        /// Replay file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check that a replay file reproduces its recorded hash
    Replay {
        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the level catalog
    Levels,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for the protocol
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    if let Err(e) = dispatch_command(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn dispatch_command(cli: Cli) -> Result<()> {
    let levels = load_levels(cli.levels.as_deref())?;

    match cli.command {
        Some(Commands::Run { seed }) => cmd_run(levels, seed),
        None => cmd_run(levels, sol_core::constants::DEFAULT_SEED),
        Some(Commands::Play {
            level,
            seed,
            strategy,
            max_ticks,
        }) => {
            let config = GameConfig::new(Arc::new(levels), level)
                .with_seed(seed)
                .with_strategy(Strategy::resolve(&strategy)?)
                .with_max_ticks(max_ticks);
            let metrics = run_game(&config)?;
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            Ok(())
        }
        Some(Commands::Batch {
            level,
            count,
            parallel,
            output,
            seed,
            strategy,
            duration_minutes,
        }) => {
            let config = BatchConfig {
                level,
                game_count: count,
                parallel_games: parallel,
                output_dir: output,
                seed_start: seed,
                max_ticks: u64::from(duration_minutes) * 60 * 60,
                strategy,
            };
            cmd_batch(levels, config)
        }
        Some(Commands::Verify {
            level,
            seed,
            runs,
            strategy,
        }) => {
            let config = GameConfig::new(Arc::new(levels), level)
                .with_seed(seed)
                .with_strategy(Strategy::resolve(&strategy)?);
            cmd_verify(&config, runs)
        }
        Some(Commands::Record {
            level,
            seed,
            strategy,
            output,
        }) => {
            let config = GameConfig::new(Arc::new(levels), level)
                .with_seed(seed)
                .with_strategy(Strategy::resolve(&strategy)?);
            let replay = record_game(&config)?;
            std::fs::write(&output, replay.to_bytes()?)?;
            tracing::info!(
                ticks = replay.final_tick,
                clicks = replay.clicks.len(),
                hash = replay.final_hash,
                path = %output.display(),
                "Replay written"
            );
            Ok(())
        }
        Some(Commands::Replay { file }) => {
            let replay = Replay::from_bytes(&std::fs::read(&file)?)?;
            tracing::info!(
                level = replay.level,
                seed = replay.seed,
                ticks = replay.final_tick,
                "Verifying replay"
            );
            ReplayPlayer::new(replay)?.verify()?;
            tracing::info!("Replay verified");
            Ok(())
        }
        Some(Commands::Levels) => {
            for level in LevelInfo::catalog(&levels) {
                println!("{}", serde_json::to_string(&level)?);
            }
            Ok(())
        }
    }
}

/// Run an interactive session
fn cmd_run(levels: LevelRegistry, seed: u64) -> Result<()> {
    tracing::info!(seed, "Starting interactive session");
    let config = HeadlessConfig {
        seed,
        ..HeadlessConfig::default()
    };
    HeadlessRunner::new(levels, config).run_stdio()
}

/// Run batch of games and save the results
fn cmd_batch(levels: LevelRegistry, config: BatchConfig) -> Result<()> {
    let num_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        level = config.level,
        count = config.game_count,
        parallel = config.parallel_games,
        seed = config.seed_start,
        strategy = %config.strategy,
        max_ticks = config.max_ticks,
        output = %config.output_dir.display(),
        cpus_available = num_cpus,
        "Batch configuration"
    );

    let results = run_batch(Arc::new(levels), config)?;
    let path = results.config.results_file();
    results.save(&path)?;

    let summary = &results.summary;
    tracing::info!(
        games = summary.games,
        wins = summary.wins,
        losses = summary.losses,
        timeouts = summary.timeouts,
        win_rate = %format!("{:.1}%", summary.win_rate * 100.0),
        mean_ticks = %format!("{:.0}", summary.mean_duration_ticks),
        errors = results.errors.len(),
        path = %path.display(),
        "Batch results saved"
    );
    Ok(())
}

/// Verify determinism and exit non-zero on mismatch
fn cmd_verify(config: &GameConfig, runs: u32) -> Result<()> {
    let report = verify_determinism(config, runs)?;
    if report.passed() {
        tracing::info!(
            runs = report.hashes.len(),
            ticks = report.durations.first().copied().unwrap_or_default(),
            "Determinism verified"
        );
        Ok(())
    } else {
        tracing::error!(
            consistent = report.consistent,
            replay_verified = report.replay_verified,
            hashes = ?report.hashes,
            "Determinism check failed"
        );
        std::process::exit(1);
    }
}
