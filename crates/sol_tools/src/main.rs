//! Sol Dominion - Development Tools

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sol-tools")]
#[command(about = "Development tools for Sol Dominion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate level data files
    Validate {
        /// Level file, or directory of .ron level files
        #[arg(default_value = "crates/sol_core/assets/levels.ron")]
        path: String,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating level data in: {path}");
            match sol_tools::validate::validate_path(std::path::Path::new(&path)) {
                Ok(report) => {
                    for warning in &report.warnings {
                        tracing::warn!("{warning}");
                    }
                    tracing::info!(
                        files = report.files,
                        levels = report.levels,
                        planets = report.planets,
                        "Validation passed"
                    );
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
