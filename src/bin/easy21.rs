//! Easy21 CLI - Train and inspect tabular TD agents
//!
//! This CLI provides a unified interface for:
//! - Training Q-learning, SARSA and n-step TD agents
//! - Evaluating saved agents
//! - Exporting learned value grids

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "easy21")]
#[command(version, about = "Tabular reinforcement learning on Easy21", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent (Q-learning, SARSA, n-step TD)
    Train(Box<easy21::cli::commands::train::TrainArgs>),

    /// Evaluate a trained agent
    Evaluate(easy21::cli::commands::evaluate::EvaluateArgs),

    /// Export learned values
    Export(easy21::cli::commands::export::ExportArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => easy21::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => easy21::cli::commands::evaluate::execute(args),
        Commands::Export(args) => easy21::cli::commands::export::execute(args),
    }
}
