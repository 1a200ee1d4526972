//! Evaluate command - Measure a trained agent without learning

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{format_number, print_kv, print_section},
    easy21::Environment,
    learning::SavedAgent,
    pipeline::{ProgressObserver, TrainingConfig, TrainingPipeline, TrainingResult},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to trained agent file
    pub agent: PathBuf,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Pin ε to this value during evaluation (keeps the trained ε when omitted)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationExport<'a> {
    algorithm: &'a str,
    trained_episodes: usize,
    epsilon: Option<f64>,
    seed: Option<u64>,
    result: &'a TrainingResult,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let mut agent = saved.to_agent()?;
    let mut env = Environment::new(saved.config().rewards);

    print_section(&format!("Evaluating {}", saved.algorithm));
    print_kv("Agent file", &args.agent.display().to_string());
    print_kv(
        "Trained episodes",
        &format_number(saved.metadata.episodes),
    );
    print_kv("Episodes", &format_number(args.episodes));
    match args.epsilon {
        Some(epsilon) => print_kv("Epsilon (pinned)", &epsilon.to_string()),
        None => print_kv("Epsilon", &format!("{:.4}", agent.epsilon())),
    }

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        episodes: args.episodes,
        seed: args.seed,
    });
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let result = pipeline.evaluate(&mut agent, &mut env, args.episodes, args.epsilon)?;

    println!();
    print_kv(
        "Wins",
        &format!(
            "{} ({:.1}%)",
            format_number(result.wins),
            result.win_rate * 100.0
        ),
    );
    print_kv(
        "Draws",
        &format!(
            "{} ({:.1}%)",
            format_number(result.draws),
            result.draw_rate * 100.0
        ),
    );
    print_kv(
        "Losses",
        &format!(
            "{} ({:.1}%)",
            format_number(result.losses),
            result.loss_rate * 100.0
        ),
    );
    print_kv("Player busts", &format_number(result.player_busts));
    print_kv("Dealer busts", &format_number(result.dealer_busts));
    print_kv("Mean reward", &format!("{:.3}", result.mean_reward));

    if let Some(path) = &args.export {
        let export = EvaluationExport {
            algorithm: &saved.algorithm,
            trained_episodes: saved.metadata.episodes,
            epsilon: args.epsilon,
            seed: args.seed,
            result: &result,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &export)?;
        println!("\nExported results to {}", path.display());
    }

    Ok(())
}
