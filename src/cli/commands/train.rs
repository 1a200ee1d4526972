//! Train command - Train an Easy21 agent

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    config::{AgentConfig, AlgorithmMode, Rewards},
    easy21::Environment,
    export::{ValueGridExporter, ValueTransform},
    learning::{Agent, SavedAgent, TrainingMetadata},
    pipeline::{
        JsonlObserver, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
};

#[derive(Debug, Serialize)]
struct SummaryStats {
    total_episodes: usize,
    wins: usize,
    draws: usize,
    losses: usize,
    player_busts: usize,
    dealer_busts: usize,
    win_rate: f64,
    draw_rate: f64,
    loss_rate: f64,
    mean_reward: f64,
}

impl From<&TrainingResult> for SummaryStats {
    fn from(result: &TrainingResult) -> Self {
        Self {
            total_episodes: result.total_episodes,
            wins: result.wins,
            draws: result.draws,
            losses: result.losses,
            player_busts: result.player_busts,
            dealer_busts: result.dealer_busts,
            win_rate: result.win_rate,
            draw_rate: result.draw_rate,
            loss_rate: result.loss_rate,
            mean_reward: result.mean_reward,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    algorithm: String,
    training: SummaryStats,
    evaluation: Option<SummaryStats>,
    final_epsilon: f64,
    explorations: u64,
    table_size: usize,
    config: AgentConfig,
}

pub(crate) fn sanitize_summary_path(raw: &Path) -> PathBuf {
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

#[derive(Parser, Debug)]
#[command(about = "Train an agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Learning rule (q-learning, sarsa, or n-step-td)
    #[arg(long, short = 'a', default_value = "q-learning")]
    pub algorithm: String,

    /// Step count n for n-step TD (1 is SARSA)
    #[arg(long, short = 'n', default_value_t = 1)]
    pub steps: usize,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 3000)]
    pub episodes: usize,

    /// Learning rate α (0.0-1.0]
    #[arg(long, default_value_t = AgentConfig::DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Discount factor γ [0.0-1.0]
    #[arg(long, default_value_t = AgentConfig::DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Initial exploration rate ε [0.0-1.0]
    #[arg(long, default_value_t = AgentConfig::DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Explorations before ε starts to decay
    #[arg(long, default_value_t = AgentConfig::DEFAULT_DECAY_THRESHOLD)]
    pub decay_threshold: u64,

    /// Amount ε decreases per selection once decaying
    #[arg(long, default_value_t = AgentConfig::DEFAULT_DECAY_STEP)]
    pub decay_step: f64,

    /// Reward schedule (e.g. bust-below=-10,bust-above=-1,dealer-bust=10,win=1,draw=0,loss=-1)
    #[arg(long)]
    pub rewards: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Directory to write value grid CSVs for every transform
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Number of greedy evaluation episodes after training
    #[arg(long, short = 'v', default_value_t = 0)]
    pub evaluation_episodes: usize,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

impl TrainArgs {
    /// Agent configuration described by the flags
    pub fn agent_config(&self) -> Result<AgentConfig> {
        let algorithm: AlgorithmMode = self.algorithm.parse()?;
        let rewards = match &self.rewards {
            Some(schedule) => parse_reward_schedule(schedule)?,
            None => Rewards::default(),
        };

        let mut config = AgentConfig::new(algorithm)
            .with_steps(self.steps)
            .with_learning_rate(self.alpha)
            .with_discount(self.gamma)
            .with_epsilon(self.epsilon)
            .with_decay(self.decay_threshold, self.decay_step)
            .with_rewards(rewards);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse a reward schedule from `key=value` pairs, starting from the defaults.
pub(crate) fn parse_reward_schedule(s: &str) -> Result<Rewards> {
    let mut rewards = Rewards::default();

    for part in s.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value_str) = trimmed
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid reward entry '{trimmed}'. Expected key=value"))?;
        let value: f64 = value_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid numeric reward '{value_str}' in '{trimmed}'"))?;
        let slot = match key.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bust-below" => &mut rewards.bust_below,
            "bust-above" => &mut rewards.bust_above,
            "dealer-bust" => &mut rewards.dealer_bust,
            "win" => &mut rewards.win,
            "draw" => &mut rewards.draw,
            "loss" => &mut rewards.loss,
            other => {
                return Err(anyhow!(
                    "Unknown reward key '{other}'. Expected bust-below, bust-above, dealer-bust, win, draw, or loss"
                ));
            }
        };
        *slot = value;
    }

    Ok(rewards)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.agent_config()?;
    let mut env = Environment::new(config.rewards);
    let mut agent = Agent::new(config.clone())?;

    print_section(&format!("Training {}", agent.name()));
    print_kv("Episodes", &args.episodes.to_string());
    print_kv("Algorithm", &config.algorithm.to_string());
    if config.algorithm == AlgorithmMode::NStepTd {
        print_kv("Steps (n)", &config.n.to_string());
    }
    print_kv("Alpha", &config.alpha.to_string());
    print_kv("Gamma", &config.gamma.to_string());
    print_kv("Epsilon", &config.epsilon.to_string());
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        episodes: args.episodes,
        seed: args.seed,
    });
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }

    let training = pipeline.run(&mut agent, &mut env)?;
    print_result("Training Results", &training);
    print_kv("Final epsilon", &format!("{:.4}", training.final_epsilon));
    print_kv("Explorations", &training.explorations.to_string());
    print_kv("Value table size", &training.table_size.to_string());

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        for transform in ValueTransform::ALL {
            let path = dir.join(ValueGridExporter::file_name(agent.name(), transform));
            ValueGridExporter::export(agent.value_table(), transform, &path)?;
            info!(path = %path.display(), "exported value grid");
        }
    }

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            episodes: training.total_episodes,
            seed: args.seed,
        };
        SavedAgent::from_agent(&agent, metadata).save_to_file(path)?;
        println!("\nSaved agent to {}", path.display());
    }

    // Evaluate a copy so the saved agent keeps its training-time ε.
    let evaluation = if args.evaluation_episodes > 0 {
        let mut evaluated = agent.clone();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: args.evaluation_episodes,
            seed: args.seed,
        });
        let result =
            pipeline.evaluate(&mut evaluated, &mut env, args.evaluation_episodes, Some(0.0))?;
        print_result("Greedy Evaluation", &result);
        Some(result)
    } else {
        None
    };

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            algorithm: agent.name().to_string(),
            training: SummaryStats::from(&training),
            evaluation: evaluation.as_ref().map(SummaryStats::from),
            final_epsilon: training.final_epsilon,
            explorations: training.explorations,
            table_size: training.table_size,
            config,
        };
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("Wrote summary to {}", path.display());
    }

    Ok(())
}

fn print_result(title: &str, result: &TrainingResult) {
    print_subsection(title);
    print_kv("Episodes", &result.total_episodes.to_string());
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, result.win_rate * 100.0),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", result.draws, result.draw_rate * 100.0),
    );
    print_kv(
        "Losses",
        &format!("{} ({:.1}%)", result.losses, result.loss_rate * 100.0),
    );
    print_kv("Player busts", &result.player_busts.to_string());
    print_kv("Dealer busts", &result.dealer_busts.to_string());
    print_kv("Mean reward", &format!("{:.3}", result.mean_reward));
}
