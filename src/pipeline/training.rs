//! Training and evaluation runs over many episodes

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{EpisodeMode, EpisodeReport, play_episode};
use crate::{
    Result,
    easy21::{Environment, Outcome},
    learning::Agent,
    ports::Observer,
    utils::rate,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed. The agent gets `seed`, the environment `seed + 1`.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 3000,
            seed: None,
        }
    }
}

/// Result of a training or evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_episodes: usize,

    /// Episodes won, including dealer busts
    pub wins: usize,

    pub draws: usize,

    /// Episodes lost, including player busts
    pub losses: usize,

    pub player_busts: usize,

    pub dealer_busts: usize,

    pub win_rate: f64,

    pub draw_rate: f64,

    pub loss_rate: f64,

    /// Mean total reward per episode
    pub mean_reward: f64,

    /// Exploration rate when the run finished
    pub final_epsilon: f64,

    /// Explorations counted since the counter was last reset
    pub explorations: u64,

    /// Value table entries when the run finished
    pub table_size: usize,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

#[derive(Debug, Default)]
struct Tally {
    episodes: usize,
    wins: usize,
    draws: usize,
    losses: usize,
    player_busts: usize,
    dealer_busts: usize,
    reward: f64,
}

impl Tally {
    fn record(&mut self, report: &EpisodeReport) {
        self.episodes += 1;
        self.reward += report.total_reward;
        match report.outcome {
            Outcome::Draw => self.draws += 1,
            outcome if outcome.is_win() => self.wins += 1,
            _ => self.losses += 1,
        }
        if report.outcome.is_player_bust() {
            self.player_busts += 1;
        }
        if report.outcome == Outcome::DealerBust {
            self.dealer_busts += 1;
        }
    }

    fn finish(self, agent: &Agent) -> TrainingResult {
        let mean_reward = if self.episodes > 0 {
            self.reward / self.episodes as f64
        } else {
            0.0
        };
        TrainingResult {
            total_episodes: self.episodes,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            player_busts: self.player_busts,
            dealer_busts: self.dealer_busts,
            win_rate: rate(self.wins, self.episodes),
            draw_rate: rate(self.draws, self.episodes),
            loss_rate: rate(self.losses, self.episodes),
            mean_reward,
            final_epsilon: agent.epsilon(),
            explorations: agent.explorations(),
            table_size: agent.value_table().len(),
        }
    }
}

/// Training pipeline for a single agent in one environment
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Train `agent` for the configured number of episodes.
    ///
    /// The value table, ε and the exploration counter carry over from any
    /// previous run.
    pub fn run(&mut self, agent: &mut Agent, env: &mut Environment) -> Result<TrainingResult> {
        self.seed_pair(agent, env, 0);
        info!(
            algorithm = agent.name(),
            episodes = self.config.episodes,
            seed = ?self.config.seed,
            "starting training"
        );

        let result = self.run_episodes(agent, env, self.config.episodes, EpisodeMode::Learn)?;

        info!(
            algorithm = agent.name(),
            win_rate = result.win_rate,
            mean_reward = result.mean_reward,
            epsilon = result.final_epsilon,
            explorations = result.explorations,
            table_size = result.table_size,
            "training finished"
        );
        Ok(result)
    }

    /// Measure `agent` without learning.
    ///
    /// Enters evaluation mode first: the exploration counter is reset and ε
    /// is pinned to `epsilon` when given.
    pub fn evaluate(
        &mut self,
        agent: &mut Agent,
        env: &mut Environment,
        episodes: usize,
        epsilon: Option<f64>,
    ) -> Result<TrainingResult> {
        agent.enter_evaluation_mode(epsilon)?;
        self.seed_pair(agent, env, 2);
        info!(
            algorithm = agent.name(),
            episodes,
            epsilon = agent.epsilon(),
            "starting evaluation"
        );

        let result = self.run_episodes(agent, env, episodes, EpisodeMode::Evaluate)?;

        info!(
            win_rate = result.win_rate,
            draw_rate = result.draw_rate,
            loss_rate = result.loss_rate,
            mean_reward = result.mean_reward,
            "evaluation finished"
        );
        Ok(result)
    }

    fn run_episodes(
        &mut self,
        agent: &mut Agent,
        env: &mut Environment,
        episodes: usize,
        mode: EpisodeMode,
    ) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut tally = Tally::default();
        for episode in 0..episodes {
            let report = play_episode(agent, env, mode, episode, &mut self.observers)?;
            debug!(
                episode,
                steps = report.steps,
                outcome = %report.outcome,
                reward = report.reward,
                player_sum = report.final_state.player_sum,
                dealer_final = report.dealer_final,
                "episode finished"
            );
            tally.record(&report);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &report)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(tally.finish(agent))
    }

    fn seed_pair(&self, agent: &mut Agent, env: &mut Environment, offset: u64) {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed.wrapping_add(offset));
            env.reseed(seed.wrapping_add(offset + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, Rewards};

    #[test]
    fn test_result_counts_add_up() {
        let config = AgentConfig::default().with_seed(1);
        let mut env = Environment::new(config.rewards);
        let mut agent = Agent::new(config).unwrap();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 200,
            seed: Some(1),
        });

        let result = pipeline.run(&mut agent, &mut env).unwrap();

        assert_eq!(result.total_episodes, 200);
        assert_eq!(result.wins + result.draws + result.losses, 200);
        assert!(result.player_busts <= result.losses);
        assert!(result.dealer_busts <= result.wins);
        assert!(result.table_size > 0);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("result.json");
        let mut env = Environment::new(Rewards::default());
        let mut agent = Agent::new(AgentConfig::sarsa()).unwrap();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 10,
            seed: Some(5),
        });
        let result = pipeline.run(&mut agent, &mut env).unwrap();

        result.save(&path).unwrap();
        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded.total_episodes, result.total_episodes);
        assert_eq!(loaded.wins, result.wins);
    }
}
