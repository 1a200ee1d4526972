//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the episode driver to specific output formats.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::episode::EpisodeReport;
use crate::{
    Result,
    easy21::{Action, Outcome, State, Transition},
    ports::Observer,
    utils::rate,
};

/// Observation of a single step during an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub step: usize,
    pub dealer_showing: u8,
    pub player_sum: i32,
    pub action: Action,
    pub next_player_sum: i32,
    pub reward: f64,
}

/// Complete observation of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub episode: usize,
    pub outcome: Outcome,
    pub reward: f64,
    pub dealer_final: i32,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        match report.outcome {
            Outcome::Draw => self.draws += 1,
            outcome if outcome.is_win() => self.wins += 1,
            _ => self.losses += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome rates and a moving reward average
pub struct MetricsObserver {
    wins: usize,
    draws: usize,
    losses: usize,
    total_episodes: usize,
    total_steps: usize,
    window: usize,
    recent_rewards: VecDeque<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer averaging over the last `window` episodes
    pub fn new(window: usize) -> Self {
        Self {
            wins: 0,
            draws: 0,
            losses: 0,
            total_episodes: 0,
            total_steps: 0,
            window: window.max(1),
            recent_rewards: VecDeque::new(),
        }
    }

    pub fn win_rate(&self) -> f64 {
        rate(self.wins, self.total_episodes)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.total_episodes)
    }

    pub fn loss_rate(&self) -> f64 {
        rate(self.losses, self.total_episodes)
    }

    /// Average number of steps per episode
    pub fn avg_episode_length(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.total_episodes as f64
        }
    }

    /// Mean reward over the most recent episodes
    pub fn recent_mean_reward(&self) -> f64 {
        if self.recent_rewards.is_empty() {
            0.0
        } else {
            self.recent_rewards.iter().sum::<f64>() / self.recent_rewards.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            win_rate: self.win_rate(),
            draw_rate: self.draw_rate(),
            loss_rate: self.loss_rate(),
            avg_episode_length: self.avg_episode_length(),
            recent_mean_reward: self.recent_mean_reward(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_episode_length: f64,
    pub recent_mean_reward: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, report: &EpisodeReport) -> Result<()> {
        self.total_episodes += 1;
        self.total_steps += report.steps;
        match report.outcome {
            Outcome::Draw => self.draws += 1,
            outcome if outcome.is_win() => self.wins += 1,
            _ => self.losses += 1,
        }

        self.recent_rewards.push_back(report.total_reward);
        if self.recent_rewards.len() > self.window {
            self.recent_rewards.pop_front();
        }
        Ok(())
    }
}

/// JSONL observer - Exports one episode per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        step: usize,
        state: &State,
        action: Action,
        transition: &Transition,
    ) -> Result<()> {
        self.current_steps.push(StepObservation {
            step,
            dealer_showing: state.dealer_showing,
            player_sum: state.player_sum,
            action,
            next_player_sum: transition.state.player_sum,
            reward: transition.reward,
        });
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        let observation = Observation {
            episode,
            outcome: report.outcome,
            reward: report.reward,
            dealer_final: report.dealer_final,
            steps: std::mem::take(&mut self.current_steps),
        };
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: Outcome, reward: f64, steps: usize) -> EpisodeReport {
        EpisodeReport {
            episode: 0,
            initial_state: State::new(5, 5),
            final_state: State::new(5, 5),
            steps,
            outcome,
            reward,
            total_reward: reward,
            dealer_final: 18,
            updates: steps,
        }
    }

    #[test]
    fn test_metrics_rates() {
        let mut metrics = MetricsObserver::new(2);
        metrics.on_episode_end(0, &report(Outcome::Win, 1.0, 1)).unwrap();
        metrics.on_episode_end(1, &report(Outcome::DealerBust, 1.0, 3)).unwrap();
        metrics.on_episode_end(2, &report(Outcome::BustAbove, -1.0, 2)).unwrap();
        metrics.on_episode_end(3, &report(Outcome::Draw, 0.0, 2)).unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.avg_episode_length, 2.0);
        // Window of two: (-1 + 0) / 2
        assert_eq!(summary.recent_mean_reward, -0.5);
    }

    #[test]
    fn test_jsonl_writes_one_line_per_episode() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("episodes.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap();

        for episode in 0..3 {
            observer.on_episode_start(episode).unwrap();
            let state = State::new(4, 12);
            let transition = Transition {
                state,
                reward: -1.0,
                outcome: Some(Outcome::Loss),
                dealer_final: 19,
            };
            observer
                .on_step(episode, 0, &state, Action::Stick, &transition)
                .unwrap();
            observer
                .on_episode_end(episode, &report(Outcome::Loss, -1.0, 1))
                .unwrap();
        }
        observer.on_training_end().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["outcome"], "loss");
        assert_eq!(parsed["steps"][0]["action"], "Stick");
    }
}
