//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the episode
//! driver to specific output formats or metrics.

use crate::{
    Result,
    easy21::{Action, State, Transition},
    pipeline::EpisodeReport,
};

/// Observer trait for monitoring training and evaluation runs
///
/// Observers can be composed to collect different types of data:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each environment step
///    - `on_episode_end(episode, report)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use easy21::{pipeline::EpisodeReport, ports::Observer};
///
/// struct RewardSum {
///     total: f64,
/// }
///
/// impl Observer for RewardSum {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         report: &EpisodeReport,
///     ) -> easy21::Result<()> {
///         self.total += report.reward;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the initial deal, before the first action.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each environment step, before any learning update.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Step number within the episode (0-based)
    /// * `state` - State the action was taken in
    /// * `action` - Action taken
    /// * `transition` - What the environment returned
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: &State,
        _action: Action,
        _transition: &Transition,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once the episode has reached a terminal state and all of its
    /// learning updates have been applied.
    fn on_episode_end(&mut self, _episode: usize, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode. Use this to flush outputs.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
