//! Episode driver, training and evaluation runs
//!
//! This module provides:
//! - The single-episode driver that sequences policy, environment and
//!   learning engine
//! - Training and evaluation pipelines over many episodes
//! - Observers recording progress and metrics during a run

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{EpisodeMode, EpisodeReport, play_episode};
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver, StepObservation,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
