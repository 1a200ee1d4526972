//! Easy21 reinforcement learning toolkit
//!
//! This crate provides:
//! - The Easy21 card game as a stochastic episodic environment
//! - Tabular agents learning with Q-learning, SARSA and n-step TD
//! - ε-greedy exploration with staged decay
//! - Training and evaluation pipelines with pluggable observers
//! - Agent persistence and value grid export

pub mod cli;
pub mod config;
pub mod easy21;
pub mod error;
pub mod export;
pub mod learning;
pub mod pipeline;
pub mod ports;
pub mod utils;

pub use config::{AgentConfig, AlgorithmMode, Rewards};
pub use easy21::{Action, Card, Color, Environment, Outcome, State, Transition};
pub use error::{Error, Result};
pub use learning::{Agent, SavedAgent, ValueTable};
pub use pipeline::{TrainingConfig, TrainingPipeline, TrainingResult};
