//! Serialization support for trained agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{agent::Agent, policy::EpsilonGreedy, value_table::ValueTable};
use crate::{Error, config::AgentConfig};

/// Bookkeeping stored alongside a trained agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Episodes the agent was trained for
    pub episodes: usize,
    /// Seed of the training run, if any
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub algorithm: String,
    config: AgentConfig,
    table: ValueTable,
    policy: EpsilonGreedy,
    updates: u64,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &Agent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            algorithm: agent.name().to_string(),
            config: agent.config().clone(),
            table: agent.value_table().clone(),
            policy: agent.policy().clone(),
            updates: agent.updates_applied(),
            metadata,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.table
    }

    /// Rebuild the agent, keeping its learned values and exploration state.
    pub fn to_agent(&self) -> Result<Agent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            }
            .into());
        }

        Ok(Agent::from_parts(
            self.config.clone(),
            self.table.clone(),
            self.policy.clone(),
            self.updates,
        )?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Rewards,
        easy21::{Action, Environment},
    };

    fn trained_agent() -> Result<Agent> {
        let mut agent = Agent::new(AgentConfig::sarsa().with_seed(7))?;
        let mut env = Environment::new(Rewards::default()).with_seed(8);
        for _ in 0..20 {
            let state = agent.reset_episode(&mut env);
            let transition = env.step(&state, Action::Stick);
            agent.record_transition(state, Action::Stick, transition.reward);
            agent.apply_update(&transition, None)?;
        }
        Ok(agent)
    }

    #[test]
    fn test_agent_roundtrip() -> Result<()> {
        let agent = trained_agent()?;
        assert!(!agent.value_table().is_empty());

        let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.to_agent()?;

        assert_eq!(restored.value_table(), agent.value_table());
        assert_eq!(restored.epsilon(), agent.epsilon());
        assert_eq!(restored.explorations(), agent.explorations());
        assert_eq!(restored.config(), agent.config());
        assert_eq!(loaded.algorithm, "SARSA");
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_version() -> Result<()> {
        let agent = trained_agent()?;
        let mut saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        saved.version = 99;
        assert!(saved.to_agent().is_err());
        Ok(())
    }
}
