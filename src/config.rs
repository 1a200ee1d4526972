//! Agent configuration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Learning rule family used by an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmMode {
    /// Single-step, max-bootstrapped update after every transition
    #[default]
    QLearning,
    /// n-step TD over a buffered trajectory; SARSA when `n == 1`
    NStepTd,
}

impl AlgorithmMode {
    const EXPECTED: &'static str = "q-learning, sarsa, n-step-td";

    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmMode::QLearning => "q-learning",
            AlgorithmMode::NStepTd => "n-step-td",
        }
    }
}

impl fmt::Display for AlgorithmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmMode {
    type Err = Error;

    /// `sarsa` parses to [`AlgorithmMode::NStepTd`]; pair it with `n = 1`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q-learning" | "qlearning" | "q" => Ok(AlgorithmMode::QLearning),
            "n-step-td" | "nstep" | "n-step" | "sarsa" | "td" => Ok(AlgorithmMode::NStepTd),
            other => Err(Error::ParseAlgorithm {
                input: other.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

/// Reward constants paid out by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    /// Agent's sum drops below 1
    pub bust_below: f64,
    /// Agent's sum exceeds 21
    pub bust_above: f64,
    /// Dealer's sum leaves `[1, 21]` after the agent sticks
    pub dealer_bust: f64,
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl Rewards {
    /// Symmetric unit rewards: every bust costs 1, a dealer bust pays 1.
    pub fn unit() -> Self {
        Self {
            bust_below: -1.0,
            bust_above: -1.0,
            dealer_bust: 1.0,
            win: 1.0,
            draw: 0.0,
            loss: -1.0,
        }
    }

    /// Heavier bust-below penalty and dealer-bust reward.
    pub fn scaled() -> Self {
        Self {
            bust_below: -10.0,
            bust_above: -1.0,
            dealer_bust: 10.0,
            ..Self::unit()
        }
    }

    fn validate(&self) -> Result<()> {
        let named = [
            ("bust_below", self.bust_below),
            ("bust_above", self.bust_above),
            ("dealer_bust", self.dealer_bust),
            ("win", self.win),
            ("draw", self.draw),
            ("loss", self.loss),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(Error::invalid_config(format!(
                    "reward '{name}' must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Rewards {
    fn default() -> Self {
        Self::unit()
    }
}

/// Configuration for creating an agent.
///
/// # Examples
///
/// ```
/// use easy21::config::{AgentConfig, AlgorithmMode, Rewards};
///
/// let config = AgentConfig::new(AlgorithmMode::NStepTd)
///     .with_steps(3)
///     .with_learning_rate(0.1)
///     .with_rewards(Rewards::scaled())
///     .with_seed(2016);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub algorithm: AlgorithmMode,
    /// Step count for n-step TD
    pub n: usize,
    /// Learning rate α, in `(0, 1]`
    pub alpha: f64,
    /// Discount γ, in `[0, 1]`
    pub gamma: f64,
    /// Initial exploration rate ε₀, in `[0, 1]`
    pub epsilon: f64,
    /// Explorations after which ε starts decaying
    pub decay_threshold: u64,
    /// Amount subtracted from ε on each decaying selection
    pub decay_step: f64,
    pub rewards: Rewards,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub const DEFAULT_ALPHA: f64 = 0.9;
    pub const DEFAULT_GAMMA: f64 = 1.0;
    pub const DEFAULT_EPSILON: f64 = 0.9999;
    pub const DEFAULT_DECAY_THRESHOLD: u64 = 800;
    pub const DEFAULT_DECAY_STEP: f64 = 0.01;

    pub fn new(algorithm: AlgorithmMode) -> Self {
        Self {
            algorithm,
            n: 1,
            alpha: Self::DEFAULT_ALPHA,
            gamma: Self::DEFAULT_GAMMA,
            epsilon: Self::DEFAULT_EPSILON,
            decay_threshold: Self::DEFAULT_DECAY_THRESHOLD,
            decay_step: Self::DEFAULT_DECAY_STEP,
            rewards: Rewards::default(),
            seed: None,
        }
    }

    /// SARSA is n-step TD with a single step.
    pub fn sarsa() -> Self {
        Self::new(AlgorithmMode::NStepTd).with_steps(1)
    }

    pub fn with_steps(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_discount(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_decay(mut self, threshold: u64, step: f64) -> Self {
        self.decay_threshold = threshold;
        self.decay_step = step;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Human-readable name of the configured learning rule.
    pub fn algorithm_name(&self) -> &'static str {
        match (self.algorithm, self.n) {
            (AlgorithmMode::QLearning, _) => "Q-Learning",
            (AlgorithmMode::NStepTd, 1) => "SARSA",
            (AlgorithmMode::NStepTd, _) => "Multistep",
        }
    }

    /// Reject out-of-range parameters. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if self.n < 1 {
            return Err(Error::invalid_config("step count n must be at least 1"));
        }
        if self.n > i32::MAX as usize {
            return Err(Error::invalid_config(format!(
                "step count n must be at most {}, got {}",
                i32::MAX,
                self.n
            )));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::invalid_config(format!(
                "learning rate alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::invalid_config(format!(
                "discount gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::invalid_config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(self.decay_step.is_finite() && self.decay_step > 0.0) {
            return Err(Error::invalid_config(format!(
                "epsilon decay step must be positive and finite, got {}",
                self.decay_step
            )));
        }
        self.rewards.validate()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(AlgorithmMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
        assert!(AgentConfig::sarsa().validate().is_ok());
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(
            "Q-Learning".parse::<AlgorithmMode>().unwrap(),
            AlgorithmMode::QLearning
        );
        assert_eq!(
            "sarsa".parse::<AlgorithmMode>().unwrap(),
            AlgorithmMode::NStepTd
        );
        assert!(matches!(
            "monte-carlo".parse::<AlgorithmMode>(),
            Err(Error::ParseAlgorithm { .. })
        ));
    }

    #[test]
    fn test_algorithm_name() {
        assert_eq!(AgentConfig::default().algorithm_name(), "Q-Learning");
        assert_eq!(AgentConfig::sarsa().algorithm_name(), "SARSA");
        assert_eq!(
            AgentConfig::new(AlgorithmMode::NStepTd)
                .with_steps(4)
                .algorithm_name(),
            "Multistep"
        );
    }

    #[test]
    fn test_scaled_rewards_keep_outcome_payouts() {
        let scaled = Rewards::scaled();
        assert_eq!(scaled.bust_below, -10.0);
        assert_eq!(scaled.dealer_bust, 10.0);
        assert_eq!(scaled.win, 1.0);
        assert_eq!(scaled.loss, -1.0);
    }
}
