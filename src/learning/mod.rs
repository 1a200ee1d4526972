//! Tabular temporal difference learning for Easy21
//!
//! ## Algorithms
//!
//! - **Q-learning**: off-policy, bootstraps from the best known value of the
//!   successor state after every transition
//! - **n-step TD**: on-policy, bootstraps from the action actually chosen
//!   `n` steps later; `n = 1` is SARSA
//!
//! | Aspect | Q-learning | n-step TD |
//! |--------|------------|-----------|
//! | Policy | Off-policy | On-policy |
//! | Update | Immediately, per transition | Trailing `n - 1` steps behind |
//! | Terminal | Single update | Drains every pending step |
//!
//! ## Usage Example
//!
//! ```no_run
//! use easy21::{
//!     config::{AgentConfig, AlgorithmMode},
//!     easy21::Environment,
//!     learning::Agent,
//! };
//!
//! let config = AgentConfig::new(AlgorithmMode::NStepTd)
//!     .with_steps(3)
//!     .with_seed(2016);
//! let mut env = Environment::new(config.rewards).with_seed(2017);
//! let mut agent = Agent::new(config)?;
//!
//! let state = agent.reset_episode(&mut env);
//! let action = agent.select_action(&state);
//! let transition = env.step(&state, action);
//! agent.record_transition(state, action, transition.reward);
//! # Ok::<(), easy21::Error>(())
//! ```

pub mod agent;
pub mod policy;
pub mod serialization;
pub mod td;
pub mod trajectory;
pub mod value_table;

pub use agent::Agent;
pub use policy::EpsilonGreedy;
pub use serialization::{SavedAgent, TrainingMetadata};
pub use td::TdRule;
pub use trajectory::{Step, Trajectory};
pub use value_table::ValueTable;
