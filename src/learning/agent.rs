//! Tabular Easy21 agent
//!
//! The agent owns its value table, trajectory buffer, exploration policy and
//! random generator. The episode driver calls it in a fixed order:
//!
//! 1. [`Agent::reset_episode`] for a fresh deal
//! 2. [`Agent::select_action`] for the current state
//! 3. [`Agent::record_transition`] once the environment has stepped
//! 4. [`Agent::apply_update`] with the successor and, for n-step TD on a
//!    non-terminal step, the action already chosen for the successor

use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{
    policy::EpsilonGreedy,
    td::TdRule,
    trajectory::Trajectory,
    value_table::ValueTable,
};
use crate::{
    Error, Result,
    config::{AgentConfig, AlgorithmMode},
    easy21::{Action, Environment, State, Transition},
    utils::build_rng,
};

/// Agent learning Easy21 with Q-learning or n-step TD.
#[derive(Debug, Clone)]
pub struct Agent {
    config: AgentConfig,
    table: ValueTable,
    trajectory: Trajectory,
    policy: EpsilonGreedy,
    rule: TdRule,
    rng: StdRng,
    /// Next trajectory index owed an n-step update
    next_update: usize,
    /// Table updates applied over the agent's lifetime
    updates: u64,
}

impl Agent {
    /// Create an agent, rejecting invalid configuration.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: ValueTable::new(),
            trajectory: Trajectory::new(),
            policy: EpsilonGreedy::new(config.epsilon, config.decay_threshold, config.decay_step),
            rule: TdRule::new(config.alpha, config.gamma),
            rng: build_rng(config.seed),
            next_update: 0,
            updates: 0,
            config,
        })
    }

    pub(crate) fn from_parts(
        config: AgentConfig,
        table: ValueTable,
        policy: EpsilonGreedy,
        updates: u64,
    ) -> Result<Self> {
        let mut agent = Self::new(config)?;
        agent.table = table;
        agent.policy = policy;
        agent.updates = updates;
        Ok(agent)
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.config.algorithm_name()
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.table
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub(crate) fn policy(&self) -> &EpsilonGreedy {
        &self.policy
    }

    pub fn epsilon(&self) -> f64 {
        self.policy.epsilon()
    }

    pub fn explorations(&self) -> u64 {
        self.policy.explorations()
    }

    /// Total table updates applied so far
    pub fn updates_applied(&self) -> u64 {
        self.updates
    }

    /// Re-seed the agent's generator.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Pick the next action with the ε-greedy policy.
    pub fn select_action(&mut self, state: &State) -> Action {
        self.policy.select(state, &self.table, &mut self.rng)
    }

    /// Append a transition to the trajectory buffer.
    pub fn record_transition(&mut self, state: State, action: Action, reward: f64) {
        self.trajectory.push(state, action, reward);
    }

    /// Learn from the most recently recorded transition.
    ///
    /// `next_action` is the action already selected for `transition.state`;
    /// n-step TD needs it to bootstrap on non-terminal steps, Q-learning
    /// ignores it. Returns the number of table entries updated.
    pub fn apply_update(
        &mut self,
        transition: &Transition,
        next_action: Option<Action>,
    ) -> Result<usize> {
        let applied = match self.config.algorithm {
            AlgorithmMode::QLearning => self.q_learning_update(transition)?,
            AlgorithmMode::NStepTd => self.n_step_update(transition, next_action)?,
        };
        self.updates += applied as u64;
        Ok(applied)
    }

    fn q_learning_update(&mut self, transition: &Transition) -> Result<usize> {
        let step = *self.trajectory.last().ok_or(Error::EmptyTrajectory)?;
        self.rule.q_learning(
            &mut self.table,
            step.state,
            step.action,
            step.reward,
            &transition.state,
        );
        if transition.is_terminal() {
            self.trajectory.clear();
        }
        Ok(1)
    }

    fn n_step_update(
        &mut self,
        transition: &Transition,
        next_action: Option<Action>,
    ) -> Result<usize> {
        let n = self.config.n;
        let t = self
            .trajectory
            .len()
            .checked_sub(1)
            .ok_or(Error::EmptyTrajectory)?;

        if transition.is_terminal() {
            // Every step still owed an update gets one, truncated at the horizon.
            let horizon = t + 1;
            let mut applied = 0;
            while self.next_update < horizon {
                self.rule.n_step(
                    &mut self.table,
                    &self.trajectory,
                    self.next_update,
                    n,
                    Some(horizon),
                    None,
                )?;
                self.next_update += 1;
                applied += 1;
            }
            self.trajectory.clear();
            self.next_update = 0;
            return Ok(applied);
        }

        let next_action = next_action.ok_or(Error::MissingNextAction)?;
        if t + 1 < n {
            return Ok(0);
        }

        let tau = t + 1 - n;
        debug_assert_eq!(tau, self.next_update);
        self.rule.n_step(
            &mut self.table,
            &self.trajectory,
            tau,
            n,
            None,
            Some((&transition.state, next_action)),
        )?;
        self.next_update = tau + 1;
        Ok(1)
    }

    /// Start a new episode: clear the trajectory and deal fresh cards.
    ///
    /// The value table, ε and the exploration counter carry over.
    pub fn reset_episode(&mut self, env: &mut Environment) -> State {
        self.trajectory.clear();
        self.next_update = 0;
        let (dealer, agent) = env.deal_initial_cards();
        State::from_deal(dealer, agent)
    }

    /// Reset the exploration counter and optionally pin ε for measurement.
    pub fn enter_evaluation_mode(&mut self, epsilon: Option<f64>) -> Result<()> {
        self.policy.enter_evaluation_mode(epsilon)?;
        debug!(
            epsilon = self.policy.epsilon(),
            pinned = self.policy.is_pinned(),
            "entered evaluation mode"
        );
        Ok(())
    }

    /// Ordered copy of the value table
    pub fn value_table_snapshot(&self) -> BTreeMap<(State, Action), f64> {
        self.table.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Rewards, easy21::Outcome};

    fn step_to(state: State, reward: f64, outcome: Option<Outcome>) -> Transition {
        Transition {
            state,
            reward,
            outcome,
            dealer_final: i32::from(state.dealer_showing),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AgentConfig::default().with_learning_rate(0.0);
        assert!(matches!(
            Agent::new(config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_update_without_transition_fails() {
        let mut agent = Agent::new(AgentConfig::default().with_seed(1)).unwrap();
        let transition = step_to(State::new(1, 5), 0.0, None);
        assert!(matches!(
            agent.apply_update(&transition, None),
            Err(Error::EmptyTrajectory)
        ));
    }

    #[test]
    fn test_n_step_needs_next_action_mid_episode() {
        let mut agent = Agent::new(AgentConfig::sarsa().with_seed(1)).unwrap();
        let state = State::new(1, 5);
        agent.record_transition(state, Action::Hit, 0.0);
        let transition = step_to(State::new(1, 9), 0.0, None);
        assert!(matches!(
            agent.apply_update(&transition, None),
            Err(Error::MissingNextAction)
        ));
    }

    #[test]
    fn test_q_learning_clears_trajectory_at_terminal() {
        let mut agent = Agent::new(AgentConfig::default().with_seed(1)).unwrap();
        let state = State::new(1, 5);
        agent.record_transition(state, Action::Stick, 1.0);
        let applied = agent
            .apply_update(&step_to(state, 1.0, Some(Outcome::Win)), None)
            .unwrap();
        assert_eq!(applied, 1);
        assert!(agent.trajectory().is_empty());
        assert_eq!(agent.value_table().get(&state, Action::Stick), 0.9);
    }

    #[test]
    fn test_reset_episode_deals_black_cards() {
        let mut agent = Agent::new(AgentConfig::default().with_seed(1)).unwrap();
        let mut env = Environment::new(Rewards::default()).with_seed(2);
        for _ in 0..100 {
            let state = agent.reset_episode(&mut env);
            assert!((1..=10).contains(&state.dealer_showing));
            assert!((1..=10).contains(&state.player_sum));
        }
    }
}
