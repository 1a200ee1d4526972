//! ε-greedy action selection with staged decay

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::value_table::ValueTable;
use crate::{
    Error, Result,
    easy21::{Action, State},
};

/// ε-greedy exploration policy.
///
/// ε only starts to shrink once the agent has explored more than
/// `decay_threshold` times. Both ε and the exploration counter live as long
/// as the agent; episodes do not reset them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    epsilon: f64,
    explorations: u64,
    decay_threshold: u64,
    decay_step: f64,
    /// Pinned ε is held fixed for evaluation runs
    pinned: bool,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, decay_threshold: u64, decay_step: f64) -> Self {
        Self {
            epsilon,
            explorations: 0,
            decay_threshold,
            decay_step,
            pinned: false,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn explorations(&self) -> u64 {
        self.explorations
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Choose an action for `state`.
    pub fn select<R: Rng>(&mut self, state: &State, table: &ValueTable, rng: &mut R) -> Action {
        let candidates = Action::ALL.map(|action| (action, table.get(state, action)));

        let exploring = rng.random::<f64>() < self.epsilon;
        self.decay();

        let feasible: Vec<Action> = if exploring {
            self.explorations += 1;
            Action::ALL.to_vec()
        } else {
            let best = candidates
                .iter()
                .map(|&(_, value)| value)
                .fold(f64::NEG_INFINITY, f64::max);
            candidates
                .iter()
                .filter(|&&(_, value)| value == best)
                .map(|&(action, _)| action)
                .collect()
        };

        match feasible.as_slice() {
            [only] => *only,
            many => *many
                .choose(rng)
                .expect("feasible action set is never empty"),
        }
    }

    /// Reset the exploration counter and optionally pin ε.
    pub fn enter_evaluation_mode(&mut self, epsilon: Option<f64>) -> Result<()> {
        if let Some(epsilon) = epsilon {
            if !(0.0..=1.0).contains(&epsilon) {
                return Err(Error::invalid_config(format!(
                    "evaluation epsilon must be in [0, 1], got {epsilon}"
                )));
            }
            self.epsilon = epsilon;
            self.pinned = true;
        }
        self.explorations = 0;
        Ok(())
    }

    fn decay(&mut self) {
        if self.pinned || self.explorations <= self.decay_threshold || self.epsilon <= 0.0 {
            return;
        }
        self.epsilon = (self.epsilon - self.decay_step).max(0.0);
        if self.epsilon == 0.0 {
            debug!(explorations = self.explorations, "exploration rate reached zero");
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_greedy_prefers_higher_value() {
        let mut policy = EpsilonGreedy::new(0.0, 0, 0.01);
        let mut table = ValueTable::new();
        let state = State::new(7, 14);
        table.set(state, Action::Stick, 0.3);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(policy.select(&state, &table, &mut rng), Action::Stick);
        }
        assert_eq!(policy.explorations(), 0);
    }

    #[test]
    fn test_greedy_ties_break_both_ways() {
        let mut policy = EpsilonGreedy::new(0.0, 0, 0.01);
        let table = ValueTable::new();
        let state = State::new(7, 14);
        let mut rng = StdRng::seed_from_u64(2);
        let hits = (0..200)
            .filter(|_| policy.select(&state, &table, &mut rng) == Action::Hit)
            .count();
        assert!(hits > 0 && hits < 200);
    }

    #[test]
    fn test_decay_starts_after_threshold() {
        let mut policy = EpsilonGreedy::new(1.0, 3, 0.25);
        let table = ValueTable::new();
        let state = State::new(1, 1);
        let mut rng = StdRng::seed_from_u64(3);

        // ε = 1 explores on every call; counter reaches 4 after four calls
        // and the fifth call is the first to see counter > threshold.
        for _ in 0..4 {
            policy.select(&state, &table, &mut rng);
        }
        assert_eq!(policy.epsilon(), 1.0);
        assert_eq!(policy.explorations(), 4);

        policy.select(&state, &table, &mut rng);
        assert_eq!(policy.epsilon(), 0.75);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut policy = EpsilonGreedy::new(0.015, 0, 0.01);
        policy.explorations = 10;
        policy.decay();
        policy.decay();
        assert_eq!(policy.epsilon(), 0.0);
    }

    #[test]
    fn test_pinned_epsilon_does_not_decay() {
        let mut policy = EpsilonGreedy::new(0.5, 0, 0.1);
        policy.enter_evaluation_mode(Some(1.0)).unwrap();
        let table = ValueTable::new();
        let state = State::new(1, 1);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            policy.select(&state, &table, &mut rng);
        }
        assert_eq!(policy.epsilon(), 1.0);
        assert_eq!(policy.explorations(), 100);
    }

    #[test]
    fn test_evaluation_epsilon_out_of_range() {
        let mut policy = EpsilonGreedy::new(0.5, 0, 0.1);
        assert!(policy.enter_evaluation_mode(Some(1.5)).is_err());
        assert_eq!(policy.epsilon(), 0.5);
    }
}
