//! Temporal difference update rules
//!
//! All three rules move an estimate toward a target by a fraction α of the
//! TD error: `Q(s,a) ← Q(s,a) + α[target − Q(s,a)]`. They differ only in how
//! the target is built:
//!
//! | Rule | Target |
//! |------|--------|
//! | Q-learning | `r + γ max_a' Q(s',a')` |
//! | SARSA | `r + γ Q(s',a')` for the action actually chosen next |
//! | n-step TD | `Σ γ^k r_{τ+k} + γ^n Q(s_{τ+n}, a_{τ+n})` |

use serde::{Deserialize, Serialize};

use super::{trajectory::Trajectory, value_table::ValueTable};
use crate::{
    Error, Result,
    easy21::{Action, State},
};

/// Step size and discount shared by every update rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdRule {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
}

impl TdRule {
    pub fn new(alpha: f64, gamma: f64) -> Self {
        Self { alpha, gamma }
    }

    fn nudge(&self, table: &mut ValueTable, state: State, action: Action, target: f64) -> f64 {
        let current = table.get(&state, action);
        let updated = current + self.alpha * (target - current);
        table.set(state, action, updated);
        updated
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') − Q(s,a)]
    ///
    /// The max only ranges over entries already written for `successor`
    /// (0 when there are none). Bust successors never get entries, so they
    /// contribute 0; a Stick successor is the state itself.
    pub fn q_learning(
        &self,
        table: &mut ValueTable,
        state: State,
        action: Action,
        reward: f64,
        successor: &State,
    ) -> f64 {
        let next_max = table.max_at(successor).unwrap_or(0.0);
        self.nudge(table, state, action, reward + self.gamma * next_max)
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') − Q(s,a)]
    pub fn sarsa(
        &self,
        table: &mut ValueTable,
        state: State,
        action: Action,
        reward: f64,
        next: Option<(&State, Action)>,
    ) -> f64 {
        let next_q = next.map_or(0.0, |(state, action)| table.get(state, action));
        self.nudge(table, state, action, reward + self.gamma * next_q)
    }

    /// n-step return for the step at index `tau`.
    ///
    /// Sums the discounted rewards of steps `tau..=min(tau + n - 1, T - 1)`,
    /// where `T` is `horizon` (the episode length once known). When
    /// `tau + n < T` the return bootstraps from `bootstrap`, the state the
    /// agent is in and the action it is about to take.
    pub fn n_step_return(
        &self,
        table: &ValueTable,
        trajectory: &Trajectory,
        tau: usize,
        n: usize,
        horizon: Option<usize>,
        bootstrap: Option<(&State, Action)>,
    ) -> Result<f64> {
        let window_end = tau + n - 1;
        let last = horizon.map_or(window_end, |end| window_end.min(end - 1));

        let mut target = 0.0;
        let mut discount = 1.0;
        for index in tau..=last {
            let step = trajectory.get(index).ok_or(Error::TrajectoryIndex {
                index,
                len: trajectory.len(),
            })?;
            target += discount * step.reward;
            discount *= self.gamma;
        }

        if horizon.is_none_or(|end| tau + n < end) {
            let (state, action) = bootstrap.ok_or(Error::MissingNextAction)?;
            target += self.gamma.powi(n as i32) * table.get(state, action);
        }

        Ok(target)
    }

    /// n-step TD update of the step at index `tau`.
    pub fn n_step(
        &self,
        table: &mut ValueTable,
        trajectory: &Trajectory,
        tau: usize,
        n: usize,
        horizon: Option<usize>,
        bootstrap: Option<(&State, Action)>,
    ) -> Result<f64> {
        let target = self.n_step_return(table, trajectory, tau, n, horizon, bootstrap)?;
        let step = trajectory.get(tau).ok_or(Error::TrajectoryIndex {
            index: tau,
            len: trajectory.len(),
        })?;
        Ok(self.nudge(table, step.state, step.action, target))
    }
}
