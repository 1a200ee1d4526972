//! Per-episode trajectory buffer

use serde::{Deserialize, Serialize};

use crate::easy21::{Action, State};

/// One recorded transition: the state acted in, the action, and its reward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub state: State,
    pub action: Action,
    pub reward: f64,
}

/// Append-only record of the current episode.
///
/// Entry `i` is the transition taken at time step `i`. Nothing is removed
/// until [`clear`](Self::clear) at the end of the episode.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    steps: Vec<Step>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: State, action: Action, reward: f64) {
        self.steps.push(Step {
            state,
            action,
            reward,
        });
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_reads_do_not_consume() {
        let mut trajectory = Trajectory::new();
        trajectory.push(State::new(3, 7), Action::Hit, 0.0);
        trajectory.push(State::new(3, 12), Action::Stick, 1.0);

        assert_eq!(trajectory.get(0).map(|s| s.action), Some(Action::Hit));
        assert_eq!(trajectory.get(1).map(|s| s.reward), Some(1.0));
        assert_eq!(trajectory.get(0).map(|s| s.action), Some(Action::Hit));
        assert!(trajectory.get(2).is_none());
        assert_eq!(trajectory.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut trajectory = Trajectory::new();
        trajectory.push(State::new(3, 7), Action::Hit, 0.0);
        trajectory.clear();
        assert!(trajectory.is_empty());
        assert!(trajectory.last().is_none());
    }
}
