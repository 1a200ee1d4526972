//! Sparse state-action value table

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::easy21::{Action, State};

/// Value table mapping (state, action) pairs to estimated returns.
///
/// Reads of unseen pairs return 0.0 without creating an entry; entries are
/// created on first write and never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<(State, Action), f64>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a state-action pair, 0.0 if never written
    pub fn get(&self, state: &State, action: Action) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    /// Value only if the pair has been written
    pub fn get_entry(&self, state: &State, action: Action) -> Option<f64> {
        self.values.get(&(*state, action)).copied()
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Maximum over the entries present for `state`, `None` if there are none.
    pub fn max_at(&self, state: &State) -> Option<f64> {
        Action::ALL
            .iter()
            .filter_map(|&action| self.get_entry(state, action))
            .reduce(f64::max)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(State, Action), &f64)> {
        self.values.iter()
    }

    /// Ordered copy of every entry, for rendering and telemetry.
    pub fn snapshot(&self) -> BTreeMap<(State, Action), f64> {
        self.values.iter().map(|(key, value)| (*key, *value)).collect()
    }
}
