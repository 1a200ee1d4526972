//! Game state and actions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::card::Card;

/// Agent's view of the game: the dealer's face-up card and its own running sum.
///
/// Ordered by `(dealer_showing, player_sum)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    /// Value of the dealer's first card, fixed for the whole episode
    pub dealer_showing: u8,
    /// Agent's running sum
    pub player_sum: i32,
}

impl State {
    pub fn new(dealer_showing: u8, player_sum: i32) -> Self {
        Self {
            dealer_showing,
            player_sum,
        }
    }

    /// Opening state from the two initial cards.
    pub fn from_deal(dealer: Card, agent: Card) -> Self {
        Self::new(dealer.value, agent.signed_value())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dealer showing {}, player sum {}",
            self.dealer_showing, self.player_sum
        )
    }
}

/// Actions available in every non-terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stick,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Hit, Action::Stick];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Hit => "hit",
            Action::Stick => "stick",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
