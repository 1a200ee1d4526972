//! Transition and reward dynamics

use std::fmt;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    card::{self, Card},
    state::{Action, State},
};
use crate::{config::Rewards, utils::build_rng};

/// Lowest in-range sum
pub const MIN_SUM: i32 = 1;

/// Highest in-range sum
pub const MAX_SUM: i32 = 21;

/// The dealer keeps drawing while its sum is below this threshold
pub const DEALER_STICK_THRESHOLD: i32 = 17;

/// Position of a running sum relative to the valid range `[1, 21]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SumRange {
    BelowRange,
    WithinRange,
    AboveRange,
}

impl SumRange {
    pub fn is_bust(self) -> bool {
        self != SumRange::WithinRange
    }
}

/// Classify a running sum.
pub fn is_bust(sum: i32) -> SumRange {
    if sum < MIN_SUM {
        SumRange::BelowRange
    } else if sum > MAX_SUM {
        SumRange::AboveRange
    } else {
        SumRange::WithinRange
    }
}

/// How a terminal step ended, from the agent's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    BustBelow,
    BustAbove,
    DealerBust,
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Win | Outcome::DealerBust)
    }

    pub fn is_loss(self) -> bool {
        matches!(self, Outcome::Loss | Outcome::BustBelow | Outcome::BustAbove)
    }

    pub fn is_player_bust(self) -> bool {
        matches!(self, Outcome::BustBelow | Outcome::BustAbove)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::BustBelow => "bust_below",
            Outcome::BustAbove => "bust_above",
            Outcome::DealerBust => "dealer_bust",
            Outcome::Win => "win",
            Outcome::Draw => "draw",
            Outcome::Loss => "loss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one environment step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Successor state
    pub state: State,
    pub reward: f64,
    /// `Some` exactly when the step ended the episode
    pub outcome: Option<Outcome>,
    /// Dealer's final sum, or its first card while the dealer has not played
    pub dealer_final: i32,
}

impl Transition {
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Easy21 environment.
///
/// Holds the reward constants and the generator used for every card draw;
/// the game itself lives entirely in the [`State`] passed to [`step`](Self::step).
#[derive(Debug, Clone)]
pub struct Environment {
    rewards: Rewards,
    rng: StdRng,
}

impl Environment {
    pub fn new(rewards: Rewards) -> Self {
        Self {
            rewards,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    pub fn draw_card(&mut self) -> Card {
        Card::draw(&mut self.rng)
    }

    /// Opening cards `(dealer, agent)`, both black.
    pub fn deal_initial_cards(&mut self) -> (Card, Card) {
        card::deal_initial_cards(&mut self.rng)
    }

    /// Advance the episode by one action.
    pub fn step(&mut self, state: &State, action: Action) -> Transition {
        match action {
            Action::Hit => self.hit(state),
            Action::Stick => self.stick(state),
        }
    }

    fn hit(&mut self, state: &State) -> Transition {
        let card = self.draw_card();
        let next = State::new(state.dealer_showing, state.player_sum + card.signed_value());

        let (reward, outcome) = match is_bust(next.player_sum) {
            SumRange::BelowRange => (self.rewards.bust_below, Some(Outcome::BustBelow)),
            SumRange::AboveRange => (self.rewards.bust_above, Some(Outcome::BustAbove)),
            SumRange::WithinRange => (0.0, None),
        };

        Transition {
            state: next,
            reward,
            outcome,
            dealer_final: i32::from(state.dealer_showing),
        }
    }

    fn stick(&mut self, state: &State) -> Transition {
        let mut dealer_sum = i32::from(state.dealer_showing);

        while dealer_sum < DEALER_STICK_THRESHOLD {
            dealer_sum += self.draw_card().signed_value();
            if is_bust(dealer_sum).is_bust() {
                return Transition {
                    state: *state,
                    reward: self.rewards.dealer_bust,
                    outcome: Some(Outcome::DealerBust),
                    dealer_final: dealer_sum,
                };
            }
        }

        let (reward, outcome) = match state.player_sum.cmp(&dealer_sum) {
            std::cmp::Ordering::Greater => (self.rewards.win, Outcome::Win),
            std::cmp::Ordering::Equal => (self.rewards.draw, Outcome::Draw),
            std::cmp::Ordering::Less => (self.rewards.loss, Outcome::Loss),
        };

        Transition {
            state: *state,
            reward,
            outcome: Some(outcome),
            dealer_final: dealer_sum,
        }
    }
}
