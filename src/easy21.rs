//! Easy21 game implementation

pub mod card;
pub mod environment;
pub mod state;

pub use card::{Card, Color, deal_initial_cards};
pub use environment::{
    DEALER_STICK_THRESHOLD, Environment, MAX_SUM, MIN_SUM, Outcome, SumRange, Transition, is_bust,
};
pub use state::{Action, State};
