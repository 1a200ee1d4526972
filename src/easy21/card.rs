//! Signed-value cards and the initial deal

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest card value
pub const MIN_CARD_VALUE: u8 = 1;

/// Highest card value
pub const MAX_CARD_VALUE: u8 = 10;

/// Card color. Black cards add to a running sum, red cards subtract from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// A single drawn card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub value: u8,
}

impl Card {
    pub fn new(color: Color, value: u8) -> Self {
        debug_assert!((MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value));
        Self { color, value }
    }

    pub fn black(value: u8) -> Self {
        Self::new(Color::Black, value)
    }

    pub fn red(value: u8) -> Self {
        Self::new(Color::Red, value)
    }

    /// Draw a card: red with probability 1/3, value uniform in 1..=10.
    ///
    /// The color is sampled before the value so a seeded generator always
    /// yields the same card sequence.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        let color = if rng.random_range(1..=3u8) == 1 {
            Color::Red
        } else {
            Color::Black
        };
        let value = rng.random_range(MIN_CARD_VALUE..=MAX_CARD_VALUE);
        Self { color, value }
    }

    /// Draw until a black card comes up.
    pub fn draw_black<R: Rng>(rng: &mut R) -> Self {
        loop {
            let card = Self::draw(rng);
            if card.color == Color::Black {
                return card;
            }
        }
    }

    /// Contribution of this card to a running sum
    pub fn signed_value(&self) -> i32 {
        match self.color {
            Color::Black => i32::from(self.value),
            Color::Red => -i32::from(self.value),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            Color::Red => "R",
            Color::Black => "B",
        };
        write!(f, "{color}{}", self.value)
    }
}

/// Deal the opening cards: one for the dealer, then one for the agent.
///
/// Each card is redrawn until it is black, so both parties start with a
/// non-negative sum.
pub fn deal_initial_cards<R: Rng>(rng: &mut R) -> (Card, Card) {
    let dealer = Card::draw_black(rng);
    let agent = Card::draw_black(rng);
    (dealer, agent)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_signed_value() {
        assert_eq!(Card::black(7).signed_value(), 7);
        assert_eq!(Card::red(7).signed_value(), -7);
    }

    #[test]
    fn test_card_equality() {
        assert_eq!(Card::black(3), Card::black(3));
        assert_ne!(Card::black(3), Card::red(3));
        assert_ne!(Card::black(3), Card::black(4));
    }

    #[test]
    fn test_draw_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let card = Card::draw(&mut rng);
            assert!((MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&card.value));
        }
    }

    #[test]
    fn test_draw_color_frequency() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 30_000;
        let black = (0..trials)
            .filter(|_| Card::draw(&mut rng).color == Color::Black)
            .count();
        let ratio = black as f64 / trials as f64;
        assert!((ratio - 2.0 / 3.0).abs() < 0.02, "black ratio {ratio}");
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::red(10).to_string(), "R10");
        assert_eq!(Card::black(1).to_string(), "B1");
    }
}
