//! Game dynamics of the Easy21 environment

use easy21::{
    Action, Card, Color, Environment, Outcome, Rewards, State,
    easy21::{DEALER_STICK_THRESHOLD, SumRange, deal_initial_cards, is_bust},
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn bust_check_partitions_the_integers() {
    for sum in -30..=40 {
        let expected = if sum < 1 {
            SumRange::BelowRange
        } else if sum > 21 {
            SumRange::AboveRange
        } else {
            SumRange::WithinRange
        };
        assert_eq!(is_bust(sum), expected, "sum {sum}");
    }
}

#[test]
fn opening_deal_is_always_black() {
    for seed in 0..500 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (dealer, agent) = deal_initial_cards(&mut rng);
        assert_eq!(dealer.color, Color::Black);
        assert_eq!(agent.color, Color::Black);

        let state = State::from_deal(dealer, agent);
        assert!((1..=10).contains(&state.dealer_showing));
        assert!((1..=10).contains(&state.player_sum));
    }
}

#[test]
fn bust_below_pays_its_own_reward() {
    let rewards = Rewards::scaled();
    let mut seen = 0;

    for seed in 0..200 {
        let mut env = Environment::new(rewards).with_seed(seed);
        let transition = env.step(&State::new(5, 1), Action::Hit);
        match transition.outcome {
            Some(Outcome::BustBelow) => {
                assert_eq!(transition.reward, -10.0);
                assert!(transition.state.player_sum < 1);
                seen += 1;
            }
            Some(other) => panic!("unexpected outcome {other}"),
            None => assert_eq!(transition.reward, 0.0),
        }
    }

    assert!(seen > 0, "a red card from a sum of 1 must bust below");
}

#[test]
fn bust_above_pays_its_own_reward() {
    let mut env = Environment::new(Rewards::scaled()).with_seed(11);
    let mut seen = false;
    for _ in 0..200 {
        let transition = env.step(&State::new(5, 21), Action::Hit);
        if transition.outcome == Some(Outcome::BustAbove) {
            assert_eq!(transition.reward, -1.0);
            seen = true;
        }
    }
    assert!(seen);
}

#[test]
fn dealer_stops_at_threshold_or_busts() {
    let mut env = Environment::new(Rewards::default()).with_seed(7);
    for seed in 0..300 {
        env.reseed(seed);
        let state = State::new((seed % 10) as u8 + 1, 15);
        let transition = env.step(&state, Action::Stick);

        match transition.outcome {
            Some(Outcome::DealerBust) => assert!(is_bust(transition.dealer_final).is_bust()),
            Some(outcome) => {
                assert!(transition.dealer_final >= DEALER_STICK_THRESHOLD);
                assert!(transition.dealer_final <= 21);
                let expected = match 15.cmp(&transition.dealer_final) {
                    std::cmp::Ordering::Greater => Outcome::Win,
                    std::cmp::Ordering::Equal => Outcome::Draw,
                    std::cmp::Ordering::Less => Outcome::Loss,
                };
                assert_eq!(outcome, expected);
            }
            None => panic!("sticking must end the episode"),
        }
    }
}

/// Seed 2016 deals the dealer a black 6 then a black 7: 10 -> 16 -> 23.
const SEED_2016_DEALER_FINAL: i32 = 23;
const SEED_2016_STICK_REWARD: f64 = 1.0;

#[test]
fn seeded_stick_pins_the_dealer_draws() {
    let state = State::new(10, 10);
    let mut env = Environment::new(Rewards::default()).with_seed(2016);
    let transition = env.step(&state, Action::Stick);

    assert_eq!(transition.state, state);
    assert_eq!(transition.dealer_final, SEED_2016_DEALER_FINAL);
    assert_eq!(transition.outcome, Some(Outcome::DealerBust));
    assert_eq!(transition.reward, SEED_2016_STICK_REWARD);

    // The same draws through the card sampler directly.
    let mut rng = StdRng::seed_from_u64(2016);
    assert_eq!(Card::draw(&mut rng), Card::black(6));
    assert_eq!(Card::draw(&mut rng), Card::black(7));
}

#[test]
fn same_seed_same_episode() {
    let mut first = Environment::new(Rewards::default()).with_seed(99);
    let mut second = Environment::new(Rewards::default()).with_seed(99);

    let (d1, a1) = first.deal_initial_cards();
    let (d2, a2) = second.deal_initial_cards();
    assert_eq!((d1, a1), (d2, a2));

    let state = State::from_deal(d1, a1);
    for action in [Action::Hit, Action::Hit, Action::Stick] {
        assert_eq!(first.step(&state, action), second.step(&state, action));
    }
}
