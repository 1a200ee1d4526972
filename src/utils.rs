//! Shared helpers

use rand::{SeedableRng, rngs::StdRng};

/// Seeded generator when a seed is given, otherwise one seeded from the
/// thread-local generator.
pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Fraction `part / total`, or 0 when `total` is zero.
pub fn rate(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = build_rng(Some(99));
        let mut b = build_rng(Some(99));
        for _ in 0..10 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_rate_handles_zero_total() {
        assert_eq!(rate(3, 0), 0.0);
        assert_eq!(rate(1, 4), 0.25);
    }
}
