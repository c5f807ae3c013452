use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::probability::BASIS_POINTS;

/// Statistically uniform randomness behind the roll pipeline. One
/// implementation per environment: the thread RNG in production, a
/// seeded StdRng wherever a test needs a reproducible tape.
pub trait RandomSource: Send {
    /// Uniform in `[0, 10_000)`.
    fn roll_basis_points(&mut self) -> i64;

    /// Fair 50/50, used for the featured-pool UP decision.
    fn coin_flip(&mut self) -> bool;

    /// Uniform index into a slice of `len` elements. `len` must be
    /// non-zero; empty tiers are rejected before any pick happens.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Production source backed by `rand::rng()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn roll_basis_points(&mut self) -> i64 {
        rand::rng().random_range(0..BASIS_POINTS)
    }

    fn coin_flip(&mut self) -> bool {
        rand::rng().random_bool(0.5)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Deterministic source for simulations: the same seed always yields
/// the same tape of rolls, coins and picks.
#[derive(Clone, Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn roll_basis_points(&mut self) -> i64 {
        self.0.random_range(0..BASIS_POINTS)
    }

    fn coin_flip(&mut self) -> bool {
        self.0.random_bool(0.5)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_source_replays_the_same_tape() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..100 {
            assert_eq!(a.roll_basis_points(), b.roll_basis_points());
            assert_eq!(a.coin_flip(), b.coin_flip());
            assert_eq!(a.pick_index(13), b.pick_index(13));
        }
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = SeededRandom::new(42);
        for _ in 0..10_000 {
            let roll = rng.roll_basis_points();
            assert!((0..BASIS_POINTS).contains(&roll));
        }
    }
}
