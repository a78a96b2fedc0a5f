// Copyright (c) 2024 Mike Tsao. All rights reserved.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of randomness that generators borrow rather than own, so that
/// tests can hand in a seeded or scripted one.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `range`.
    fn rand_range(&mut self, range: std::ops::Range<u64>) -> u64;

    /// An unbiased coin flip.
    fn coin_flip(&mut self) -> bool {
        self.rand_range(0..2) == 1
    }
}

/// A pseudorandom number generator (PRNG) for applications that don't require
/// cryptographically secure random numbers. Pass the same number to
/// [Rng::new_with_seed()] to get the same stream back again.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        // This is a poor source of entropy if we want the random-number stream
        // to be unpredictable. It's fine for making each unseeded walk
        // different from the last.
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self::new_with_seed(seed)
    }
}
impl RandomSource for Rng {
    fn rand_range(&mut self, range: std::ops::Range<u64>) -> u64 {
        self.0.rand_range(range)
    }
}
impl Rng {
    #[allow(missing_docs)]
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    #[allow(missing_docs)]
    pub fn rand_u64(&mut self) -> u64 {
        self.0.rand_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainline() {
        let mut r = Rng::default();
        assert_ne!(r.rand_u64(), r.rand_u64());
    }

    #[test]
    fn reproducible_stream() {
        let mut r1 = Rng::new_with_seed(1);
        let mut r2 = Rng::new_with_seed(2);
        assert!(
            (0..100).any(|_| r1.rand_u64() != r2.rand_u64()),
            "RNGs with different seeds should produce different streams"
        );

        let mut r1 = Rng::new_with_seed(1);
        let mut r2 = Rng::new_with_seed(1);
        assert!(
            (0..100).all(|_| r1.coin_flip() == r2.coin_flip()),
            "RNGs with same seeds should produce same streams."
        );
    }

    #[test]
    fn coin_flips_land_both_ways() {
        let mut r = Rng::new_with_seed(42);
        let heads = (0..1000).filter(|_| r.coin_flip()).count();
        assert!(heads > 400 && heads < 600, "suspicious coin: {heads} heads");
    }
}
