/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::{SystemTime, UNIX_EPOCH};

/// Four random u64 values.
const SEEDS: [u64; 4] = [
    0b1001000111000101101010110011110011101011111111010101101001110001,
    0b0000011010111010001001010011101110011101110110001001011111001101,
    0b1000000000010101101101011110010110011100110000100111010111101001,
    0b1111100011110100001001111111110001010100000100011101111001010011,
];

/// A source of randomness for tie-breaking and jitter.
///
/// Every controller draws from one of these, so that substituting a seeded source makes its choices reproducible.
pub trait RandomSource {
    /// Returns the next pseudo-random number in the sequence.
    fn next_u64(&mut self) -> u64;

    /// Returns a number uniformly distributed over `[0, 1)`.
    #[inline(always)]
    fn next_f64(&mut self) -> f64 {
        // The top 53 bits fit exactly in an f64 mantissa
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns an index uniformly distributed over `[0, n)`.
    ///
    /// # Panics
    /// If `n` is zero.
    #[inline(always)]
    fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "Cannot pick a random index from an empty range");
        (self.next_f64() * n as f64) as usize % n
    }

    /// Returns an index into `weights`, where each index is chosen with probability proportional to its weight.
    ///
    /// Returns `None` if all weights are zero.
    fn weighted(&mut self, weights: &[u64]) -> Option<usize> {
        let total = weights.iter().sum::<u64>();
        if total == 0 {
            return None;
        }

        let mut roll = (self.next_f64() * total as f64) as u64 % total;
        for (i, &weight) in weights.iter().enumerate() {
            if roll < weight {
                return Some(i);
            }
            roll -= weight;
        }

        // Unreachable, since `roll < total`
        None
    }
}

/// A pseudo-random number generator using the "xoshiro" algorithm.
///
/// Source code copied from <https://prng.di.unimi.it/xoshiro256starstar.c>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XoShiRo([u64; 4]);

impl XoShiRo {
    /// Construct a new pseudo-random number generator from the library's seeds.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::from_seeds(SEEDS)
    }

    /// Construct a new pseudo-random number generator from your own seeds.
    #[inline(always)]
    pub const fn from_seeds(seeds: [u64; 4]) -> Self {
        Self(seeds)
    }

    /// Construct a new pseudo-random number generator from a single seed.
    ///
    /// The seed is expanded into the four words of state with `splitmix64`, as recommended by the xoshiro authors.
    ///
    /// # Example
    /// ```
    /// # use draughts::{RandomSource, XoShiRo};
    /// let mut a = XoShiRo::from_seed(42);
    /// let mut b = XoShiRo::from_seed(42);
    /// assert_eq!(a.next_u64(), b.next_u64());
    /// ```
    pub const fn from_seed(seed: u64) -> Self {
        let mut state = seed;
        let mut seeds = [0; 4];

        let mut i = 0;
        while i < seeds.len() {
            state = state.wrapping_add(0x9E3779B97F4A7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
            seeds[i] = z ^ (z >> 31);
            i += 1;
        }

        Self::from_seeds(seeds)
    }

    /// Construct a new pseudo-random number generator seeded from the system clock.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();

        Self::from_seed(nanos)
    }

    /// Inner function for computing the next pseudo-random number in the sequence.
    const fn xoshiro(mut s: [u64; 4]) -> (u64, [u64; 4]) {
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;

        s[3] = s[3].rotate_left(45);
        (result, s)
    }
}

impl RandomSource for XoShiRo {
    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        let (result, s) = Self::xoshiro(self.0);
        self.0 = s;
        result
    }
}

impl Default for XoShiRo {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

/// A [`RandomSource`] that replays a fixed sequence of numbers, looping when exhausted.
///
/// Useful for forcing a particular outcome in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<u64>,
    next: usize,
}

impl Sequence {
    /// Creates a source that yields `values` in order, forever.
    ///
    /// An empty sequence always yields `0`.
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// A source that always yields zero, which makes every draw pick the lowest option.
    pub fn zeros() -> Self {
        Self::new(Vec::new())
    }
}

impl RandomSource for Sequence {
    fn next_u64(&mut self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }

        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = XoShiRo::from_seed(7);
        let mut b = XoShiRo::from_seed(7);
        let mut c = XoShiRo::from_seed(8);

        let a = (0..16).map(|_| a.next_u64()).collect::<Vec<_>>();
        let b = (0..16).map(|_| b.next_u64()).collect::<Vec<_>>();
        let c = (0..16).map(|_| c.next_u64()).collect::<Vec<_>>();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ranges() {
        let mut rng = XoShiRo::from_seed(1);
        for _ in 0..1000 {
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));
            assert!(rng.below(3) < 3);
        }
    }

    #[test]
    fn test_weighted_never_picks_zero_weight() {
        let mut rng = XoShiRo::from_seed(3);
        for _ in 0..1000 {
            let i = rng.weighted(&[0, 5, 0, 1]).unwrap();
            assert!(i == 1 || i == 3);
        }
        assert_eq!(rng.weighted(&[0, 0]), None);
        assert_eq!(rng.weighted(&[]), None);
    }

    #[test]
    fn test_sequence() {
        let mut zeros = Sequence::zeros();
        assert_eq!(zeros.below(10), 0);
        assert_eq!(zeros.weighted(&[0, 3, 4]), Some(1));

        let mut max = Sequence::new([u64::MAX]);
        assert_eq!(max.below(10), 9);
        assert_eq!(max.weighted(&[1, 1, 2]), Some(2));
    }
}
