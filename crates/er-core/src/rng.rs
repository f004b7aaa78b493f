//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A scenario owns one root `SimRng` seeded from the configured seed.  Each
//! subsystem that draws random numbers (scenario generation, hazard spread,
//! rescue rolls) receives its own child stream derived with
//! [`SimRng::child`]:
//!
//!   child_seed = root.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! so adding draws to one subsystem never shifts the sequence seen by
//! another.  The same seed therefore always reproduces the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG used for all stochastic simulation rules.
///
/// Used only in single-threaded contexts: the engine advances one step at a
/// time and never shares a stream between subsystems.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]; NaN counts as 0).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform sample from `[lo, hi]`; returns `lo` when the range is empty.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { self.0.gen_range(lo..=hi) } else { lo }
    }

    /// `+1.0` or `-1.0` with equal probability.
    #[inline]
    pub fn sign(&mut self) -> f64 {
        if self.0.r#gen::<bool>() { 1.0 } else { -1.0 }
    }

    /// Pick an index with probability proportional to `weights`.
    ///
    /// Returns `None` if `weights` is empty or sums to zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.0.gen_range(0.0..total);
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        // Floating-point slack: fall back to the last positive weight.
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.  `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
