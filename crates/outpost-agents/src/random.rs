//! Injectable randomness.
//!
//! Everything in the simulation that rolls dice goes through
//! [`RandomSource`]: yield rolls and name draws. Production code uses
//! [`SeededRandom`] so a run is reproducible from its world seed; tests can
//! use [`ScriptedRandom`] to force exact draws.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniform integer and unit-interval draws.
pub trait RandomSource {
    /// A uniform integer in `[min, max]` (bounds swapped if reversed).
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32;

    /// A uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

/// Seeded pseudo-random source backed by [`SmallRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// Create a source from a seed. Same seed, same sequence.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// A source that replays pre-recorded draws.
///
/// Integer draws are clamped into the requested range. When a script runs
/// dry, integer draws return the lower bound and unit draws return `1.0`
/// (which fails every chance below certainty).
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    integers: VecDeque<u32>,
    units: VecDeque<f64>,
}

impl ScriptedRandom {
    /// Create a source replaying `integers` and `units` in order.
    pub fn new(integers: impl IntoIterator<Item = u32>, units: impl IntoIterator<Item = f64>) -> Self {
        Self {
            integers: integers.into_iter().collect(),
            units: units.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.integers.pop_front().map_or(lo, |v| v.clamp(lo, hi))
    }

    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(1.0)
    }
}
