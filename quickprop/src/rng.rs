//! Random source integration and seed handling.
//!
//! The engine never reaches for process-wide randomness on its own: every
//! generator receives the random source explicitly, and every check owns one
//! `StdRng` built from a recorded seed, so any run can be replayed.

use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform draws in a bounded range, available on every `RngCore`
pub trait RandomSource {
    /// Draw a value uniformly from `[low, high]` (both bounds inclusive)
    fn next_in_range<T>(&mut self, low: T, high: T) -> T
    where
        T: SampleUniform + PartialOrd;

    /// Draw an index uniformly from `[0, bound)`; `bound` must be non-zero
    fn next_below(&mut self, bound: usize) -> usize;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_in_range<T>(&mut self, low: T, high: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        self.gen_range(low..=high)
    }

    fn next_below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Pick the seed for a run: the configured one, or a fresh one from entropy
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => StdRng::from_entropy().next_u64(),
    }
}

/// Create a new RNG with a specific seed
pub fn create_seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derive the seed of the `index`-th independent run from a base seed.
///
/// Uses the splitmix64 finalizer so neighbouring indices land far apart.
pub fn partition_seed(base: u64, index: usize) -> u64 {
    let step = (index as u64)
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut z = base.wrapping_add(step);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
