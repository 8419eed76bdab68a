//! Randomness used by the rule engine.
//!
//! The engine makes three kinds of random choice: which scripted line to use
//! for a fallback, the order in which a rule's decompositions are tried, and
//! which reply template of a decomposition is filled. All of them go through
//! [`RandomSource`] so callers can pin the choices down (a seeded generator,
//! or a scripted source in tests) without the algorithm changing.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// A uniformly distributed index in `0..len`. `len` is never zero.
    fn below(&mut self, len: usize) -> usize;

    /// A uniformly shuffled permutation of `0..len` (Fisher–Yates).
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = self.below(i + 1);
            indices.swap(i, j);
        }
        indices
    }

    /// A uniformly chosen element of `items`, or `None` when it is empty.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() { None } else { items.get(self.below(items.len())) }
    }
}

/// A [`RandomSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<ThreadRng> {
    /// The process-wide thread-local generator.
    pub fn thread() -> Self {
        RngSource::new(rand::thread_rng())
    }
}

impl Default for RngSource<ThreadRng> {
    fn default() -> Self {
        RngSource::thread()
    }
}

impl RngSource<StdRng> {
    /// A deterministic generator, for reproducible conversations and tests.
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn below(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
