use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the randomness a puzzle consumes.
///
/// Injected into the puzzle so tests can replay exact sequences.
pub trait RandomSource {
    /// A value in `min..max`. When the range is empty, `min`.
    fn next(&mut self, min: i32, max: i32) -> i32;
}

impl<R> RandomSource for &mut R
where
    R: RandomSource + ?Sized,
{
    fn next(&mut self, min: i32, max: i32) -> i32 {
        (**self).next(min, max)
    }
}

impl RandomSource for Box<dyn RandomSource> {
    fn next(&mut self, min: i32, max: i32) -> i32 {
        (**self).next(min, max)
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<ChaCha8Rng> {
    /// A reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.0.gen_range(min..max)
    }
}

/// Replays a fixed sequence of values, then falls back to a seeded generator.
///
/// Scripted values outside the requested range are discarded.
#[derive(Debug, Clone)]
pub struct Scripted {
    values: VecDeque<i32>,
    fallback: RngSource<ChaCha8Rng>,
}

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: RngSource::seeded(0),
        }
    }

    pub fn with_fallback_seed(mut self, seed: u64) -> Self {
        self.fallback = RngSource::seeded(seed);
        self
    }

    /// Append more values to the end of the script.
    pub fn push(&mut self, values: impl IntoIterator<Item = i32>) {
        self.values.extend(values);
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for Scripted {
    fn next(&mut self, min: i32, max: i32) -> i32 {
        while let Some(value) = self.values.pop_front() {
            if (min..max).contains(&value) {
                return value;
            }
        }
        self.fallback.next(min, max)
    }
}
