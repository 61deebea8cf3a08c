//! Random sources for reel simulation
//!
//! Every draw the engine makes goes through [`RandomSource`], so a run can be
//! driven by a seeded generator, OS entropy, or a scripted sequence in tests.
//! Parallel runs never share a source: a [`SourceFactory`] hands each shard
//! its own instance.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::{SimError, SimResult};

/// Uniform natural integers in `[0, max)`
pub trait RandomSource {
    /// Draw a value in `[0, max)`. `max == 0` is rejected.
    fn next(&mut self, max: u64) -> SimResult<u64>;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next(&mut self, max: u64) -> SimResult<u64> {
        (**self).next(max)
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn next(&mut self, max: u64) -> SimResult<u64> {
        (**self).next(max)
    }
}

/// [`RandomSource`] backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    #[inline]
    fn next(&mut self, max: u64) -> SimResult<u64> {
        if max == 0 {
            return Err(SimError::argument("random bound must be positive"));
        }
        Ok(self.rng.random_range(0..max))
    }
}

/// Default source: ChaCha8 (fast, reproducible, not for security use)
pub type ChaChaSource = RngSource<ChaCha8Rng>;

impl ChaChaSource {
    /// Reproducible source from a seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Non-deterministic source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_os_rng())
    }

    /// Seeded source on an independent ChaCha stream
    pub fn seeded_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self::new(rng)
    }
}

/// Scripted source that replays a fixed list of draws
///
/// Each value is reduced modulo the requested bound, and the list wraps
/// around when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<u64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<u64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next(&mut self, max: u64) -> SimResult<u64> {
        if max == 0 {
            return Err(SimError::argument("random bound must be positive"));
        }
        if self.values.is_empty() {
            return Err(SimError::argument("sequence source has no values"));
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        Ok(value % max)
    }
}

/// Creates one independent [`RandomSource`] per worker shard
pub trait SourceFactory: Sync {
    type Source: RandomSource + Send;

    fn source_for_shard(&self, shard: u64) -> Self::Source;
}

/// ChaCha factory: seeded runs put each shard on its own stream of the
/// master seed, unseeded runs pull fresh OS entropy per shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeededSourceFactory {
    seed: Option<u64>,
}

impl SeededSourceFactory {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn entropy() -> Self {
        Self { seed: None }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl SourceFactory for SeededSourceFactory {
    type Source = ChaChaSource;

    fn source_for_shard(&self, shard: u64) -> ChaChaSource {
        match self.seed {
            Some(seed) => ChaChaSource::seeded_stream(seed, shard),
            None => ChaChaSource::from_entropy(),
        }
    }
}

/// Adapts a closure `Fn(shard) -> source` into a [`SourceFactory`]
pub struct FnSourceFactory<F>(pub F);

impl<F, S> SourceFactory for FnSourceFactory<F>
where
    F: Fn(u64) -> S + Sync,
    S: RandomSource + Send,
{
    type Source = S;

    fn source_for_shard(&self, shard: u64) -> S {
        (self.0)(shard)
    }
}
