//! Per-instance random draws.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws for the transformer.
///
/// Ranges are computed by hand as `min + u * (max - min)` instead of going
/// through `rand`'s range sampling, which panics on empty or non-finite
/// ranges. With this shape any control value is safe on the audio thread.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform draw between `min` and `max`.
    #[inline]
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// Uniform draw in `[0, 100)`.
    #[inline]
    fn percent(&mut self) -> f32 {
        self.uniform(0.0, 100.0)
    }
}

/// The generator each plugin instance owns.
pub struct JitterRng {
    rng: SmallRng,
}

impl JitterRng {
    /// Deterministic generator, for tests and offline rendering.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the system clock.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(seed)
    }
}

impl RandomSource for JitterRng {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
#[cfg(test)]
pub(crate) struct Scripted {
    draws: Vec<f32>,
    next: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(draws: &[f32]) -> Self {
        Self {
            draws: draws.to_vec(),
            next: 0,
        }
    }

    /// Number of draws taken so far.
    pub fn taken(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn next_unit(&mut self) -> f32 {
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        draw
    }
}
