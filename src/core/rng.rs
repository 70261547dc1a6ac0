//! Core domain: seedable randomness for cosmetic effects.
//!
//! Particle directions never feed back into physics, but they are still
//! drawn from a per-character seeded stream so a replayed input sequence
//! reproduces the exact event stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Particle emission angles (radians) attached to an event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleSpray {
    pub angles: Vec<f32>,
}

impl ParticleSpray {
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CosmeticRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl CosmeticRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from the original seed.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Draw `count` angles spread uniformly within `spread` radians of `center`.
    pub fn spray(&mut self, count: usize, center: f32, spread: f32) -> ParticleSpray {
        let half = spread.abs() * 0.5;
        let angles = (0..count)
            .map(|_| {
                if half > 0.0 {
                    center + self.rng.random_range(-half..half)
                } else {
                    center
                }
            })
            .collect();
        ParticleSpray { angles }
    }
}
