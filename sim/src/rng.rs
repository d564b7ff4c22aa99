//! Seeded simulation RNG.
//!
//! Wraps `ChaCha8Rng` so a given seed replays the same placements and
//! ignition rolls.

use bevy_ecs::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Resource holding the simulation's random number generator.
#[derive(Resource, Debug, Clone)]
pub struct FireRng(pub ChaCha8Rng);

impl FireRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uniform sample in `[lo, hi)`, or `lo` when the range is empty.
    pub fn between(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.0.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Percent roll in `[0, 100)` for ignition trials.
    pub fn percent(&mut self) -> f32 {
        self.0.gen_range(0.0..100.0)
    }
}

impl Default for FireRng {
    fn default() -> Self {
        Self::from_seed_u64(0)
    }
}
