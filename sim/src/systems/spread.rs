//! Fire reach geometry and the per-trial ignition chance.
//!
//! Wind acts twice: it widens the reach of a fire, and it shifts the sphere
//! used to find neighbors downwind. The chance formula then tapers with
//! distance through a signed cosine, so beyond the potential radius the chance
//! goes negative and the trial cannot succeed.

use crate::components::Position;
use crate::config::PlantConfig;
use crate::environment::Wind;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Golden ratio, used to stretch reach along the wind.
pub const PHI: f32 = 1.618_034;

/// Wind- and size-derived fire geometry for one plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireReach {
    /// Center of the neighbor query sphere, shifted downwind.
    pub center: Position,
    /// Radius of the neighbor query sphere.
    pub spread_radius: f32,
    /// Extra reach contributed by wind.
    pub wind_bonus_radius: f32,
    /// Distance from the plant at which the ignition chance reaches zero.
    pub potential_radius: f32,
}

impl FireReach {
    pub fn new(position: Position, size: f32, config: &PlantConfig, wind: &Wind) -> Self {
        let base_radius = config.base_fire_spread_radius * size;
        let wind_bonus_radius = base_radius * wind.speed;
        let spread_radius = base_radius + wind_bonus_radius;
        let potential_radius = spread_radius + wind_bonus_radius * PHI;

        let (dx, dz) = wind.direction_vector();
        let shift = wind_bonus_radius * PHI;

        Self {
            center: position.offset_xz(dx * shift, dz * shift),
            spread_radius,
            wind_bonus_radius,
            potential_radius,
        }
    }
}

/// The burning side of an ignition trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadSource {
    pub position: Position,
    pub size: f32,
    /// Health fraction left: 1 = just ignited, 0 = about to go out.
    pub fire_progress: f32,
    pub reach: FireReach,
}

/// Chance, on a 0-100 scale, that `source` ignites a plant of `target_size`
/// at `target` during a tick covering `elapsed` simulated seconds.
///
/// `elapsed` is the wall-clock delta already multiplied by simulation speed.
pub fn ignition_chance(
    config: &PlantConfig,
    source: &SpreadSource,
    target: &Position,
    target_size: f32,
    elapsed: f32,
) -> f32 {
    let potential = source.reach.potential_radius;
    if potential.is_nan() || potential <= 0.0 {
        return 0.0;
    }

    // Saturate the cosine phase at pi so the chance stays negative past the
    // potential radius instead of climbing back up.
    let normalized_distance =
        (source.position.distance_squared(target) / (potential * potential)).min(1.0);
    let size_delta = source.size - target_size;

    let chance = config.base_fire_chance
        + config.base_fire_chance * config.wind_fire_chance_multiplier
        + size_delta;

    chance
        * PHI
        * (normalized_distance * PI).cos()
        * source.size
        * elapsed
        * config
            .fire_lifetime_curve
            .evaluate(1.0 - source.fire_progress)
}
