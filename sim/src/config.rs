//! Simulation configuration.
//!
//! `FireConfig` is inserted into the ECS world as a resource. Every field has
//! a default, so partial JSON documents are accepted.

use crate::curve::SpreadCurve;
use crate::systems::events::DEFAULT_EVENT_CAPACITY;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-plant-type fire parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Seconds a size-1 plant burns for.
    pub base_health: f32,
    /// Radius around a size-1 plant that its fire can reach with no wind.
    pub base_fire_spread_radius: f32,
    /// Spread chance with no wind, on a 0-100 scale per simulated second.
    pub base_fire_chance: f32,
    /// Extra chance contributed by wind (0.5 = 1.5x, 1 = 2x, 2 = 3x).
    pub wind_fire_chance_multiplier: f32,
    /// Range the size multiplier is sampled from at creation.
    pub size_range: (f32, f32),
    /// Health regained per simulated second while not burning.
    pub regrowth_rate: f32,
    /// Health consumed per simulated second while burning.
    pub burn_rate: f32,
    /// Spread multiplier over the burned fraction of a fire (0 fresh, 1 spent).
    pub fire_lifetime_curve: SpreadCurve,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            base_health: 10.0,
            base_fire_spread_radius: 7.0,
            base_fire_chance: 3.0,
            wind_fire_chance_multiplier: 1.0,
            size_range: (0.8, 1.2),
            regrowth_rate: 0.5,
            burn_rate: 1.0,
            fire_lifetime_curve: SpreadCurve::default(),
        }
    }
}

/// Configuration for the whole simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    pub plant: PlantConfig,
    /// Seed for the simulation RNG.
    pub rng_seed: u64,
    /// Size of spatial grid cells in world units.
    pub spatial_cell_size: f32,
    /// Plants created by `FireSim::new_default_world`.
    pub initial_plant_count: usize,
    /// Fire events held between snapshots before the oldest are dropped.
    pub event_capacity: usize,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            plant: PlantConfig::default(),
            rng_seed: 0x5EED_F1AE,
            spatial_cell_size: 10.0,
            initial_plant_count: 500,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl FireConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(data: &str) -> Result<Self, serde_json::Error> {
        let config: FireConfig = serde_json::from_str(data)?;
        Ok(config.sanitized())
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace values the simulation cannot work with by usable ones.
    pub fn sanitized(mut self) -> Self {
        let defaults = PlantConfig::default();
        let plant = &mut self.plant;

        plant.base_health = non_negative(plant.base_health, defaults.base_health);
        plant.base_fire_spread_radius =
            non_negative(plant.base_fire_spread_radius, defaults.base_fire_spread_radius);
        if !plant.base_fire_chance.is_finite() {
            plant.base_fire_chance = defaults.base_fire_chance;
        }
        if !plant.wind_fire_chance_multiplier.is_finite() {
            plant.wind_fire_chance_multiplier = defaults.wind_fire_chance_multiplier;
        }
        plant.regrowth_rate = non_negative(plant.regrowth_rate, defaults.regrowth_rate);
        plant.burn_rate = non_negative(plant.burn_rate, defaults.burn_rate);

        let (lo, hi) = plant.size_range;
        plant.size_range = if lo.is_finite() && hi.is_finite() && lo > 0.0 && hi > 0.0 {
            (lo.min(hi), lo.max(hi))
        } else {
            defaults.size_range
        };

        if !(self.spatial_cell_size.is_finite() && self.spatial_cell_size > 0.0) {
            self.spatial_cell_size = FireConfig::default().spatial_cell_size;
        }
        self
    }
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}
