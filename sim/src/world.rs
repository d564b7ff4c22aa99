//! Snapshot types.
//!
//! The `Snapshot` struct provides a serializable view of the simulation state
//! that a host renderer can consume after each tick.

use crate::components::*;
use crate::environment::{SimulationSpeed, Wind};
use crate::systems::events::{FireEvent, FireEventBuffer};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single plant's state for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
    pub state: PlantState,
    pub health: f32,
    pub health_max: f32,
    pub neighbor_count: usize,
    /// Ids of the plants this one set on fire.
    pub ignited: Vec<u64>,
}

/// Number of plants in each burn state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub normal: usize,
    pub burning: usize,
    pub burnt: usize,
}

impl StateCounts {
    pub fn total(&self) -> usize {
        self.normal + self.burning + self.burnt
    }

    pub fn add(&mut self, state: PlantState) {
        match state {
            PlantState::Normal => self.normal += 1,
            PlantState::Burning => self.burning += 1,
            PlantState::Burnt => self.burnt += 1,
        }
    }

    /// Count the plants currently in `world`.
    pub fn from_world(world: &mut World) -> Self {
        let mut counts = Self::default();
        let mut query = world.query::<&PlantState>();
        for state in query.iter(world) {
            counts.add(*state);
        }
        counts
    }
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulated time in seconds.
    pub time: f32,
    pub simulation_speed: f32,
    pub wind_speed: f32,
    /// Wind heading as a compass bearing in degrees.
    pub wind_bearing: f32,
    /// All plants, ordered by id.
    pub plants: Vec<PlantSnapshot>,
    pub counts: StateCounts,
    /// Fire events since the previous snapshot.
    pub events: Vec<FireEvent>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world. Drains the fire event buffer.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let mut plants = Vec::new();
        let mut counts = StateCounts::default();

        let mut query = world.query::<(
            &PlantId,
            &Position,
            &PlantSize,
            &PlantHealth,
            &PlantState,
            &NeighborCache,
            &IgnitionLog,
        )>();

        for (id, pos, size, health, state, neighbors, ignited) in query.iter(world) {
            counts.add(*state);
            plants.push(PlantSnapshot {
                id: id.0,
                x: pos.x,
                y: pos.y,
                z: pos.z,
                size: size.0,
                state: *state,
                health: health.current,
                health_max: health.max,
                neighbor_count: neighbors.len(),
                ignited: ignited
                    .0
                    .iter()
                    .filter_map(|e| world.get::<PlantId>(*e).map(|id| id.0))
                    .collect(),
            });
        }
        plants.sort_by_key(|p| p.id);

        let simulation_speed = world
            .get_resource::<SimulationSpeed>()
            .map(|s| s.0)
            .unwrap_or(1.0);
        let wind = world.get_resource::<Wind>().copied().unwrap_or_default();
        let events = world
            .get_resource_mut::<FireEventBuffer>()
            .map(|mut buffer| buffer.drain())
            .unwrap_or_default();

        Self {
            tick,
            time,
            simulation_speed,
            wind_speed: wind.speed,
            wind_bearing: wind.bearing_degrees(),
            plants,
            counts,
            events,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
