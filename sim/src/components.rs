//! ECS Components for the wildfire simulation.
//!
//! Components are pure data containers attached to plant entities.
//! All fire logic lives in systems that query these components.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 3D position in the world (x = east/west, y = height, z = north/south).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Shift this point along the ground plane.
    pub fn offset_xz(&self, dx: f32, dz: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
            z: self.z + dz,
        }
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Monotonic plant identifier handed out by the population manager.
/// Used for naming and diagnostics only; ECS entities are the real handles.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlantId(pub u64);

// ============================================================================
// FIRE COMPONENTS
// ============================================================================

/// Burn state of a plant.
///
/// `Normal -> Burning -> Burnt`, with `Burning -> Normal` allowed when a fire
/// is put out. Nothing ever leaves `Burnt`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantState {
    #[default]
    Normal,
    Burning,
    Burnt,
}

impl PlantState {
    pub fn is_flammable(&self) -> bool {
        matches!(self, PlantState::Normal)
    }

    pub fn is_burning(&self) -> bool {
        matches!(self, PlantState::Burning)
    }
}

/// Size multiplier sampled once at creation. Scales health, spread radius
/// and ignition chance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantSize(pub f32);

impl Default for PlantSize {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Remaining burn budget of a plant.
///
/// While burning this is the fuel left; while normal it regrows toward `max`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantHealth {
    pub current: f32,
    pub max: f32,
}

impl PlantHealth {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Fraction of the burn budget left (1 = untouched, 0 = consumed).
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn heal(&mut self, amount: f32) {
        if self.current < self.max {
            self.current = (self.current + amount).min(self.max);
        }
    }

    pub fn consume(&mut self, amount: f32) {
        self.current -= amount;
    }

    pub fn clamp_to_max(&mut self) {
        if self.current > self.max {
            self.current = self.max;
        }
    }
}

impl Default for PlantHealth {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Normal plants within reach of this plant's fire.
///
/// Rebuilt when the plant starts burning and on explicit request only, so it
/// can go stale between rebuilds. Entries may point at despawned plants;
/// lookups of those simply come back empty.
#[derive(Component, Debug, Clone, Default)]
pub struct NeighborCache(pub Vec<Entity>);

impl NeighborCache {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Plants this plant has set on fire. Diagnostics only.
#[derive(Component, Debug, Clone, Default)]
pub struct IgnitionLog(pub Vec<Entity>);

impl IgnitionLog {
    pub fn record(&mut self, target: Entity) {
        if !self.0.contains(&target) {
            self.0.push(target);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning a complete plant entity.
#[derive(Bundle, Default)]
pub struct PlantBundle {
    pub id: PlantId,
    pub position: Position,
    pub size: PlantSize,
    pub health: PlantHealth,
    pub state: PlantState,
    pub neighbors: NeighborCache,
    pub ignited: IgnitionLog,
}

impl PlantBundle {
    /// A fresh, unburnt plant with full health for its size.
    pub fn new(id: u64, position: Position, size: f32, base_health: f32) -> Self {
        Self {
            id: PlantId(id),
            position,
            size: PlantSize(size),
            health: PlantHealth::new(base_health * size),
            state: PlantState::Normal,
            neighbors: NeighborCache::default(),
            ignited: IgnitionLog::default(),
        }
    }
}
