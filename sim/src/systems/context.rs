//! Shared fire operations over the plant population.
//!
//! `FireContext` bundles everything a burn-state transition touches. The tick
//! system uses it directly; the driver surface borrows it from the world
//! through a `SystemState`, so both paths run the same transition code.

use crate::components::*;
use crate::config::FireConfig;
use crate::environment::Wind;
use crate::rng::FireRng;
use crate::spatial::SpatialGrid;
use crate::systems::events::{FireEventBuffer, FireEventKind};
use crate::systems::spread::{ignition_chance, FireReach, SpreadSource};
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use tracing::debug;

/// Components of a plant, in query order.
pub type PlantData = (
    Entity,
    &'static PlantId,
    &'static Position,
    &'static PlantSize,
    &'static mut PlantHealth,
    &'static mut PlantState,
    &'static mut NeighborCache,
    &'static mut IgnitionLog,
);

/// System parameter for reading and mutating plant fire state.
#[derive(SystemParam)]
pub struct FireContext<'w, 's> {
    pub grid: Res<'w, SpatialGrid>,
    pub wind: Res<'w, Wind>,
    pub config: Res<'w, FireConfig>,
    pub events: ResMut<'w, FireEventBuffer>,
    pub plants: Query<'w, 's, PlantData>,
}

impl FireContext<'_, '_> {
    pub fn state_of(&self, entity: Entity) -> Option<PlantState> {
        self.plants
            .get(entity)
            .ok()
            .map(|(_, _, _, _, _, state, _, _)| *state)
    }

    fn id_of(&self, entity: Entity) -> Option<u64> {
        self.plants.get(entity).ok().map(|(_, id, ..)| id.0)
    }

    /// Current fire geometry of a plant under the current wind.
    pub fn reach_of(&self, entity: Entity) -> Option<FireReach> {
        let (_, _, position, size, ..) = self.plants.get(entity).ok()?;
        Some(FireReach::new(*position, size.0, &self.config.plant, &self.wind))
    }

    /// Normal plants inside the (downwind-shifted) reach sphere, nearest first.
    pub fn normal_neighbors(&self, reach: &FireReach) -> Vec<Entity> {
        self.grid
            .query_sphere(reach.center, reach.spread_radius)
            .into_iter()
            .map(|entry| entry.entity)
            .filter(|entity| self.state_of(*entity).is_some_and(|s| s.is_flammable()))
            .collect()
    }

    /// Rebuild a plant's neighbor cache. Returns the new neighbor count.
    pub fn rebuild_neighbors(&mut self, entity: Entity) -> Option<usize> {
        let reach = self.reach_of(entity)?;
        let neighbors = self.normal_neighbors(&reach);
        let count = neighbors.len();
        let (_, _, _, _, _, _, mut cache, _) = self.plants.get_mut(entity).ok()?;
        cache.0 = neighbors;
        Some(count)
    }

    /// Set a Normal or Burning plant on fire. Re-igniting a burning plant only
    /// rebuilds its neighbor cache. Burnt plants are left alone.
    pub fn ignite(&mut self, entity: Entity, source: Option<Entity>) -> bool {
        let was_normal = {
            let Ok((_, _, _, _, _, mut state, _, _)) = self.plants.get_mut(entity) else {
                return false;
            };
            match *state {
                PlantState::Burnt => return false,
                PlantState::Burning => false,
                PlantState::Normal => {
                    *state = PlantState::Burning;
                    true
                }
            }
        };

        let neighbors = self.rebuild_neighbors(entity).unwrap_or(0);
        if !was_normal {
            return true;
        }

        if let Some(src) = source {
            if let Ok((.., mut log)) = self.plants.get_mut(src) {
                log.record(entity);
            }
        }

        let plant = self.id_of(entity).unwrap_or_default();
        let source_id = source.and_then(|s| self.id_of(s));
        self.events.push(FireEventKind::Ignited, plant, source_id);
        debug!(plant, source = ?source_id, neighbors, "plant ignited");
        true
    }

    /// Put out a burning plant. Its remaining health is kept and regrows.
    pub fn extinguish(&mut self, entity: Entity) -> bool {
        let Ok((_, id, _, _, _, mut state, _, mut log)) = self.plants.get_mut(entity) else {
            return false;
        };
        if *state != PlantState::Burning {
            return false;
        }
        *state = PlantState::Normal;
        log.clear();

        let plant = id.0;
        self.events.push(FireEventKind::Extinguished, plant, None);
        debug!(plant, "plant extinguished");
        true
    }

    /// Flip between Normal and Burning. Returns the resulting state.
    pub fn toggle(&mut self, entity: Entity) -> Option<PlantState> {
        match self.state_of(entity)? {
            PlantState::Normal => {
                self.ignite(entity, None);
            }
            PlantState::Burning => {
                self.extinguish(entity);
            }
            PlantState::Burnt => {}
        }
        self.state_of(entity)
    }

    /// Regrow a plant that is not burning.
    pub fn regrow(&mut self, entity: Entity, elapsed: f32) {
        let amount = elapsed * self.config.plant.regrowth_rate;
        if let Ok((_, _, _, _, mut health, _, _, _)) = self.plants.get_mut(entity) {
            health.heal(amount);
            health.clamp_to_max();
        }
    }

    /// Advance a burning plant: consume fuel, burn out, or try to ignite each
    /// cached neighbor that is still Normal. Returns true while it keeps
    /// burning.
    pub fn burn(&mut self, entity: Entity, elapsed: f32, rng: &mut FireRng) -> bool {
        let burn_rate = self.config.plant.burn_rate;

        let (source, neighbors) = {
            let Ok((_, id, position, size, mut health, mut state, cache, _)) =
                self.plants.get_mut(entity)
            else {
                return false;
            };
            if *state != PlantState::Burning {
                return false;
            }
            // Paused: no fuel is used and nothing changes state.
            if elapsed <= 0.0 {
                return true;
            }

            health.consume(elapsed * burn_rate);
            if health.current <= 0.0 {
                health.current = 0.0;
                *state = PlantState::Burnt;
                let plant = id.0;
                self.events.push(FireEventKind::Burnt, plant, None);
                debug!(plant, "plant burnt out");
                return false;
            }
            health.clamp_to_max();

            let source = SpreadSource {
                position: *position,
                size: size.0,
                fire_progress: health.fraction(),
                reach: FireReach::new(*position, size.0, &self.config.plant, &self.wind),
            };
            (source, cache.0.clone())
        };

        for neighbor in neighbors {
            let chance = match self.plants.get(neighbor) {
                Ok((_, _, position, size, _, state, _, _)) if *state == PlantState::Normal => {
                    ignition_chance(&self.config.plant, &source, position, size.0, elapsed)
                }
                _ => continue,
            };
            if rng.percent() < chance {
                self.ignite(neighbor, Some(entity));
            }
        }
        true
    }
}
