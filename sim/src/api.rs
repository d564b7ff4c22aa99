//! Public API for the simulation.
//!
//! `FireSim` owns the ECS world and the plant population. A host drives it by
//! calling `tick(dt)` at whatever cadence it likes and issuing population
//! and pointer operations between ticks.

use crate::components::*;
use crate::config::{FireConfig, PlantConfig};
use crate::environment::{DeltaTime, SimulationSpeed, Wind};
use crate::rng::FireRng;
use crate::spatial::SpatialGrid;
use crate::systems::context::FireContext;
use crate::systems::events::FireEventBuffer;
use crate::systems::spread::FireReach;
use crate::systems::tick::plant_tick_system;
use crate::terrain::{FlatGround, GroundSampler, TerrainGrid};
use crate::world::{Snapshot, StateCounts};
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use rand::seq::SliceRandom;
use tracing::{debug, info};

/// Tool the host pointer is currently bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerMode {
    #[default]
    None,
    Add,
    Remove,
    ToggleFire,
}

/// What a host-side pick under the pointer resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHit {
    Nothing,
    Terrain,
    Plant(Entity),
}

/// Result of a pointer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    Added(Entity),
    Removed,
    Toggled(PlantState),
    Ignored,
}

/// The plant population manager.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Creating and destroying the population
/// - Stepping the simulation forward
/// - Igniting, extinguishing and inspecting plants
/// - Extracting state snapshots
pub struct FireSim {
    world: World,
    schedule: Schedule,
    fire_state: SystemState<FireContext<'static, 'static>>,
    terrain: Box<dyn GroundSampler>,
    tick: u64,
    time: f32,
    /// Next `PlantId`. Never reused, even across regenerations.
    plant_counter: u64,
    /// Speed to restore on `resume`.
    paused_speed: Option<f32>,
}

impl FireSim {
    /// Create an empty simulation on flat ground.
    pub fn new() -> Self {
        Self::with_config(FireConfig::default())
    }

    /// Create an empty simulation on flat ground with custom configuration.
    pub fn with_config(config: FireConfig) -> Self {
        Self::with_terrain(config, FlatGround::new(100.0, 100.0))
    }

    /// Create an empty simulation standing on `terrain`.
    pub fn with_terrain(config: FireConfig, terrain: impl GroundSampler + 'static) -> Self {
        let config = config.sanitized();
        let mut world = World::new();

        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(SimulationSpeed::default());
        world.insert_resource(Wind::default());
        world.insert_resource(FireRng::from_seed_u64(config.rng_seed));
        world.insert_resource(SpatialGrid::new(config.spatial_cell_size));
        world.insert_resource(FireEventBuffer::with_capacity(config.event_capacity));
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems(plant_tick_system);

        let fire_state = SystemState::new(&mut world);

        Self {
            world,
            schedule,
            fire_state,
            terrain: Box::new(terrain),
            tick: 0,
            time: 0.0,
            plant_counter: 1,
            paused_speed: None,
        }
    }

    /// Create a world on rolling hills populated with the configured initial
    /// plant count.
    pub fn new_default_world() -> Self {
        let config = FireConfig::default();
        let count = config.initial_plant_count;
        let mut sim = Self::with_terrain(config, TerrainGrid::rolling_hills(101, 101, 2.0, 4.0));
        sim.regenerate(count);
        sim
    }

    /// Step the simulation forward by `dt` wall-clock seconds.
    ///
    /// Every plant is advanced once by `dt` scaled by the simulation speed.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if let Some(mut dt_res) = self.world.get_resource_mut::<DeltaTime>() {
            dt_res.0 = dt;
        }

        self.schedule.run(&mut self.world);

        self.tick += 1;
        self.time += self.simulation_speed() * dt;
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    /// Replace the population with `count` plants scattered uniformly over
    /// the terrain. Returns the number created.
    pub fn regenerate(&mut self, count: usize) -> usize {
        self.destroy_all();

        let bounds = self.terrain.bounds();
        let mut placements = Vec::with_capacity(count);
        {
            let mut rng = self.rng_mut();
            for _ in 0..count {
                let x = rng.between(bounds.min_x, bounds.max_x);
                let z = rng.between(bounds.min_z, bounds.max_z);
                placements.push((x, z));
            }
        }

        for (x, z) in placements {
            self.spawn_plant_at(x, z);
        }

        info!(count, "regenerated plants");
        count
    }

    /// Despawn every plant. Returns the number removed.
    pub fn destroy_all(&mut self) -> usize {
        let plants = self.plants();
        let count = plants.len();
        for entity in plants {
            self.world.despawn(entity);
        }
        if let Some(mut grid) = self.world.get_resource_mut::<SpatialGrid>() {
            grid.clear();
        }
        if let Some(mut events) = self.world.get_resource_mut::<FireEventBuffer>() {
            events.clear();
        }

        if count > 0 {
            info!(count, "destroyed plants");
        }
        count
    }

    /// Ignite up to `count` distinct Normal plants chosen uniformly at random.
    /// Returns the number ignited.
    pub fn ignite_random(&mut self, count: usize) -> usize {
        let mut normal: Vec<Entity> = self
            .world
            .query::<(Entity, &PlantState)>()
            .iter(&self.world)
            .filter(|(_, state)| state.is_flammable())
            .map(|(entity, _)| entity)
            .collect();

        let amount = count.min(normal.len());
        if amount == 0 {
            return 0;
        }

        let chosen = {
            let mut rng = self.rng_mut();
            let (picked, _) = normal.partial_shuffle(&mut rng.0, amount);
            picked.to_vec()
        };

        let ignited = self.with_fire(|fire| {
            let mut ignited = 0;
            for entity in chosen {
                if fire.ignite(entity, None) {
                    ignited += 1;
                }
            }
            ignited
        });

        info!(requested = count, ignited, "ignited random plants");
        ignited
    }

    /// Rebuild the neighbor cache of every burning plant so it sees plants
    /// added since it caught fire. Returns the number rebuilt.
    pub fn recompute_burning_neighbors(&mut self) -> usize {
        let burning: Vec<Entity> = self
            .world
            .query::<(Entity, &PlantState)>()
            .iter(&self.world)
            .filter(|(_, state)| state.is_burning())
            .map(|(entity, _)| entity)
            .collect();

        let rebuilt = self.with_fire(|fire| {
            burning
                .iter()
                .filter_map(|entity| fire.rebuild_neighbors(*entity))
                .count()
        });

        debug!(rebuilt, "recomputed burning neighbors");
        rebuilt
    }

    /// Spawn one plant standing on the terrain at `(x, z)`.
    pub fn spawn_plant_at(&mut self, x: f32, z: f32) -> Entity {
        let plant = self.plant_config();
        let size = {
            let (lo, hi) = plant.size_range;
            self.rng_mut().between(lo, hi)
        };
        let position = Position::new(x, self.terrain.height_at(x, z), z);

        let id = self.plant_counter;
        self.plant_counter += 1;

        let entity = self
            .world
            .spawn(PlantBundle::new(id, position, size, plant.base_health))
            .id();
        if let Some(mut grid) = self.world.get_resource_mut::<SpatialGrid>() {
            grid.insert(entity, position);
        }
        entity
    }

    /// Despawn a single plant. Neighbor caches that still hold it are left as
    /// they are; the stale id simply resolves to nothing.
    pub fn remove_plant(&mut self, entity: Entity) -> bool {
        if self.world.get::<PlantId>(entity).is_none() {
            return false;
        }
        if let Some(mut grid) = self.world.get_resource_mut::<SpatialGrid>() {
            grid.remove(entity);
        }
        let removed = self.world.despawn(entity);
        debug!(?entity, "removed plant");
        removed
    }

    pub fn ignite_plant(&mut self, entity: Entity) -> bool {
        self.with_fire(|fire| fire.ignite(entity, None))
    }

    pub fn extinguish_plant(&mut self, entity: Entity) -> bool {
        self.with_fire(|fire| fire.extinguish(entity))
    }

    /// Flip a plant between Normal and Burning. Burnt plants stay burnt.
    pub fn toggle_plant_fire(&mut self, entity: Entity) -> Option<PlantState> {
        self.with_fire(|fire| fire.toggle(entity))
    }

    /// Nearest plant within `radius` of `point`.
    pub fn pick_plant(&self, point: Position, radius: f32) -> Option<Entity> {
        self.world
            .get_resource::<SpatialGrid>()?
            .nearest(point, radius)
            .map(|entry| entry.entity)
    }

    /// Apply the pointer tool `mode` to whatever the host picked at `point`.
    pub fn point_operation(
        &mut self,
        point: Position,
        mode: PointerMode,
        hit: PointerHit,
    ) -> PointOutcome {
        match (mode, hit) {
            (PointerMode::Add, PointerHit::Terrain) => {
                let entity = self.spawn_plant_at(point.x, point.z);
                self.recompute_burning_neighbors();
                PointOutcome::Added(entity)
            }
            (PointerMode::Remove, PointerHit::Plant(entity)) => {
                if self.remove_plant(entity) {
                    PointOutcome::Removed
                } else {
                    PointOutcome::Ignored
                }
            }
            (PointerMode::ToggleFire, PointerHit::Plant(entity)) => self
                .toggle_plant_fire(entity)
                .map(PointOutcome::Toggled)
                .unwrap_or(PointOutcome::Ignored),
            _ => PointOutcome::Ignored,
        }
    }

    // ------------------------------------------------------------------
    // Speed and wind
    // ------------------------------------------------------------------

    /// Set the simulation speed. Negative values are clamped to 0.
    pub fn set_simulation_speed(&mut self, speed: f32) {
        let speed = SimulationSpeed::new(speed);
        self.paused_speed = None;
        self.world.insert_resource(speed);
        debug!(speed = speed.0, "simulation speed set");
    }

    pub fn simulation_speed(&self) -> f32 {
        self.world
            .get_resource::<SimulationSpeed>()
            .map(|s| s.0)
            .unwrap_or(1.0)
    }

    pub fn is_paused(&self) -> bool {
        self.simulation_speed() <= 0.0
    }

    /// Pause, remembering the current speed.
    pub fn pause(&mut self) {
        if self.is_paused() {
            return;
        }
        let previous = self.simulation_speed();
        self.world.insert_resource(SimulationSpeed(0.0));
        self.paused_speed = Some(previous);
        debug!(previous, "paused");
    }

    /// Resume at the speed in effect before `pause`, or 1 if none is known.
    pub fn resume(&mut self) {
        if !self.is_paused() {
            return;
        }
        let speed = self.paused_speed.take().unwrap_or(1.0);
        self.world.insert_resource(SimulationSpeed::new(speed));
        debug!(speed, "resumed");
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.is_paused()
    }

    /// Set wind from a speed and compass bearing (0 = +z, 90 = +x).
    pub fn set_wind(&mut self, speed: f32, bearing_degrees: f32) {
        self.world
            .insert_resource(Wind::from_bearing(speed, bearing_degrees));
    }

    pub fn wind(&self) -> Wind {
        self.world.get_resource::<Wind>().copied().unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// All live plants.
    pub fn plants(&mut self) -> Vec<Entity> {
        self.world
            .query_filtered::<Entity, With<PlantId>>()
            .iter(&self.world)
            .collect()
    }

    pub fn plant_count(&mut self) -> usize {
        self.world
            .query_filtered::<Entity, With<PlantId>>()
            .iter(&self.world)
            .count()
    }

    pub fn plant_by_id(&mut self, id: u64) -> Option<Entity> {
        self.world
            .query::<(Entity, &PlantId)>()
            .iter(&self.world)
            .find(|(_, plant_id)| plant_id.0 == id)
            .map(|(entity, _)| entity)
    }

    pub fn plant_state(&self, entity: Entity) -> Option<PlantState> {
        self.world.get::<PlantState>(entity).copied()
    }

    pub fn plant_health(&self, entity: Entity) -> Option<PlantHealth> {
        self.world.get::<PlantHealth>(entity).copied()
    }

    pub fn plant_size(&self, entity: Entity) -> Option<f32> {
        self.world.get::<PlantSize>(entity).map(|s| s.0)
    }

    pub fn plant_position(&self, entity: Entity) -> Option<Position> {
        self.world.get::<Position>(entity).copied()
    }

    /// Cached neighbors, which may include plants removed since the cache was
    /// built.
    pub fn neighbors_of(&self, entity: Entity) -> Option<Vec<Entity>> {
        self.world.get::<NeighborCache>(entity).map(|c| c.0.clone())
    }

    /// Plants this plant set on fire since it last caught fire.
    pub fn ignited_by(&self, entity: Entity) -> Option<Vec<Entity>> {
        self.world.get::<IgnitionLog>(entity).map(|log| log.0.clone())
    }

    /// Fire geometry of a plant under the current wind.
    pub fn fire_reach(&self, entity: Entity) -> Option<FireReach> {
        let position = self.world.get::<Position>(entity)?;
        let size = self.world.get::<PlantSize>(entity)?;
        Some(FireReach::new(
            *position,
            size.0,
            &self.plant_config(),
            &self.wind(),
        ))
    }

    pub fn state_counts(&mut self) -> StateCounts {
        StateCounts::from_world(&mut self.world)
    }

    /// Get a snapshot of the current simulation state. Drains pending fire
    /// events.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick, self.time)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulated time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    pub fn config(&self) -> Option<&FireConfig> {
        self.world.get_resource::<FireConfig>()
    }

    pub fn terrain(&self) -> &dyn GroundSampler {
        self.terrain.as_ref()
    }

    /// Swap the ground. Existing plants keep their positions.
    pub fn set_terrain(&mut self, terrain: impl GroundSampler + 'static) {
        self.terrain = Box::new(terrain);
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn plant_config(&self) -> PlantConfig {
        self.config().map(|c| c.plant.clone()).unwrap_or_default()
    }

    fn rng_mut(&mut self) -> Mut<'_, FireRng> {
        self.world.get_resource_or_insert_with(FireRng::default)
    }

    fn with_fire<R>(&mut self, f: impl FnOnce(&mut FireContext<'_, '_>) -> R) -> R {
        let mut fire = self.fire_state.get_mut(&mut self.world);
        f(&mut fire)
    }
}

impl Default for FireSim {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::events::FireEventKind;

    fn uniform_config() -> FireConfig {
        let mut config = FireConfig::default();
        config.plant.size_range = (1.0, 1.0);
        config
    }

    #[test]
    fn test_new_world() {
        let sim = FireSim::new();
        assert_eq!(sim.current_tick(), 0);
        assert_eq!(sim.simulation_speed(), 1.0);
    }

    #[test]
    fn test_default_world_is_populated() {
        let mut sim = FireSim::new_default_world();
        assert_eq!(sim.plant_count(), FireConfig::default().initial_plant_count);
        let counts = sim.state_counts();
        assert_eq!(counts.normal, counts.total());
    }

    #[test]
    fn test_regenerate_places_plants_on_terrain() {
        let mut sim = FireSim::with_terrain(
            FireConfig::default(),
            TerrainGrid::rolling_hills(21, 21, 1.0, 3.0),
        );
        assert_eq!(sim.regenerate(50), 50);

        let bounds = sim.terrain().bounds();
        for entity in sim.plants() {
            let pos = sim.plant_position(entity).unwrap();
            assert!(bounds.contains(pos.x, pos.z));
            assert!((pos.y - sim.terrain().height_at(pos.x, pos.z)).abs() < 1e-4);
            let size = sim.plant_size(entity).unwrap();
            assert!((0.8..=1.2).contains(&size));
            let health = sim.plant_health(entity).unwrap();
            assert!((health.max - 10.0 * size).abs() < 1e-4);
            assert_eq!(health.current, health.max);
        }
    }

    #[test]
    fn test_regenerate_replaces_population_and_never_reuses_ids() {
        let mut sim = FireSim::new();
        sim.regenerate(5);
        sim.regenerate(3);
        assert_eq!(sim.plant_count(), 3);
        let snapshot = sim.snapshot();
        let ids: Vec<u64> = snapshot.plants.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 7, 8]);
    }

    #[test]
    fn test_regenerate_zero_then_ignite_random() {
        let mut sim = FireSim::new();
        sim.regenerate(10);
        assert_eq!(sim.regenerate(0), 0);
        assert_eq!(sim.plant_count(), 0);
        assert_eq!(sim.ignite_random(5), 0);
    }

    #[test]
    fn test_destroy_all_on_empty_is_safe() {
        let mut sim = FireSim::new();
        assert_eq!(sim.destroy_all(), 0);
        sim.regenerate(4);
        assert_eq!(sim.destroy_all(), 4);
        assert_eq!(sim.plant_count(), 0);
    }

    #[test]
    fn test_ignite_random_zero_ignites_nothing() {
        let mut sim = FireSim::new();
        sim.regenerate(10);
        assert_eq!(sim.ignite_random(0), 0);
        assert_eq!(sim.state_counts().burning, 0);
    }

    #[test]
    fn test_ignite_random_more_than_population_ignites_normal_subset() {
        let mut sim = FireSim::with_config(uniform_config());
        sim.regenerate(6);
        let plants = sim.plants();
        sim.ignite_plant(plants[0]);
        *sim.world_mut().get_mut::<PlantState>(plants[1]).unwrap() = PlantState::Burnt;

        assert_eq!(sim.ignite_random(100), 4);
        let counts = sim.state_counts();
        assert_eq!(counts.burning, 5);
        assert_eq!(counts.burnt, 1);
        assert_eq!(counts.normal, 0);
    }

    #[test]
    fn test_ignite_random_picks_distinct_plants() {
        let mut sim = FireSim::new();
        sim.regenerate(20);
        assert_eq!(sim.ignite_random(7), 7);
        assert_eq!(sim.state_counts().burning, 7);
    }

    #[test]
    fn test_single_plant_burns_out_exactly_once() {
        let mut sim = FireSim::with_config(uniform_config());
        let plant = sim.spawn_plant_at(10.0, 10.0);
        assert!(sim.ignite_plant(plant));

        for _ in 0..39 {
            sim.tick(0.25);
        }
        assert_eq!(sim.plant_state(plant), Some(PlantState::Burning));

        sim.tick(0.25);
        assert_eq!(sim.plant_state(plant), Some(PlantState::Burnt));
        assert_eq!(sim.plant_health(plant).unwrap().current, 0.0);

        for _ in 0..10 {
            sim.tick(0.25);
        }
        let snapshot = sim.snapshot();
        let burnt = snapshot
            .events
            .iter()
            .filter(|e| e.kind == FireEventKind::Burnt)
            .count();
        assert_eq!(burnt, 1);
        assert_eq!(sim.plant_health(plant).unwrap().current, 0.0);
    }

    #[test]
    fn test_fire_spreads_between_coincident_plants() {
        let mut config = uniform_config();
        config.plant.base_health = 1000.0;
        let mut sim = FireSim::with_config(config);
        let a = sim.spawn_plant_at(5.0, 5.0);
        let b = sim.spawn_plant_at(5.0, 5.0);
        sim.ignite_plant(a);
        assert_eq!(sim.neighbors_of(a), Some(vec![b]));

        for _ in 0..500 {
            sim.tick(1.0);
            if sim.plant_state(b) == Some(PlantState::Burning) {
                break;
            }
        }
        assert_eq!(sim.plant_state(b), Some(PlantState::Burning));
        assert_eq!(sim.ignited_by(a), Some(vec![b]));

        let snapshot = sim.snapshot();
        let spread = snapshot
            .events
            .iter()
            .find(|e| e.kind == FireEventKind::Ignited && e.source.is_some());
        assert!(spread.is_some());
    }

    #[test]
    fn test_health_stays_in_bounds() {
        let mut sim = FireSim::new();
        sim.regenerate(80);
        sim.ignite_random(10);
        for _ in 0..60 {
            sim.tick(0.5);
            for entity in sim.plants() {
                let health = sim.plant_health(entity).unwrap();
                assert!(health.current >= 0.0);
                assert!(health.current <= health.max + 1e-5);
            }
        }
    }

    #[test]
    fn test_toggle_burnt_plant_is_noop() {
        let mut sim = FireSim::with_config(uniform_config());
        let plant = sim.spawn_plant_at(0.0, 0.0);
        sim.ignite_plant(plant);
        for _ in 0..20 {
            sim.tick(1.0);
        }
        assert_eq!(sim.plant_state(plant), Some(PlantState::Burnt));

        assert_eq!(sim.toggle_plant_fire(plant), Some(PlantState::Burnt));
        assert!(!sim.ignite_plant(plant));
        assert!(!sim.extinguish_plant(plant));
        assert_eq!(sim.plant_health(plant).unwrap().current, 0.0);
    }

    #[test]
    fn test_toggle_and_extinguish() {
        let mut sim = FireSim::new();
        let plant = sim.spawn_plant_at(0.0, 0.0);
        assert_eq!(sim.toggle_plant_fire(plant), Some(PlantState::Burning));
        sim.tick(1.0);
        assert_eq!(sim.toggle_plant_fire(plant), Some(PlantState::Normal));

        let health = sim.plant_health(plant).unwrap();
        assert!(health.current < health.max);
        sim.tick(1.0);
        assert!(sim.plant_health(plant).unwrap().current > health.current);
    }

    #[test]
    fn test_point_operations() {
        let mut sim = FireSim::new();
        let point = Position::new(20.0, 0.0, 20.0);

        let PointOutcome::Added(plant) =
            sim.point_operation(point, PointerMode::Add, PointerHit::Terrain)
        else {
            panic!("add on terrain should create a plant");
        };
        assert_eq!(sim.pick_plant(point, 1.0), Some(plant));

        assert_eq!(
            sim.point_operation(point, PointerMode::ToggleFire, PointerHit::Plant(plant)),
            PointOutcome::Toggled(PlantState::Burning)
        );
        assert_eq!(
            sim.point_operation(point, PointerMode::Add, PointerHit::Plant(plant)),
            PointOutcome::Ignored
        );
        assert_eq!(
            sim.point_operation(point, PointerMode::None, PointerHit::Terrain),
            PointOutcome::Ignored
        );
        assert_eq!(
            sim.point_operation(point, PointerMode::Remove, PointerHit::Plant(plant)),
            PointOutcome::Removed
        );
        assert_eq!(
            sim.point_operation(point, PointerMode::Remove, PointerHit::Plant(plant)),
            PointOutcome::Ignored
        );
        assert_eq!(sim.plant_count(), 0);
    }

    #[test]
    fn test_added_plant_joins_burning_neighbor_cache() {
        let mut sim = FireSim::with_config(uniform_config());
        let burning = sim.spawn_plant_at(10.0, 10.0);
        sim.ignite_plant(burning);
        assert_eq!(sim.neighbors_of(burning), Some(Vec::new()));

        let PointOutcome::Added(added) = sim.point_operation(
            Position::new(12.0, 0.0, 10.0),
            PointerMode::Add,
            PointerHit::Terrain,
        ) else {
            panic!("add on terrain should create a plant");
        };
        assert_eq!(sim.neighbors_of(burning), Some(vec![added]));
    }

    #[test]
    fn test_removed_neighbor_resolves_to_absent() {
        let mut sim = FireSim::with_config(uniform_config());
        let burning = sim.spawn_plant_at(10.0, 10.0);
        let neighbor = sim.spawn_plant_at(11.0, 10.0);
        sim.ignite_plant(burning);
        assert!(sim.remove_plant(neighbor));

        // The stale id stays cached until the next rebuild.
        assert_eq!(sim.neighbors_of(burning), Some(vec![neighbor]));
        assert_eq!(sim.plant_state(neighbor), None);
        sim.tick(1.0);
        assert_eq!(sim.plant_state(burning), Some(PlantState::Burning));

        assert_eq!(sim.recompute_burning_neighbors(), 1);
        assert_eq!(sim.neighbors_of(burning), Some(Vec::new()));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut sim = FireSim::new();
        let plant = sim.spawn_plant_at(0.0, 0.0);
        sim.ignite_plant(plant);
        sim.set_simulation_speed(2.0);

        sim.pause();
        assert!(sim.is_paused());
        sim.tick(1.0);
        let health = sim.plant_health(plant).unwrap();
        assert_eq!(health.current, health.max);
        assert_eq!(sim.current_tick(), 1);
        assert_eq!(sim.current_time(), 0.0);

        assert!(!sim.toggle_pause());
        assert_eq!(sim.simulation_speed(), 2.0);
        sim.tick(1.0);
        assert!((sim.plant_health(plant).unwrap().current - (health.max - 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_negative_speed_clamps_to_zero() {
        let mut sim = FireSim::new();
        sim.set_simulation_speed(-3.0);
        assert_eq!(sim.simulation_speed(), 0.0);
        assert!(sim.is_paused());
    }

    #[test]
    fn test_wind_shifts_fire_reach() {
        let mut sim = FireSim::with_config(uniform_config());
        let plant = sim.spawn_plant_at(0.0, 0.0);
        sim.set_wind(1.0, 90.0);
        let reach = sim.fire_reach(plant).unwrap();
        assert!(reach.center.x > 0.0);
        assert!(reach.center.z.abs() < 1e-4);
        assert!(reach.potential_radius > reach.spread_radius);
    }

    #[test]
    fn test_downwind_plant_is_a_neighbor_but_upwind_is_not() {
        let mut sim = FireSim::with_config(uniform_config());
        sim.set_wind(1.0, 90.0);
        let source = sim.spawn_plant_at(50.0, 50.0);
        let downwind = sim.spawn_plant_at(70.0, 50.0);
        let upwind = sim.spawn_plant_at(37.0, 50.0);
        sim.ignite_plant(source);

        let neighbors = sim.neighbors_of(source).unwrap();
        assert!(neighbors.contains(&downwind));
        assert!(!neighbors.contains(&upwind));
    }

    #[test]
    fn test_snapshot_json() {
        let mut sim = FireSim::new();
        sim.regenerate(3);
        sim.ignite_random(1);
        let json = sim.snapshot_json();
        assert!(json.contains("plants"));
        assert!(json.contains("Burning"));
    }

    #[test]
    fn test_same_seed_same_fire() {
        let run = || {
            let mut sim = FireSim::new();
            sim.regenerate(60);
            sim.ignite_random(3);
            for _ in 0..30 {
                sim.tick(0.5);
            }
            sim.state_counts()
        };
        assert_eq!(run(), run());
    }

    fn fierce_config() -> FireConfig {
        let mut config = uniform_config();
        config.plant.base_fire_chance = 1000.0;
        config
    }

    #[test]
    fn test_cached_neighbor_no_longer_normal_is_skipped() {
        let mut config = fierce_config();
        config.plant.base_health = 1000.0;
        let mut sim = FireSim::with_config(config);
        let a = sim.spawn_plant_at(5.0, 5.0);
        let b = sim.spawn_plant_at(5.0, 5.0);
        let c = sim.spawn_plant_at(5.0, 5.0);

        sim.ignite_plant(a);
        assert_eq!(sim.neighbors_of(a), Some(vec![b, c]));
        sim.ignite_plant(b);

        // b is still cached by a but is already burning.
        for _ in 0..5 {
            sim.tick(1.0);
        }
        assert_eq!(sim.plant_state(c), Some(PlantState::Burning));
        assert_eq!(sim.ignited_by(a), Some(vec![c]));
        assert_eq!(sim.plant_state(b), Some(PlantState::Burning));

        // Burn b out behind a's back; a keeps its stale cache.
        {
            let world = sim.world_mut();
            *world.get_mut::<PlantState>(b).unwrap() = PlantState::Burnt;
            world.get_mut::<PlantHealth>(b).unwrap().current = 0.0;
        }
        assert_eq!(sim.neighbors_of(a), Some(vec![b, c]));
        for _ in 0..20 {
            sim.tick(1.0);
        }
        assert_eq!(sim.plant_state(b), Some(PlantState::Burnt));
        assert_eq!(sim.plant_health(b).unwrap().current, 0.0);
        assert_eq!(sim.ignited_by(a), Some(vec![c]));
    }

    #[test]
    fn test_extinguish_then_reignite() {
        let mut sim = FireSim::with_config(fierce_config());
        let p = sim.spawn_plant_at(5.0, 5.0);
        let q = sim.spawn_plant_at(5.0, 5.0);
        sim.ignite_plant(p);
        sim.tick(1.0);
        assert_eq!(sim.ignited_by(p), Some(vec![q]));
        assert!((sim.plant_health(p).unwrap().current - 9.0).abs() < 1e-5);

        assert!(sim.extinguish_plant(p));
        assert_eq!(sim.plant_state(p), Some(PlantState::Normal));
        assert_eq!(sim.ignited_by(p), Some(Vec::new()));
        assert!((sim.plant_health(p).unwrap().current - 9.0).abs() < 1e-5);

        // q caught fire while p was burning, so p is not in q's cache.
        sim.tick(1.0);
        assert_eq!(sim.plant_state(p), Some(PlantState::Normal));
        assert!((sim.plant_health(p).unwrap().current - 9.5).abs() < 1e-5);

        assert!(sim.ignite_plant(p));
        assert_eq!(sim.neighbors_of(p), Some(Vec::new()));
        sim.tick(1.0);
        let health = sim.plant_health(p).unwrap();
        assert!((health.current - 8.5).abs() < 1e-5);
        assert!(health.current <= health.max);
    }

    #[test]
    fn test_paused_fuelless_plant_keeps_burning_state() {
        let mut config = uniform_config();
        config.plant.base_health = 0.0;
        let mut sim = FireSim::with_config(config);
        let plant = sim.spawn_plant_at(0.0, 0.0);
        sim.ignite_plant(plant);

        sim.set_simulation_speed(0.0);
        sim.tick(1.0);
        assert_eq!(sim.plant_state(plant), Some(PlantState::Burning));

        sim.set_simulation_speed(1.0);
        sim.tick(1.0);
        assert_eq!(sim.plant_state(plant), Some(PlantState::Burnt));
    }

    #[test]
    fn test_extreme_wind_does_not_panic() {
        let mut sim = FireSim::with_config(uniform_config());
        sim.set_wind(1.0e10, 0.0);
        let plant = sim.spawn_plant_at(10.0, 10.0);
        sim.spawn_plant_at(11.0, 10.0);

        assert!(sim.ignite_plant(plant));
        assert_eq!(sim.neighbors_of(plant), Some(Vec::new()));
        sim.tick(1.0);
        assert_eq!(sim.plant_state(plant), Some(PlantState::Burning));
    }

    #[test]
    fn test_event_buffer_is_bounded_and_cleared() {
        let mut config = FireConfig::default();
        config.event_capacity = 8;
        let mut sim = FireSim::with_config(config);

        for _ in 0..5 {
            sim.regenerate(50);
            sim.ignite_random(50);
            for _ in 0..15 {
                sim.tick(1.0);
            }
            assert!(sim.world().resource::<FireEventBuffer>().len() <= 8);
        }
        assert_eq!(sim.world().resource::<FireEventBuffer>().len(), 8);

        sim.destroy_all();
        assert!(sim.world().resource::<FireEventBuffer>().is_empty());
        assert!(sim.snapshot().events.is_empty());
    }
}
