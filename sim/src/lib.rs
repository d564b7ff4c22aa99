//! Wildfire - Simulation Core
//!
//! A seeded, frame-driven ECS simulation of fire spreading through a field of
//! plants. Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod components;
pub mod config;
pub mod curve;
pub mod environment;
pub mod rng;
pub mod spatial;
pub mod systems;
pub mod terrain;
pub mod world;

pub use api::{FireSim, PointOutcome, PointerHit, PointerMode};
pub use components::*;
pub use config::{FireConfig, PlantConfig};
pub use curve::{CurveKey, SpreadCurve};
pub use environment::{DeltaTime, SimulationSpeed, Wind};
pub use rng::FireRng;
pub use spatial::{SpatialEntry, SpatialGrid};
pub use systems::*;
pub use terrain::{FlatGround, GroundSampler, TerrainBounds, TerrainGrid};
pub use world::{PlantSnapshot, Snapshot, StateCounts};
