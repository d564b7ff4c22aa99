//! ECS systems for the fire simulation.
//!
//! Systems contain the simulation logic that operates on components.
//!
//! ## Tick
//!
//! A single system runs per tick:
//! - `plant_tick_system` - regrows normal plants, burns burning ones and rolls
//!   ignition trials against their cached neighbors
//!
//! Ignitions inside the pass are visible immediately, so the schedule is kept
//! to one system rather than split into parallel groups.
//!
//! ## Shared logic
//!
//! - `context` - `FireContext`, the transition logic shared by the tick and
//!   the driver surface
//! - `spread` - fire reach geometry and the ignition chance
//! - `events` - transition events buffered for snapshots

pub mod context;
pub mod events;
pub mod spread;
pub mod tick;

pub use context::{FireContext, PlantData};
pub use events::{FireEvent, FireEventBuffer, FireEventKind, DEFAULT_EVENT_CAPACITY};
pub use spread::{ignition_chance, FireReach, SpreadSource, PHI};
pub use tick::plant_tick_system;
