//! Process-wide environment resources: wind, simulation speed and the tick
//! delta. Plants read these fresh every tick.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Resource containing the wall-clock delta time for the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// Global multiplier on simulated time. 0 pauses all plant ticking.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSpeed(pub f32);

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

impl SimulationSpeed {
    pub fn new(speed: f32) -> Self {
        if speed.is_finite() {
            Self(speed.max(0.0))
        } else {
            Self(0.0)
        }
    }

    pub fn is_paused(&self) -> bool {
        self.0 <= 0.0
    }

    /// Simulated seconds covered by a wall-clock delta.
    pub fn scale(&self, dt: f32) -> f32 {
        dt * self.0
    }
}

/// Global wind state.
///
/// `direction` is a unit vector on the ground plane `(x, z)` pointing where
/// the wind blows toward. `speed` is unitless and scales fire reach.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f32,
    pub direction: (f32, f32),
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            speed: 0.0,
            direction: (0.0, 1.0),
        }
    }
}

impl Wind {
    /// Build wind from a direction vector. A zero or non-finite vector falls
    /// back to the default heading (+z).
    pub fn new(speed: f32, dx: f32, dz: f32) -> Self {
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        let len = (dx * dx + dz * dz).sqrt();
        let direction = if len > 1e-6 && len.is_finite() {
            (dx / len, dz / len)
        } else {
            Self::default().direction
        };
        Self { speed, direction }
    }

    /// Build wind from a compass bearing in degrees (0 = +z, 90 = +x).
    pub fn from_bearing(speed: f32, bearing_degrees: f32) -> Self {
        let radians = bearing_degrees.to_radians();
        Self::new(speed, radians.sin(), radians.cos())
    }

    /// Compass bearing in degrees in `[0, 360)`.
    pub fn bearing_degrees(&self) -> f32 {
        let (dx, dz) = self.direction;
        dx.atan2(dz).to_degrees().rem_euclid(360.0)
    }

    pub fn direction_vector(&self) -> (f32, f32) {
        self.direction
    }
}
