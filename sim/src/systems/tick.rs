//! Per-tick plant update.

use crate::components::PlantState;
use crate::environment::{DeltaTime, SimulationSpeed};
use crate::rng::FireRng;
use crate::systems::context::FireContext;
use bevy_ecs::prelude::*;
use tracing::trace;

/// System that advances every plant by one tick.
///
/// Normal plants regrow, burning plants consume fuel and roll ignition trials
/// against their cached neighbors, burnt plants are inert. A plant ignited
/// earlier in the pass burns on its own turn later in the same pass; the
/// order plants are visited in is not part of the contract.
pub fn plant_tick_system(
    dt: Res<DeltaTime>,
    speed: Res<SimulationSpeed>,
    mut rng: ResMut<FireRng>,
    mut fire: FireContext,
) {
    let elapsed = speed.scale(dt.0);
    let order: Vec<Entity> = fire.plants.iter().map(|(entity, ..)| entity).collect();

    let mut burning = 0usize;
    for entity in order {
        match fire.state_of(entity) {
            Some(PlantState::Normal) => fire.regrow(entity, elapsed),
            Some(PlantState::Burning) => {
                if fire.burn(entity, elapsed, &mut rng) {
                    burning += 1;
                }
            }
            Some(PlantState::Burnt) | None => {}
        }
    }

    trace!(elapsed, burning, "plant tick");
}
