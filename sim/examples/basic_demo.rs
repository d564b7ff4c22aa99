//! Basic demonstration of the wildfire simulation.
//!
//! Run with: cargo run --example basic_demo

use wildfire_sim::{FireSim, PlantState};

fn main() {
    println!("=== Wildfire - Simulation Demo ===\n");

    // Rolling hills with the default plant population
    let mut sim = FireSim::new_default_world();
    sim.set_wind(0.6, 45.0);

    println!("Initial state:");
    print_counts(&mut sim);

    println!("\n--- Igniting 5 random plants ---\n");
    let ignited = sim.ignite_random(5);
    println!("Ignited {} plants", ignited);

    // 60 simulated seconds at 10 ticks/sec
    println!("Running simulation for 600 ticks...\n");
    for tick in 0..600 {
        sim.tick(0.1);

        if (tick + 1) % 100 == 0 {
            println!("--- Tick {} (t={:.1}s) ---", sim.current_tick(), sim.current_time());
            print_counts(&mut sim);
        }
    }

    // Largest fire starter
    let snapshot = sim.snapshot();
    if let Some(plant) = snapshot.plants.iter().max_by_key(|p| p.ignited.len()) {
        println!(
            "\nPlant {} at ({:.1}, {:.1}, {:.1}) ignited {} others",
            plant.id,
            plant.x,
            plant.y,
            plant.z,
            plant.ignited.len()
        );
    }
    println!("{} fire events since start", snapshot.events.len());

    let burnt = snapshot
        .plants
        .iter()
        .filter(|p| p.state == PlantState::Burnt)
        .count();
    println!("{} of {} plants burnt", burnt, snapshot.plants.len());
}

fn print_counts(sim: &mut FireSim) {
    let counts = sim.state_counts();
    println!(
        "  normal={} burning={} burnt={}",
        counts.normal, counts.burning, counts.burnt
    );
}
