use std::time::Instant;
use turing_flow_core::{SimConfig, Simulation};

fn main() {
    let config = SimConfig {
        grid_size: 300,
        frame_budget: 120,
        particle_count: 50,
        seed: 42,
        ..SimConfig::default()
    };
    let frames = config.frame_budget;
    println!(
        "Benchmarking {}x{} grid, {} particles, {} frames",
        config.grid_size, config.grid_size, config.particle_count, frames
    );

    let mut sim = Simulation::new(config);
    let mut integrate_us = 0u64;
    let mut particle_us = 0u64;
    let mut render_us = 0u64;

    let start = Instant::now();
    while !sim.has_terminated() {
        let timings = sim.step();
        integrate_us += timings.integrate_us;
        particle_us += timings.particle_us;
        render_us += timings.render_us;
    }
    let total = start.elapsed();

    let per_frame = |us: u64| us as f64 / frames as f64;
    println!("Total wall time: {:?}", total);
    println!("Avg per frame:   {:?}", total / frames as u32);
    println!("  integrate+quench: {:.1} us", per_frame(integrate_us));
    println!("  particles:        {:.1} us", per_frame(particle_us));
    println!("  render:           {:.1} us", per_frame(render_us));

    let metrics = sim.step_metrics();
    println!(
        "Final frame {}: b_mean={:.5} active_cells={} tagged_cells={}",
        metrics.frame, metrics.b_mean, metrics.active_cells, metrics.tagged_cells
    );
}
