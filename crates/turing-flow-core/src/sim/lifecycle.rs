//! Particle phase: alive updates, cluster deposits on death, and the
//! cadence-driven palette/flow resets.
//!
//! Deposits run after the frame's integrate/quench sequence, so they are
//! rendered in the current frame's image but only start diffusing on the
//! next frame's convolution.

use super::Simulation;
use crate::field::Field;
use crate::palette::Palette;
use rand::Rng;

impl Simulation {
    pub(crate) fn step_particle_phase(&mut self) {
        let n = self.config.grid_size;
        let size = n as f64;
        let lifespan = self.config.particle_lifespan;
        let strength = self.config.flow_strength;
        let max_speed = self.config.max_speed;

        for i in 0..self.particles.len() {
            if self.particles[i].lifespan == 0 {
                let death_position = self.particles[i].position;
                let palette = self.global_palette;
                self.deposit_cluster(death_position, palette);
                self.particles[i].cluster_palette = Some(palette);

                let respawn = [
                    self.rng.random::<f64>() * size,
                    self.rng.random::<f64>() * size,
                ];
                self.particles[i].reset(respawn, lifespan);
                self.deposits_last_frame += 1;
                self.total_deposits += 1;
            } else {
                let flow = &self.flow;
                let p = &mut self.particles[i];
                p.previous_position = p.position;

                let force = flow.at(p.position[0], p.position[1]);
                p.acceleration[0] += force[0] * strength;
                p.acceleration[1] += force[1] * strength;
                p.velocity[0] += p.acceleration[0];
                p.velocity[1] += p.acceleration[1];

                let speed_sq = p.velocity[0] * p.velocity[0] + p.velocity[1] * p.velocity[1];
                if speed_sq > max_speed * max_speed {
                    let scale = max_speed / speed_sq.sqrt();
                    p.velocity[0] *= scale;
                    p.velocity[1] *= scale;
                }

                p.position[0] = (p.position[0] + p.velocity[0]).rem_euclid(size);
                p.position[1] = (p.position[1] + p.velocity[1]).rem_euclid(size);
                p.acceleration = [0.0, 0.0];
                p.lifespan -= 1;
            }
        }
    }

    /// Stamp the configured number of ovals around a death position: each
    /// masked in-bounds cell gains `deposit_gain` of B (additive, so
    /// overlapping ovals compound) and has its tag overwritten with the
    /// palette captured at deposit time. Masks are clipped to the grid, not
    /// wrapped.
    pub(crate) fn deposit_cluster(&mut self, position: [f64; 2], palette: Palette) {
        let n = self.config.grid_size;
        let radius = self.config.cluster_radius;
        let limit = (n - 1) as f64;

        for _ in 0..self.config.cluster_oval_count {
            let offset = [
                (self.rng.random::<f64>() * 2.0 * radius).floor() - radius,
                (self.rng.random::<f64>() * 2.0 * radius).floor() - radius,
            ];
            let center = [
                (position[0] + offset[0]).clamp(0.0, limit),
                (position[1] + offset[1]).clamp(0.0, limit),
            ];
            let axes = [
                self.rng
                    .random_range(self.config.oval_axis_min..=self.config.oval_axis_max)
                    as f64,
                self.rng
                    .random_range(self.config.oval_axis_min..=self.config.oval_axis_max)
                    as f64,
            ];
            stamp_oval(
                &mut self.field,
                center,
                axes,
                self.config.deposit_gain,
                palette,
            );
        }
    }

    /// Cadence-driven resets at the end of the frame: the global palette is
    /// redrawn and the flow field regenerated on their own intervals. The two
    /// draws are independent even when the cadences coincide.
    pub(crate) fn apply_periodic_resets(&mut self) {
        if self.frame_index % self.config.palette_switch_interval == 0 {
            let idx = self.rng.random_range(0..self.config.palettes.len());
            self.global_palette = self.config.palettes[idx];
            self.palette_switches += 1;
        }
        if self.frame_index % self.config.flow_reset_interval == 0 {
            let seed = self.rng.random::<u32>();
            self.flow = crate::flow::FlowField::generate(
                self.config.grid_size,
                self.config.flow_noise_scale,
                self.config.flow_angle_multiplier,
                seed,
            );
            self.flow_resets += 1;
        }
    }
}

/// Add `gain` of B and set the palette tag for every grid cell inside the
/// axis-aligned ellipse, scanning only its clipped bounding box.
fn stamp_oval(field: &mut Field, center: [f64; 2], axes: [f64; 2], gain: f64, palette: Palette) {
    let n = field.size();
    let x0 = ((center[0] - axes[0]).floor().max(0.0)) as usize;
    let x1 = ((center[0] + axes[0]).ceil().min((n - 1) as f64)) as usize;
    let y0 = ((center[1] - axes[1]).floor().max(0.0)) as usize;
    let y1 = ((center[1] + axes[1]).ceil().min((n - 1) as f64)) as usize;

    for y in y0..=y1 {
        let dy = (y as f64 - center[1]) / axes[1];
        for x in x0..=x1 {
            let dx = (x as f64 - center[0]) / axes[0];
            if dx * dx + dy * dy <= 1.0 {
                let i = y * n + x;
                field.b[i] += gain;
                field.tags[i] = Some(palette);
            }
        }
    }
}
