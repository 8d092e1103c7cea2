pub mod integrate;
pub mod lifecycle;
pub mod metrics;
pub mod render;

pub use metrics::*;

use crate::config::{SimConfig, SimConfigError};
use crate::field::Field;
use crate::flow::FlowField;
use crate::palette::Palette;
use crate::particle::Particle;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};
use std::time::Instant;

/// The simulation context: owns all mutable state and drives the per-frame
/// phase order. Components only receive transient access to the field during
/// their own phase.
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) field: Field,
    // Ping-pong and convolution scratch, allocated once so no frame allocates.
    pub(crate) conv_a: Vec<f64>,
    pub(crate) conv_b: Vec<f64>,
    pub(crate) next_a: Vec<f64>,
    pub(crate) next_b: Vec<f64>,
    pub(crate) flow: FlowField,
    pub(crate) particles: Vec<Particle>,
    pub(crate) global_palette: Palette,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) frame_index: usize,
    pub(crate) frame_rgb: Vec<u8>,
    pub(crate) deposits_last_frame: usize,
    pub(crate) total_deposits: usize,
    pub(crate) palette_switches: usize,
    pub(crate) flow_resets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    InvalidSampleEvery,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
        }
    }
}

impl Error for RunError {}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;
        let n = config.grid_size;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);

        // A starts saturated, B carries a faint random dusting (quenched away
        // on the first step unless a deposit tops it up).
        let mut field = Field::new(n);
        field.fill_a(1.0);
        for b in field.b.iter_mut() {
            *b = 0.01 * rng.random::<f64>();
        }

        let flow_seed = rng.random::<u32>();
        let flow = FlowField::generate(
            n,
            config.flow_noise_scale,
            config.flow_angle_multiplier,
            flow_seed,
        );

        let global_palette = config.palettes[rng.random_range(0..config.palettes.len())];

        let particles = (0..config.particle_count)
            .map(|_| {
                let pos = [
                    rng.random::<f64>() * n as f64,
                    rng.random::<f64>() * n as f64,
                ];
                Particle::new(pos, config.particle_lifespan)
            })
            .collect();

        Ok(Self {
            field,
            conv_a: vec![0.0; n * n],
            conv_b: vec![0.0; n * n],
            next_a: vec![0.0; n * n],
            next_b: vec![0.0; n * n],
            flow,
            particles,
            global_palette,
            rng,
            frame_index: 0,
            frame_rgb: vec![0; n * n * 3],
            deposits_last_frame: 0,
            total_deposits: 0,
            palette_switches: 0,
            flow_resets: 0,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn flow_field(&self) -> &FlowField {
        &self.flow
    }

    pub fn current_palette(&self) -> Palette {
        self.global_palette
    }

    /// Frames stepped so far.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Cluster deposits across the whole run.
    pub fn total_deposits(&self) -> usize {
        self.total_deposits
    }

    /// The current RGB raster, `grid_size * grid_size * 3` bytes, row-major.
    /// Reflects the post-quench, post-deposit state of the last stepped frame.
    pub fn frame(&self) -> &[u8] {
        &self.frame_rgb
    }

    pub fn has_terminated(&self) -> bool {
        self.frame_index >= self.config.frame_budget
    }

    /// Advance one frame: integrate, quench, step particles (deposits land
    /// here), render, then apply any cadence-driven palette/flow resets.
    /// A no-op once the frame budget is exhausted.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        if self.has_terminated() {
            return StepTimings {
                integrate_us: 0,
                particle_us: 0,
                render_us: 0,
                total_us: total_start.elapsed().as_micros() as u64,
            };
        }
        self.frame_index += 1;
        self.deposits_last_frame = 0;

        let t0 = Instant::now();
        self.integrate_phase();
        self.quench_phase();
        let integrate_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_particle_phase();
        let particle_us = t1.elapsed().as_micros() as u64;

        let t2 = Instant::now();
        self.render_phase();
        let render_us = t2.elapsed().as_micros() as u64;

        self.apply_periodic_resets();

        StepTimings {
            integrate_us,
            particle_us,
            render_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }

    pub fn run(&mut self, sample_every: usize) -> RunSummary {
        self.try_run(sample_every).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Step until the frame budget is exhausted, collecting metrics every
    /// `sample_every` frames (and on the final frame).
    pub fn try_run(&mut self, sample_every: usize) -> Result<RunSummary, RunError> {
        if sample_every == 0 {
            return Err(RunError::InvalidSampleEvery);
        }
        let frames = self.config.frame_budget;
        let estimated = if frames == 0 {
            0
        } else {
            ((frames - 1) / sample_every) + 1
        };
        let mut samples = Vec::with_capacity(estimated);
        while !self.has_terminated() {
            self.step();
            if self.frame_index % sample_every == 0 || self.has_terminated() {
                samples.push(self.step_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            frames: self.frame_index,
            sample_every,
            samples,
            total_deposits: self.total_deposits,
            palette_switches: self.palette_switches,
            flow_resets: self.flow_resets,
        })
    }
}
