//! Flow field: a dense grid of unit direction vectors derived from coherent
//! noise, regenerated wholesale on a fixed cadence. Read-only to particles
//! between regenerations.

use noise::{NoiseFn, Perlin};
use std::f64::consts::TAU;

#[derive(Clone, Debug)]
pub struct FlowField {
    n: usize,
    vectors: Vec<[f64; 2]>,
}

impl FlowField {
    /// Build a brand-new field from a freshly seeded noise source.
    ///
    /// The angle at each cell is `unit_noise(x*s, y*s) * 2pi * m`, where
    /// `unit_noise` maps Perlin output from [-1, 1] onto [0, 1]. There is no
    /// interpolation with any previous field; an abrupt directional change at
    /// regeneration is intended.
    pub fn generate(n: usize, noise_scale: f64, angle_multiplier: f64, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let mut vectors = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                let sample = perlin.get([x as f64 * noise_scale, y as f64 * noise_scale]);
                let unit_noise = 0.5 * (sample + 1.0);
                let angle = unit_noise * TAU * angle_multiplier;
                vectors.push([angle.cos(), angle.sin()]);
            }
        }
        Self { n, vectors }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Direction at a continuous position. The floored cell index is clamped
    /// into range, so positions that drifted outside [0, N) still resolve.
    pub fn at(&self, x: f64, y: f64) -> [f64; 2] {
        let cx = (x.floor().max(0.0) as usize).min(self.n - 1);
        let cy = (y.floor().max(0.0) as usize).min(self.n - 1);
        self.vectors[cy * self.n + cx]
    }
}
