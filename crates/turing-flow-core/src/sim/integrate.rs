//! Reaction-diffusion integration and the post-step quench.
//!
//! Both new grids are computed from a consistent snapshot of the old ones
//! into pre-allocated next-buffers and swapped in, so no partial update is
//! ever visible mid-computation (explicit ping-pong instead of per-frame
//! reallocation).

use super::Simulation;
use crate::field::{convolve3x3, LAPLACIAN_KERNEL};
use rayon::prelude::*;

impl Simulation {
    /// One Gray-Scott update:
    ///
    /// ```text
    /// reaction = A * B^2
    /// A' = clamp(A + (da*convA - reaction + f*(1 - A)) * dt, 0, 1)
    /// B' = clamp(B + (db*convB + reaction - (f + k)*B) * dt, 0, 1)
    /// ```
    ///
    /// Does not apply the quench; `step` runs [`Simulation::quench_phase`]
    /// immediately afterwards.
    pub(crate) fn integrate_phase(&mut self) {
        let n = self.config.grid_size;
        convolve3x3(&self.field.a, n, &LAPLACIAN_KERNEL, &mut self.conv_a);
        convolve3x3(&self.field.b, n, &LAPLACIAN_KERNEL, &mut self.conv_b);

        let da = self.config.diffusion_a;
        let db = self.config.diffusion_b;
        let f = self.config.feed_rate;
        let k = self.config.kill_rate;
        let dt = self.config.dt;

        let a = &self.field.a;
        let b = &self.field.b;
        let conv_a = &self.conv_a;
        let conv_b = &self.conv_b;
        self.next_a
            .par_chunks_mut(n)
            .zip(self.next_b.par_chunks_mut(n))
            .enumerate()
            .for_each(|(y, (row_a, row_b))| {
                let base = y * n;
                for x in 0..n {
                    let i = base + x;
                    let reaction = a[i] * b[i] * b[i];
                    row_a[x] = (a[i] + (da * conv_a[i] - reaction + f * (1.0 - a[i])) * dt)
                        .clamp(0.0, 1.0);
                    row_b[x] = (b[i] + (db * conv_b[i] + reaction - (f + k) * b[i]) * dt)
                        .clamp(0.0, 1.0);
                }
            });

        std::mem::swap(&mut self.field.a, &mut self.next_a);
        std::mem::swap(&mut self.field.b, &mut self.next_b);
    }

    /// Zero every B value at or below the threshold, on the persisted grid.
    /// This feeds the next frame's convolution and reaction terms; it is not
    /// a rendering-only filter. A is never quenched.
    pub(crate) fn quench_phase(&mut self) {
        let threshold = self.config.quench_threshold;
        self.field.b.par_iter_mut().for_each(|v| {
            if *v <= threshold {
                *v = 0.0;
            }
        });
    }
}
