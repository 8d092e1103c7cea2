//! Color-mapper sweep: fills the persistent RGB frame buffer from the
//! post-quench, post-deposit state of the current frame.

use super::Simulation;
use crate::palette;
use rayon::prelude::*;

impl Simulation {
    pub(crate) fn render_phase(&mut self) {
        let n = self.config.grid_size;
        let field = &self.field;
        self.frame_rgb
            .par_chunks_mut(n * 3)
            .enumerate()
            .for_each(|(y, row)| {
                let base = y * n;
                for x in 0..n {
                    let i = base + x;
                    let rgb = palette::shade_cell(field.tags[i], field.b[i]);
                    row[x * 3..x * 3 + 3].copy_from_slice(&rgb);
                }
            });
    }
}
