//! Concentration grids and the 3x3 periodic convolver.
//!
//! The grid is topologically a torus: every accessor wraps its indices, so
//! out-of-range coordinates are resolved, never rejected.

use crate::palette::Palette;
use rayon::prelude::*;

pub type Kernel3 = [[f64; 3]; 3];

/// The discrete Laplacian-like stencil used by the integrator. The exact
/// weights (ring summing to 1.0, -1.0 at center) are load-bearing for
/// pattern formation.
pub const LAPLACIAN_KERNEL: Kernel3 = [
    [0.05, 0.2, 0.05],
    [0.2, -1.0, 0.2],
    [0.05, 0.2, 0.05],
];

/// Wrap a possibly-negative index onto `[0, n)`.
#[inline]
pub fn wrap(i: isize, n: usize) -> usize {
    i.rem_euclid(n as isize) as usize
}

/// The pair of concentration grids plus the per-cell palette tag map.
///
/// Row-major `n * n` storage. Tags are written by cluster deposits and read
/// by the color mapper; untagged cells render as black.
#[derive(Clone, Debug)]
pub struct Field {
    pub(crate) n: usize,
    pub(crate) a: Vec<f64>,
    pub(crate) b: Vec<f64>,
    pub(crate) tags: Vec<Option<Palette>>,
}

impl Field {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            a: vec![0.0; n * n],
            b: vec![0.0; n * n],
            tags: vec![None; n * n],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// A concentration at the toroidally wrapped cell.
    pub fn a(&self, x: isize, y: isize) -> f64 {
        self.a[wrap(y, self.n) * self.n + wrap(x, self.n)]
    }

    /// B concentration at the toroidally wrapped cell.
    pub fn b(&self, x: isize, y: isize) -> f64 {
        self.b[wrap(y, self.n) * self.n + wrap(x, self.n)]
    }

    /// Palette tag at the toroidally wrapped cell, if any deposit reached it.
    pub fn tag(&self, x: isize, y: isize) -> Option<Palette> {
        self.tags[wrap(y, self.n) * self.n + wrap(x, self.n)]
    }

    pub fn set_a(&mut self, x: isize, y: isize, value: f64) {
        let i = wrap(y, self.n) * self.n + wrap(x, self.n);
        self.a[i] = value;
    }

    pub fn set_b(&mut self, x: isize, y: isize, value: f64) {
        let i = wrap(y, self.n) * self.n + wrap(x, self.n);
        self.b[i] = value;
    }

    pub fn a_values(&self) -> &[f64] {
        &self.a
    }

    pub fn b_values(&self) -> &[f64] {
        &self.b
    }

    pub fn fill_a(&mut self, value: f64) {
        self.a.fill(value);
    }

    pub fn fill_b(&mut self, value: f64) {
        self.b.fill(value);
    }

    /// Number of cells carrying a palette tag.
    pub fn tagged_cells(&self) -> usize {
        self.tags.iter().filter(|t| t.is_some()).count()
    }
}

/// Apply a 3x3 stencil to `src` with periodic wraparound, writing into `out`.
///
/// Pure function of the `src` snapshot; rows are computed in parallel and
/// written disjointly, so no write for one cell is visible to another cell's
/// read.
pub fn convolve3x3(src: &[f64], n: usize, kernel: &Kernel3, out: &mut [f64]) {
    debug_assert_eq!(src.len(), n * n);
    debug_assert_eq!(out.len(), n * n);
    out.par_chunks_mut(n).enumerate().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for dy in -1isize..=1 {
                let ny = wrap(y as isize + dy, n);
                for dx in -1isize..=1 {
                    let nx = wrap(x as isize + dx, n);
                    sum += src[ny * n + nx] * kernel[(dy + 1) as usize][(dx + 1) as usize];
                }
            }
            *cell = sum;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn random_grid(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        (0..n * n).map(|_| rng.random::<f64>()).collect()
    }

    #[test]
    fn kernel_ring_sums_to_one_and_center_is_minus_one() {
        let ring: f64 = LAPLACIAN_KERNEL.iter().flatten().sum::<f64>() - LAPLACIAN_KERNEL[1][1];
        assert!((ring - 1.0).abs() < 1e-12);
        assert_eq!(LAPLACIAN_KERNEL[1][1], -1.0);
    }

    #[test]
    fn toroidal_wrap_resolves_out_of_range_indices() {
        let n = 8;
        let mut field = Field::new(n);
        for y in 0..n {
            for x in 0..n {
                field.set_a(x as isize, y as isize, (y * n + x) as f64);
            }
        }
        assert_eq!(field.a(-1, 0), field.a(n as isize - 1, 0));
        assert_eq!(field.a(n as isize, 0), field.a(0, 0));
        assert_eq!(field.a(0, -1), field.a(0, n as isize - 1));
        assert_eq!(field.a(0, n as isize), field.a(0, 0));
        assert_eq!(field.a(-9, -9), field.a(-1, -1));
    }

    #[test]
    fn convolution_of_uniform_grid_is_zero() {
        // Ring weights sum to 1.0 against a -1.0 center, so a constant grid
        // convolves to zero everywhere.
        let n = 16;
        let src = vec![0.7; n * n];
        let mut out = vec![1.0; n * n];
        convolve3x3(&src, n, &LAPLACIAN_KERNEL, &mut out);
        for v in out {
            assert!(v.abs() < 1e-12, "expected ~0, got {v}");
        }
    }

    #[test]
    fn convolution_is_linear() {
        let n = 12;
        let f1 = random_grid(n, 1);
        let f2 = random_grid(n, 2);
        let sum: Vec<f64> = f1.iter().zip(&f2).map(|(a, b)| a + b).collect();

        let mut out1 = vec![0.0; n * n];
        let mut out2 = vec![0.0; n * n];
        let mut out_sum = vec![0.0; n * n];
        convolve3x3(&f1, n, &LAPLACIAN_KERNEL, &mut out1);
        convolve3x3(&f2, n, &LAPLACIAN_KERNEL, &mut out2);
        convolve3x3(&sum, n, &LAPLACIAN_KERNEL, &mut out_sum);

        for i in 0..n * n {
            assert!(
                (out_sum[i] - (out1[i] + out2[i])).abs() < 1e-12,
                "linearity violated at {i}: {} vs {}",
                out_sum[i],
                out1[i] + out2[i]
            );
        }
    }

    #[test]
    fn convolution_wraps_across_edges() {
        let n = 5;
        let mut src = vec![0.0; n * n];
        // Single spike in the corner; the opposite edges' cells must see it
        // through the wrap.
        src[0] = 1.0;
        let mut out = vec![0.0; n * n];
        convolve3x3(&src, n, &LAPLACIAN_KERNEL, &mut out);
        // Cell (n-1, n-1) is a diagonal neighbor of (0, 0) on the torus.
        assert!((out[(n - 1) * n + (n - 1)] - 0.05).abs() < 1e-12);
        // Cell (n-1, 0) is a horizontal neighbor through the wrap.
        assert!((out[n - 1] - 0.2).abs() < 1e-12);
        assert!((out[0] - (-1.0)).abs() < 1e-12);
    }
}
