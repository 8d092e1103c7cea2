use super::Simulation;
use serde::{Deserialize, Serialize};

/// Per-phase wall-clock timings for one frame, returned by `step`.
#[derive(Clone, Debug)]
pub struct StepTimings {
    pub integrate_us: u64,
    pub particle_us: u64,
    pub render_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub frame: usize,
    pub a_mean: f64,
    pub b_mean: f64,
    /// Cells with nonzero B (survivors of the quench plus fresh deposits).
    pub active_cells: usize,
    /// Cells carrying a palette tag.
    pub tagged_cells: usize,
    pub deposits: usize,
    pub mean_particle_speed: f64,
    pub palette_switches: usize,
    pub flow_resets: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub frames: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub total_deposits: usize,
    #[serde(default)]
    pub palette_switches: usize,
    #[serde(default)]
    pub flow_resets: usize,
}

impl RunSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Simulation {
    /// Snapshot of the observable state after the most recent frame.
    pub fn step_metrics(&self) -> StepMetrics {
        let cells = self.field.a.len().max(1) as f64;
        let a_mean = self.field.a.iter().sum::<f64>() / cells;
        let b_mean = self.field.b.iter().sum::<f64>() / cells;
        let active_cells = self.field.b.iter().filter(|v| **v > 0.0).count();

        let mean_particle_speed = if self.particles.is_empty() {
            0.0
        } else {
            self.particles
                .iter()
                .map(|p| (p.velocity[0] * p.velocity[0] + p.velocity[1] * p.velocity[1]).sqrt())
                .sum::<f64>()
                / self.particles.len() as f64
        };

        StepMetrics {
            frame: self.frame_index,
            a_mean,
            b_mean,
            active_cells,
            tagged_cells: self.field.tagged_cells(),
            deposits: self.deposits_last_frame,
            mean_particle_speed,
            palette_switches: self.palette_switches,
            flow_resets: self.flow_resets,
        }
    }
}
