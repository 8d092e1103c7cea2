use crate::palette::{Palette, CATALOG};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Simulation parameters. Defaults reproduce the reference constants.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square grid (N cells per axis).
    pub grid_size: usize,
    /// Diffusion rate for the A concentration.
    pub diffusion_a: f64,
    /// Diffusion rate for the B concentration.
    pub diffusion_b: f64,
    /// Gray-Scott feed rate.
    pub feed_rate: f64,
    /// Gray-Scott kill rate.
    pub kill_rate: f64,
    /// Integration time step.
    pub dt: f64,
    /// B values at or below this are zeroed after every integration step.
    /// Applied to B only; the asymmetry is intentional.
    pub quench_threshold: f64,
    pub particle_count: usize,
    /// Frames a particle stays alive before it deposits and respawns.
    pub particle_lifespan: u32,
    /// Velocity magnitude cap for particles.
    pub max_speed: f64,
    /// Scale applied to the unit flow vector when accumulating acceleration.
    pub flow_strength: f64,
    /// Noise-space scale for flow-field sampling.
    pub flow_noise_scale: f64,
    /// Full turns of angle covered by the noise range.
    pub flow_angle_multiplier: f64,
    /// Frames between wholesale flow-field regenerations.
    pub flow_reset_interval: usize,
    /// Frames between global palette redraws.
    pub palette_switch_interval: usize,
    /// Max offset of each oval center from the particle's death position.
    pub cluster_radius: f64,
    /// Ovals stamped per cluster deposit.
    pub cluster_oval_count: usize,
    /// Inclusive lower bound for oval semi-axes, in cells.
    pub oval_axis_min: u32,
    /// Inclusive upper bound for oval semi-axes, in cells.
    pub oval_axis_max: u32,
    /// Concentration added to B per masked cell per oval.
    pub deposit_gain: f64,
    /// Total frames before the simulation halts.
    pub frame_budget: usize,
    /// Palette catalog deposits draw from; must not be empty.
    pub palettes: Vec<Palette>,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 600,
            diffusion_a: 1.5,
            diffusion_b: 1.5,
            feed_rate: 0.055,
            kill_rate: 0.062,
            dt: 0.01,
            quench_threshold: 0.2,
            particle_count: 50,
            particle_lifespan: 50,
            max_speed: 2.0,
            flow_strength: 0.1,
            flow_noise_scale: 0.01,
            flow_angle_multiplier: 2.0,
            flow_reset_interval: 100,
            palette_switch_interval: 100,
            cluster_radius: 30.0,
            cluster_oval_count: 20,
            oval_axis_min: 2,
            oval_axis_max: 4,
            deposit_gain: 0.5,
            frame_budget: 600,
            palettes: CATALOG.to_vec(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    ZeroGridSize,
    EmptyPaletteCatalog,
    ZeroFrameBudget,
    InvalidTimeStep { dt: f64 },
    InvalidAxisRange { min: u32, max: u32 },
    ZeroResetInterval,
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::ZeroGridSize => write!(f, "grid_size must be positive"),
            SimConfigError::EmptyPaletteCatalog => {
                write!(f, "palette catalog must contain at least one entry")
            }
            SimConfigError::ZeroFrameBudget => write!(f, "frame_budget must be positive"),
            SimConfigError::InvalidTimeStep { dt } => {
                write!(f, "dt ({dt}) must be positive and finite")
            }
            SimConfigError::InvalidAxisRange { min, max } => write!(
                f,
                "oval axis range [{min}, {max}] must satisfy 1 <= min <= max"
            ),
            SimConfigError::ZeroResetInterval => {
                write!(f, "flow_reset_interval and palette_switch_interval must be positive")
            }
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.grid_size == 0 {
            return Err(SimConfigError::ZeroGridSize);
        }
        if self.palettes.is_empty() {
            return Err(SimConfigError::EmptyPaletteCatalog);
        }
        if self.frame_budget == 0 {
            return Err(SimConfigError::ZeroFrameBudget);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimConfigError::InvalidTimeStep { dt: self.dt });
        }
        if self.oval_axis_min == 0 || self.oval_axis_min > self.oval_axis_max {
            return Err(SimConfigError::InvalidAxisRange {
                min: self.oval_axis_min,
                max: self.oval_axis_max,
            });
        }
        if self.flow_reset_interval == 0 || self.palette_switch_interval == 0 {
            return Err(SimConfigError::ZeroResetInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_grid_size_rejected() {
        let config = SimConfig {
            grid_size: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::ZeroGridSize));
    }

    #[test]
    fn empty_palette_catalog_rejected() {
        let config = SimConfig {
            palettes: Vec::new(),
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::EmptyPaletteCatalog));
    }

    #[test]
    fn zero_frame_budget_rejected() {
        let config = SimConfig {
            frame_budget: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::ZeroFrameBudget));
    }

    #[test]
    fn bad_dt_rejected() {
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let config = SimConfig {
                dt,
                ..SimConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(SimConfigError::InvalidTimeStep { .. })
            ));
        }
    }

    #[test]
    fn inverted_axis_range_rejected() {
        let config = SimConfig {
            oval_axis_min: 5,
            oval_axis_max: 2,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidAxisRange { min: 5, max: 2 })
        );
    }

    #[test]
    fn zero_cadence_rejected() {
        let config = SimConfig {
            flow_reset_interval: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::ZeroResetInterval));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SimConfig {
            grid_size: 64,
            seed: 7,
            ..SimConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grid_size, 64);
        assert_eq!(back.seed, 7);
        assert_eq!(back.palettes.len(), config.palettes.len());
    }
}
