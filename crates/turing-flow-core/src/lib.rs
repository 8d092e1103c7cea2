//! Gray-Scott reaction-diffusion on a toroidal grid, stirred by a population
//! of flow-field-driven particles that deposit concentration clusters and tag
//! cells with color palettes for rendering.
//!
//! The entry point is [`sim::Simulation`]: construct one from a
//! [`config::SimConfig`], call [`sim::Simulation::step`] once per frame, and
//! read the RGB output via [`sim::Simulation::frame`].

pub mod config;
pub mod field;
pub mod flow;
pub mod palette;
pub mod particle;
pub mod sim;

pub use config::{SimConfig, SimConfigError};
pub use sim::Simulation;
