//! A flow-following agent with a bounded lifespan. When the lifespan runs
//! out the particle deposits a cluster into the field and respawns; the
//! collection size never changes.

use crate::palette::Palette;

#[derive(Clone, Debug)]
pub struct Particle {
    /// Continuous position in [0, N) on both axes.
    pub position: [f64; 2],
    /// Position at the start of the current frame, kept so a presentation
    /// layer can draw a trail segment.
    pub previous_position: [f64; 2],
    pub velocity: [f64; 2],
    pub acceleration: [f64; 2],
    /// Remaining alive frames; a deposit fires on the frame after this
    /// reaches zero.
    pub lifespan: u32,
    /// Palette captured at the most recent cluster deposit, if any.
    pub cluster_palette: Option<Palette>,
}

impl Particle {
    pub fn new(position: [f64; 2], lifespan: u32) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: [0.0, 0.0],
            acceleration: [0.0, 0.0],
            lifespan,
            cluster_palette: None,
        }
    }

    /// Respawn after a deposit: new position, zeroed motion state, restored
    /// lifespan. The captured cluster palette survives until the next deposit.
    pub(crate) fn reset(&mut self, position: [f64; 2], lifespan: u32) {
        self.position = position;
        self.previous_position = position;
        self.velocity = [0.0, 0.0];
        self.acceleration = [0.0, 0.0];
        self.lifespan = lifespan;
    }
}
