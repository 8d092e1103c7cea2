//! Palette catalog and the concentration-to-RGB color mapper.

use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

/// An ordered triple of gradient stops. Deposits capture the current global
/// palette by value, so a cell keeps rendering with the palette that was
/// active when its cluster landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub stops: [Rgb; 3],
}

/// The fixed palette catalog.
pub const CATALOG: [Palette; 9] = [
    // Warm sunset
    Palette { stops: [[255, 107, 107], [255, 230, 109], [33, 150, 243]] },
    // Cool neon
    Palette { stops: [[75, 0, 130], [0, 255, 255], [255, 192, 203]] },
    // Nature inspired
    Palette { stops: [[34, 139, 34], [255, 215, 0], [0, 191, 255]] },
    // Vibrant purple
    Palette { stops: [[138, 43, 226], [255, 105, 180], [255, 255, 0]] },
    // Tropical sunset
    Palette { stops: [[255, 87, 51], [255, 189, 41], [18, 203, 196]] },
    // Primary bold
    Palette { stops: [[46, 134, 193], [241, 196, 15], [231, 76, 60]] },
    // Cool jewel tones
    Palette { stops: [[155, 89, 182], [52, 152, 219], [26, 188, 156]] },
    // Autumn leaves
    Palette { stops: [[243, 156, 18], [211, 84, 0], [192, 57, 43]] },
    // Fresh greens
    Palette { stops: [[106, 176, 76], [199, 244, 100], [39, 174, 96]] },
];

fn lerp_channel(start: u8, end: u8, t: f64) -> u8 {
    let v = start as f64 + (end as f64 - start as f64) * t;
    v.round().clamp(0.0, 255.0) as u8
}

fn lerp_rgb(start: Rgb, end: Rgb, t: f64) -> Rgb {
    [
        lerp_channel(start[0], end[0], t),
        lerp_channel(start[1], end[1], t),
        lerp_channel(start[2], end[2], t),
    ]
}

impl Palette {
    /// Map a concentration in [0, 1] onto the gradient: the first segment
    /// covers [0, 0.5), the second [0.5, 1]. Values outside [0, 1] (deposits
    /// can compound B past 1 before the next integration clamps it) are
    /// clamped.
    pub fn shade(&self, v: f64) -> Rgb {
        let v = v.clamp(0.0, 1.0);
        let [c0, c1, c2] = self.stops;
        if v < 0.5 {
            lerp_rgb(c0, c1, v * 2.0)
        } else {
            lerp_rgb(c1, c2, (v - 0.5) * 2.0)
        }
    }
}

/// Per-cell color mapping: untagged cells are opaque black, tagged cells run
/// the two-segment gradient. Output is RGB; alpha is always fully opaque.
pub fn shade_cell(tag: Option<Palette>, v: f64) -> Rgb {
    match tag {
        None => [0, 0, 0],
        Some(palette) => palette.shade(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Palette = Palette {
        stops: [[0, 0, 0], [100, 100, 100], [200, 200, 200]],
    };

    #[test]
    fn shade_hits_stops_at_segment_boundaries() {
        assert_eq!(P.shade(0.0), [0, 0, 0]);
        assert_eq!(P.shade(0.5), [100, 100, 100]);
        assert_eq!(P.shade(1.0), [200, 200, 200]);
    }

    #[test]
    fn shade_interpolates_within_segments() {
        assert_eq!(P.shade(0.25), [50, 50, 50]);
        assert_eq!(P.shade(0.75), [150, 150, 150]);
    }

    #[test]
    fn shade_clamps_out_of_range_values() {
        assert_eq!(P.shade(-0.5), P.shade(0.0));
        assert_eq!(P.shade(1.7), P.shade(1.0));
    }

    #[test]
    fn untagged_cells_are_black() {
        assert_eq!(shade_cell(None, 0.9), [0, 0, 0]);
    }

    #[test]
    fn tagged_cells_use_their_palette() {
        assert_eq!(shade_cell(Some(P), 0.5), [100, 100, 100]);
    }

    #[test]
    fn catalog_has_at_least_eight_entries() {
        assert!(CATALOG.len() >= 8);
    }
}
