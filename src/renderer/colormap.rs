use egui::Color32;

use crate::renderer::theme::mix;

/// Entries in a built-in lookup table, matching a 256x1 colormap texture.
pub const LUT_SIZE: usize = 256;

/// Per-channel polynomial fit of viridis, lowest degree first.
const VIRIDIS_FIT: [[f64; 3]; 7] = [
    [0.2777273272234177, 0.005407344544966578, 0.3340998053353061],
    [0.1050930431085774, 1.404613529898575, 1.384590162594685],
    [-0.3308618287255563, 0.214847559468213, 0.09509516302823659],
    [-4.634230498983486, -5.799100973351585, -19.33244095627987],
    [6.228269936347081, 14.17993336680509, 56.69055260068105],
    [4.776384997670288, -13.74514537774601, -65.35303263337234],
    [-5.435455855934631, 4.645852612178535, 26.3124352495832],
];

fn viridis_lut() -> Vec<Color32> {
    (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / (LUT_SIZE - 1) as f64;
            let channel = |c: usize| {
                let v = VIRIDIS_FIT.iter().rev().fold(0.0, |acc, k| acc * t + k[c]);
                (v.clamp(0.0, 1.0) * 255.0).round() as u8
            };
            Color32::from_rgb(channel(0), channel(1), channel(2))
        })
        .collect()
}

/// Piecewise-linear colour map over evenly spaced stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    pub name: String,
    stops: Vec<Color32>,
}

impl Colormap {
    pub fn viridis() -> Self {
        Self {
            name: "viridis".to_owned(),
            stops: viridis_lut(),
        }
    }

    /// Evenly spaced gradient through `colors`; a single colour gives a flat map.
    pub fn from_list(name: &str, colors: &[Color32]) -> Self {
        let stops = match colors {
            [] => vec![Color32::BLACK],
            _ => colors.to_vec(),
        };
        Self {
            name: name.to_owned(),
            stops,
        }
    }

    pub fn sample(&self, t: f32) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let pos = t * last as f32;
        let i = (pos.floor() as usize).min(last - 1);
        mix(self.stops[i], self.stops[i + 1], pos - i as f32)
    }
}

/// Linear normalisation of a value range onto [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    pub fn apply(&self, value: f64) -> f32 {
        let span = self.vmax - self.vmin;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.vmin) / span) as f32
    }
}
