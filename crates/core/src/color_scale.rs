//! Force-to-color mapping for member overlays and the legend.

use serde::{Deserialize, Serialize};
use trussview_protocol::Color;

/// Two-stop gradient. `low` is the color of the most compressive force
/// (the range minimum), `high` of the most tensile (the maximum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceGradient {
    pub low: Color,
    pub high: Color,
}

impl Default for ForceGradient {
    fn default() -> Self {
        Self {
            low: Color::rgb(225, 190, 25),
            high: Color::rgb(25, 190, 225),
        }
    }
}

impl ForceGradient {
    /// Color at normalized position `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        Color::rgb(
            lerp(self.low.r, self.high.r, t),
            lerp(self.low.g, self.high.g, t),
            lerp(self.low.b, self.high.b, t),
        )
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, 255.0) as u8
}

/// Normalized position of `value` within `[min, max]`.
///
/// A collapsed or non-finite range, or a non-finite value, sits at the
/// midpoint.
pub fn normalize(value: f64, max: f64, min: f64) -> f64 {
    let range = max - min;
    if !range.is_finite() || range == 0.0 || !value.is_finite() {
        return 0.5;
    }
    ((value - min) / range).clamp(0.0, 1.0)
}

pub fn interpolate(value: f64, max: f64, min: f64, gradient: &ForceGradient) -> Color {
    gradient.at(normalize(value, max, min))
}
