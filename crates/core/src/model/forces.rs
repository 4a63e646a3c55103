use serde::{Deserialize, Serialize};
use trussview_protocol::Color;

use crate::color_scale::{self, ForceGradient};

/// Observed range of member axial forces for one successful solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSummary {
    pub min: f64,
    pub max: f64,
}

impl ForceSummary {
    /// `None` when there is no finite force to summarize.
    pub fn from_forces<I>(forces: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        forces
            .into_iter()
            .filter(|f| f.is_finite())
            .fold(None, |acc, f| {
                Some(match acc {
                    None => ForceSummary { min: f, max: f },
                    Some(s) => ForceSummary {
                        min: s.min.min(f),
                        max: s.max.max(f),
                    },
                })
            })
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// Per-member colors derived from one analysis result.
///
/// Kept apart from [`GeometryModel`](super::GeometryModel) so solver output
/// never leaks into encoded share state.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceOverlay {
    colors: Vec<Color>,
    summary: ForceSummary,
    gradient: ForceGradient,
}

impl ForceOverlay {
    pub fn from_forces(forces: &[f64], gradient: ForceGradient) -> Option<Self> {
        let summary = ForceSummary::from_forces(forces.iter().copied())?;
        let colors = forces
            .iter()
            .map(|&f| color_scale::interpolate(f, summary.max, summary.min, &gradient))
            .collect();
        Some(Self {
            colors,
            summary,
            gradient,
        })
    }

    pub fn member_color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn summary(&self) -> &ForceSummary {
        &self.summary
    }

    pub fn gradient(&self) -> &ForceGradient {
        &self.gradient
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_skips_non_finite() {
        let s = ForceSummary::from_forces([3.0, f64::NAN, -7.5, 1.0]).unwrap();
        assert_eq!((s.min, s.max), (-7.5, 3.0));
        assert_eq!(s.midpoint(), -2.25);
        assert!(ForceSummary::from_forces(std::iter::empty()).is_none());
        assert!(ForceSummary::from_forces([f64::INFINITY]).is_none());
    }

    #[test]
    fn overlay_colors_follow_gradient() {
        let gradient = ForceGradient::default();
        let overlay = ForceOverlay::from_forces(&[-4.0, 0.0, 4.0], gradient).unwrap();
        assert_eq!(overlay.len(), 3);
        assert_eq!(overlay.member_color(0), Some(gradient.low));
        assert_eq!(overlay.member_color(2), Some(gradient.high));
        assert_eq!(overlay.member_color(1), Some(gradient.at(0.5)));
        assert_eq!(overlay.member_color(3), None);
    }

    #[test]
    fn single_force_overlay_is_midpoint() {
        let gradient = ForceGradient::default();
        let overlay = ForceOverlay::from_forces(&[2.5], gradient).unwrap();
        assert!(overlay.summary().is_degenerate());
        assert_eq!(overlay.member_color(0), Some(gradient.at(0.5)));
    }
}
