mod forces;
mod geometry;
mod params;
pub mod rows;
mod session;

pub use forces::{ForceOverlay, ForceSummary};
pub use geometry::{EditError, GeometryModel};
pub use params::{MemberGroupProps, ParametricParams, TrussCategory, TrussType};
pub use session::TrussSession;

use serde::{Deserialize, Serialize};

/// Kinematic restraint at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportType {
    #[default]
    Free,
    Pin,
    /// Restrains vertical displacement.
    Roller,
    /// Restrains horizontal displacement.
    YRoller,
}

impl SupportType {
    pub const ALL: [SupportType; 4] = [
        SupportType::Free,
        SupportType::Pin,
        SupportType::Roller,
        SupportType::YRoller,
    ];

    /// Single-character form used in share links.
    pub fn code(self) -> char {
        match self {
            SupportType::Free => 'f',
            SupportType::Pin => 'p',
            SupportType::Roller => 'r',
            SupportType::YRoller => 'y',
        }
    }

    /// Inverse of [`code`](Self::code). Unknown codes mean no restraint.
    pub fn from_code(code: &str) -> Self {
        match code {
            "p" => SupportType::Pin,
            "r" => SupportType::Roller,
            "y" => SupportType::YRoller,
            _ => SupportType::Free,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SupportType::Free => "free",
            SupportType::Pin => "pin",
            SupportType::Roller => "roller",
            SupportType::YRoller => "yroller",
        }
    }

    /// Strict lookup by display name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|support| support.name().eq_ignore_ascii_case(name))
    }

    /// Lenient lookup for the solver's `fixity` field.
    pub fn from_fixity(fixity: &str) -> Self {
        match fixity.trim().to_ascii_lowercase().as_str() {
            "pin" | "pinned" => SupportType::Pin,
            "roller" => SupportType::Roller,
            "yroller" => SupportType::YRoller,
            _ => SupportType::Free,
        }
    }
}

impl std::fmt::Display for SupportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A joint in model coordinates (+y up) with its applied load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub support: SupportType,
    #[serde(default)]
    pub fx: f64,
    /// Upward positive.
    #[serde(default)]
    pub fy: f64,
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_support(mut self, support: SupportType) -> Self {
        self.support = support;
        self
    }

    pub fn with_load(mut self, fx: f64, fy: f64) -> Self {
        self.fx = fx;
        self.fy = fy;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.fx.is_finite() && self.fy.is_finite()
    }

    pub fn has_load(&self) -> bool {
        self.fx != 0.0 || self.fy != 0.0
    }

    /// The solver takes gravity-positive vertical loads.
    pub fn to_solver(&self) -> Node {
        Node {
            fy: -self.fy,
            ..*self
        }
    }
}

/// A two-force member between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub start: usize,
    pub end: usize,
    pub area: f64,
    pub elastic_modulus: f64,
}

impl Member {
    pub fn new(start: usize, end: usize, area: f64, elastic_modulus: f64) -> Self {
        Self {
            start,
            end,
            area,
            elastic_modulus,
        }
    }

    pub fn references(&self, node: usize) -> bool {
        self.start == node || self.end == node
    }
}

impl Default for Member {
    /// The placeholder member used when a share link entry is unreadable.
    fn default() -> Self {
        Self::new(0, 1, 1.0, 1.0)
    }
}

/// Axis-aligned extent of a node set in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    max_x: x,
                    min_y: y,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    max_x: b.max_x.max(x),
                    min_y: b.min_y.min(y),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_codes_are_reversible() {
        for support in SupportType::ALL {
            let code = support.code().to_string();
            assert_eq!(SupportType::from_code(&code), support);
        }
        assert_eq!(SupportType::from_code("q"), SupportType::Free);
        assert_eq!(SupportType::from_code(""), SupportType::Free);
    }

    #[test]
    fn support_names() {
        assert_eq!(SupportType::from_name(" Roller "), Some(SupportType::Roller));
        assert_eq!(SupportType::from_name("hinge"), None);
        assert_eq!(SupportType::from_fixity("pinned"), SupportType::Pin);
        assert_eq!(SupportType::from_fixity("fixed"), SupportType::Free);
        assert_eq!(SupportType::YRoller.to_string(), "yroller");
    }

    #[test]
    fn solver_flips_vertical_load() {
        let node = Node::new(1.0, 2.0).with_load(-2.0, 3.0);
        let solver = node.to_solver();
        assert_eq!(solver.fx, -2.0);
        assert_eq!(solver.fy, -3.0);
        assert_eq!(solver.x, 1.0);
    }

    #[test]
    fn bounds_of_points() {
        assert!(Bounds::of_points(std::iter::empty()).is_none());
        let b = Bounds::of_points([(0.0, 0.0), (16.0, 4.0), (8.0, -1.0)]);
        assert_eq!(
            b,
            Some(Bounds {
                min_x: 0.0,
                max_x: 16.0,
                min_y: -1.0,
                max_y: 4.0
            })
        );
        assert_eq!(b.map(|b| b.height()), Some(5.0));
    }
}
