use std::fmt;

use serde::{Deserialize, Serialize};

/// Editing mode carried by the `cat` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrussCategory {
    #[default]
    Bridge,
    Roof,
    Custom,
}

impl TrussCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TrussCategory::Bridge => "bridge",
            TrussCategory::Roof => "roof",
            TrussCategory::Custom => "custom",
        }
    }

    /// Anything unrecognized is a bridge.
    pub fn parse(value: &str) -> Self {
        match value {
            "custom" => TrussCategory::Custom,
            "roof" => TrussCategory::Roof,
            _ => TrussCategory::Bridge,
        }
    }

    pub fn is_parametric(self) -> bool {
        self != TrussCategory::Custom
    }
}

impl fmt::Display for TrussCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parametric truss style understood by the geometry service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrussType {
    #[default]
    PrattBridge,
    PrattRoof,
    HoweBridge,
    HoweRoof,
    FinkRoof,
    WarrenBridge,
    ParallelChordRoof,
    Scissor,
    /// A style this build does not know, kept verbatim.
    Other(String),
}

impl TrussType {
    pub const KNOWN: [TrussType; 8] = [
        TrussType::PrattBridge,
        TrussType::PrattRoof,
        TrussType::HoweBridge,
        TrussType::HoweRoof,
        TrussType::FinkRoof,
        TrussType::WarrenBridge,
        TrussType::ParallelChordRoof,
        TrussType::Scissor,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TrussType::PrattBridge => "PrattBridgeTruss",
            TrussType::PrattRoof => "PrattRoofTruss",
            TrussType::HoweBridge => "HoweBridgeTruss",
            TrussType::HoweRoof => "HoweRoofTruss",
            TrussType::FinkRoof => "FinkRoofTruss",
            TrussType::WarrenBridge => "WarrenBridgeTruss",
            TrussType::ParallelChordRoof => "ParallelChordRoofTruss",
            TrussType::Scissor => "ScissorTruss",
            TrussType::Other(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TrussType::PrattBridge => "Pratt Bridge",
            TrussType::PrattRoof => "Pratt Roof",
            TrussType::HoweBridge => "Howe Bridge",
            TrussType::HoweRoof => "Howe Roof",
            TrussType::FinkRoof => "Fink Roof",
            TrussType::WarrenBridge => "Warren Bridge",
            TrussType::ParallelChordRoof => "Parallel Chord Roof",
            TrussType::Scissor => "Scissor",
            TrussType::Other(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == name)
            .unwrap_or_else(|| TrussType::Other(name.to_string()))
    }

    pub fn category(&self) -> TrussCategory {
        match self {
            TrussType::PrattRoof
            | TrussType::HoweRoof
            | TrussType::FinkRoof
            | TrussType::ParallelChordRoof
            | TrussType::Scissor => TrussCategory::Roof,
            TrussType::Other(name) if name.contains("Roof") => TrussCategory::Roof,
            _ => TrussCategory::Bridge,
        }
    }

    /// Styles whose geometry takes the `depth` parameter.
    pub fn uses_depth(&self) -> bool {
        matches!(self, TrussType::ParallelChordRoof | TrussType::Scissor)
    }
}

impl From<String> for TrussType {
    fn from(name: String) -> Self {
        TrussType::parse(&name)
    }
}

impl From<TrussType> for String {
    fn from(ty: TrussType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for TrussType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-chord-group overrides of one member property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberGroupProps {
    pub top: f64,
    pub bot: f64,
    pub web: f64,
}

impl MemberGroupProps {
    pub const DEFAULT_AREA: f64 = 5.0;
    pub const DEFAULT_E_MOD: f64 = 29000.0;

    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bot: value,
            web: value,
        }
    }

    /// Value for a member of the given generator `type`.
    pub fn for_member_type(&self, member_type: Option<&str>) -> f64 {
        match member_type {
            Some("top" | "topChord") => self.top,
            Some("bot" | "botChord") => self.bot,
            _ => self.web,
        }
    }
}

/// Inputs of the parametric geometry generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametricParams {
    pub span: f64,
    pub height: f64,
    pub depth: f64,
    pub n_web: u32,
    pub truss_type: TrussType,
    pub e_mod: MemberGroupProps,
    pub area: MemberGroupProps,
    /// When set, `e_mod` and `area` are ignored in favor of the defaults.
    pub default_props: bool,
    /// Rows of `[node index, Fx, Fy]`.
    pub forces: Option<Vec<Vec<f64>>>,
}

impl Default for ParametricParams {
    fn default() -> Self {
        Self {
            span: 16.0,
            height: 4.0,
            depth: 1.5,
            n_web: 1,
            truss_type: TrussType::default(),
            e_mod: MemberGroupProps::uniform(MemberGroupProps::DEFAULT_E_MOD),
            area: MemberGroupProps::uniform(MemberGroupProps::DEFAULT_AREA),
            default_props: true,
            forces: None,
        }
    }
}

impl ParametricParams {
    /// Effective (area, modulus) for a generated member of `member_type`.
    pub fn section_for(&self, member_type: Option<&str>) -> (f64, f64) {
        if self.default_props {
            (
                MemberGroupProps::DEFAULT_AREA,
                MemberGroupProps::DEFAULT_E_MOD,
            )
        } else {
            (
                self.area.for_member_type(member_type),
                self.e_mod.for_member_type(member_type),
            )
        }
    }

    /// Load rows as `(node index, Fx, Fy)`, skipping rows that do not name
    /// a node.
    pub fn load_rows(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.forces.iter().flatten().filter_map(|row| {
            let index = *row.first()?;
            if index < 0.0 || index.fract() != 0.0 || !index.is_finite() {
                return None;
            }
            let fx = row.get(1).copied().unwrap_or(0.0);
            let fy = row.get(2).copied().unwrap_or(0.0);
            Some((index as usize, fx, fy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_falls_back_to_bridge() {
        assert_eq!(TrussCategory::parse("custom"), TrussCategory::Custom);
        assert_eq!(TrussCategory::parse("roof"), TrussCategory::Roof);
        assert_eq!(TrussCategory::parse("Roof"), TrussCategory::Bridge);
        assert_eq!(TrussCategory::parse("tower"), TrussCategory::Bridge);
    }

    #[test]
    fn truss_type_names_round_trip() {
        for ty in TrussType::KNOWN {
            assert_eq!(TrussType::parse(ty.as_str()), ty);
        }
        let other = TrussType::parse("KingPostRoofTruss");
        assert_eq!(other, TrussType::Other("KingPostRoofTruss".into()));
        assert_eq!(other.to_string(), "KingPostRoofTruss");
        assert_eq!(other.category(), TrussCategory::Roof);
    }

    #[test]
    fn style_properties() {
        assert_eq!(TrussType::FinkRoof.category(), TrussCategory::Roof);
        assert_eq!(TrussType::WarrenBridge.category(), TrussCategory::Bridge);
        assert!(TrussType::Scissor.uses_depth());
        assert!(!TrussType::PrattBridge.uses_depth());
    }

    #[test]
    fn group_props_pick_by_member_type() {
        let props = MemberGroupProps {
            top: 1.0,
            bot: 2.0,
            web: 3.0,
        };
        assert_eq!(props.for_member_type(Some("topChord")), 1.0);
        assert_eq!(props.for_member_type(Some("bot")), 2.0);
        assert_eq!(props.for_member_type(Some("diagonal")), 3.0);
        assert_eq!(props.for_member_type(None), 3.0);
    }

    #[test]
    fn default_props_override_groups() {
        let mut params = ParametricParams {
            area: MemberGroupProps::uniform(9.0),
            ..ParametricParams::default()
        };
        assert_eq!(params.section_for(Some("top")), (5.0, 29000.0));
        params.default_props = false;
        assert_eq!(params.section_for(Some("top")), (9.0, 29000.0));
    }

    #[test]
    fn load_rows_skip_bad_indices() {
        let params = ParametricParams {
            forces: Some(vec![vec![0.0, 1.0, -2.0], vec![-1.0, 1.0, 1.0], vec![2.5], vec![3.0]]),
            ..ParametricParams::default()
        };
        let rows: Vec<_> = params.load_rows().collect();
        assert_eq!(rows, vec![(0, 1.0, -2.0), (3, 0.0, 0.0)]);
    }
}
