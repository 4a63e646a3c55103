//! `trussview.toml` settings.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [layout]
//! side_margin = 4.5
//!
//! [codec]
//! policy = "strict"
//!
//! [gradient]
//! low = "#e1be19"
//! high = "#19bee1"
//!
//! [display]
//! member_labels = false
//!
//! [palette]
//! member = "#1f4e9c"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trussview_protocol::Color;

use crate::canvas::RenderOptions;
use crate::codec::DecodePolicy;
use crate::color_scale::ForceGradient;
use crate::symbols::Palette;
use crate::viewport::LayoutConfig;

pub const DEFAULT_CONFIG_FILE: &str = "trussview.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0:?} is not a #rrggbb color")]
    BadColor(String),
}

/// A color written as `#rrggbb` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Color);

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
            .map(HexColor)
            .ok_or(ConfigError::BadColor(value))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0.to_hex()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrussConfig {
    pub layout: LayoutConfig,
    pub codec: CodecConfig,
    pub gradient: GradientConfig,
    pub display: DisplayConfig,
    pub palette: PaletteConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub policy: DecodePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub low: HexColor,
    pub high: HexColor,
}

impl Default for GradientConfig {
    fn default() -> Self {
        let gradient = ForceGradient::default();
        Self {
            low: HexColor(gradient.low),
            high: HexColor(gradient.high),
        }
    }
}

/// Initial layer toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub node_labels: bool,
    pub member_labels: bool,
    pub force_arrows: bool,
    pub axes: bool,
    pub legend: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            node_labels: options.show_node_labels,
            member_labels: options.show_member_labels,
            force_arrows: options.show_force_arrows,
            axes: options.show_axes,
            legend: options.show_legend,
        }
    }
}

/// Fixed colors that replace theme colors for individual symbol roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub member: Option<HexColor>,
    pub node: Option<HexColor>,
    pub support: Option<HexColor>,
    pub load: Option<HexColor>,
    pub label_text: Option<HexColor>,
    pub tag_fill: Option<HexColor>,
    pub tag_text: Option<HexColor>,
    pub legend_text: Option<HexColor>,
    pub axis: Option<HexColor>,
}

impl PaletteConfig {
    /// The default palette with the configured overrides applied.
    pub fn resolve(&self) -> Palette {
        let mut palette = Palette::default();
        let apply = |slot: &mut trussview_protocol::Paint, color: Option<HexColor>| {
            if let Some(HexColor(color)) = color {
                *slot = color.into();
            }
        };
        apply(&mut palette.member, self.member);
        apply(&mut palette.node, self.node);
        apply(&mut palette.support, self.support);
        apply(&mut palette.load, self.load);
        apply(&mut palette.label_text, self.label_text);
        apply(&mut palette.tag_fill, self.tag_fill);
        apply(&mut palette.tag_text, self.tag_text);
        apply(&mut palette.legend_text, self.legend_text);
        apply(&mut palette.axis, self.axis);
        apply(&mut palette.axis_text, self.axis);
        palette
    }
}

impl TrussConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// `trussview.toml` in the working directory, or the defaults. A file
    /// that exists but does not parse is reported and ignored.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                log::warn!("ignoring {DEFAULT_CONFIG_FILE}: {err}");
                Self::default()
            }
        }
    }

    pub fn gradient(&self) -> ForceGradient {
        ForceGradient {
            low: self.gradient.low.0,
            high: self.gradient.high.0,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_node_labels: self.display.node_labels,
            show_member_labels: self.display.member_labels,
            show_force_arrows: self.display.force_arrows,
            show_axes: self.display.axes,
            show_legend: self.display.legend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trussview_protocol::{Paint, ThemeToken};

    #[test]
    fn empty_file_is_default() {
        let config = TrussConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrussConfig::default());
        assert_eq!(config.gradient(), ForceGradient::default());
        assert_eq!(config.codec.policy, DecodePolicy::Lenient);
        assert_eq!(config.render_options(), RenderOptions::default());
    }

    #[test]
    fn parses_every_section() {
        let config = TrussConfig::from_toml_str(
            r##"
            [layout]
            side_margin = 4.5
            bottom_margin = 6.0

            [codec]
            policy = "strict"

            [gradient]
            low = "#ff0000"

            [display]
            member_labels = false
            axes = false

            [palette]
            member = "#102030"
            axis = "#aabbcc"
            "##,
        )
        .unwrap();
        assert_eq!(config.layout.side_margin, 4.5);
        assert_eq!(config.layout.min_extent, 1e-3);
        assert_eq!(config.codec.policy, DecodePolicy::Strict);
        assert_eq!(config.gradient().low, Color::rgb(255, 0, 0));
        assert_eq!(config.gradient().high, ForceGradient::default().high);
        let options = config.render_options();
        assert!(!options.show_member_labels && !options.show_axes && options.show_node_labels);

        let palette = config.palette.resolve();
        assert_eq!(palette.member, Paint::Rgb(Color::rgb(0x10, 0x20, 0x30)));
        assert_eq!(palette.axis_text, Paint::Rgb(Color::rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(palette.node, Paint::Theme(ThemeToken::Node));
    }

    #[test]
    fn rejects_bad_color() {
        let err = TrussConfig::from_toml_str("[palette]\nnode = \"blue\"").unwrap_err();
        assert!(err.to_string().contains("blue"));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(TrussConfig::from_toml_str("[codec]\npolicy = \"paranoid\"").is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = TrussConfig::load_from_file("/nonexistent/trussview.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = toml::to_string(&TrussConfig::default()).unwrap();
        assert!(text.contains("low = \"#e1be19\""));
        assert_eq!(TrussConfig::from_toml_str(&text).unwrap(), TrussConfig::default());
    }
}
