use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    Member,
    Node,
    Support,
    LoadArrow,

    NodeLabel,
    MemberLabelFill,
    MemberLabelText,

    LegendText,
    LegendBorder,

    Axis,
    AxisText,
}

/// How a primitive is colored: either a token the backend resolves against
/// its theme, or a fixed color computed by the core (force overlays,
/// user palette overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    Theme(ThemeToken),
    Rgb(Color),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Paint::Theme(token)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Rgb(color)
    }
}
