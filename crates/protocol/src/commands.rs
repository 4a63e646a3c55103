use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::Paint;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each scene. Renderers consume
/// this list sequentially. Each command carries all the data it needs,
/// already in screen coordinates.
///
/// Every drawing command carries a `key` that is unique within one scene
/// and stable across re-renders of the same model, so retained-mode
/// backends can diff scenes instead of rebuilding them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a line segment.
    DrawLine {
        key: SharedStr,
        from: Point,
        to: Point,
        paint: Paint,
        width: f64,
    },

    /// Draw an open polyline through `points`.
    DrawPolyline {
        key: SharedStr,
        points: Vec<Point>,
        paint: Paint,
        width: f64,
    },

    /// Draw a filled, closed polygon.
    DrawPolygon {
        key: SharedStr,
        points: Vec<Point>,
        fill: Paint,
    },

    /// Draw a circle, filled and/or stroked.
    DrawCircle {
        key: SharedStr,
        center: Point,
        radius: f64,
        fill: Option<Paint>,
        stroke: Option<Paint>,
        stroke_width: f64,
    },

    /// Draw a text string at a position.
    DrawText {
        key: SharedStr,
        position: Point,
        text: SharedStr,
        paint: Paint,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a rounded tag with centered text.
    DrawTag {
        key: SharedStr,
        center: Point,
        text: SharedStr,
        fill: Paint,
        text_paint: Paint,
        font_size: f64,
        corner_radius: f64,
        padding: f64,
    },

    /// Draw a vertical linear gradient from `top` to `bottom`.
    DrawGradientBar {
        key: SharedStr,
        rect: Rect,
        top: Paint,
        bottom: Paint,
        border: Option<Paint>,
    },

    /// Begin a logical group (members, supports, legend...). Renderers may
    /// use this for layer separation or accessibility.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    /// The identity key of a drawing command. Group markers have none.
    pub fn key(&self) -> Option<&SharedStr> {
        match self {
            RenderCommand::DrawLine { key, .. }
            | RenderCommand::DrawPolyline { key, .. }
            | RenderCommand::DrawPolygon { key, .. }
            | RenderCommand::DrawCircle { key, .. }
            | RenderCommand::DrawText { key, .. }
            | RenderCommand::DrawTag { key, .. }
            | RenderCommand::DrawGradientBar { key, .. } => Some(key),
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeToken;

    #[test]
    fn serializes_with_variant_tags() {
        let cmd = RenderCommand::DrawLine {
            key: "member-0".into(),
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 5.0),
            paint: Paint::Theme(ThemeToken::Member),
            width: 2.0,
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.starts_with("{\"DrawLine\""));
        assert!(json.contains("\"member-0\""));
        let back: Option<RenderCommand> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(cmd));
    }

    #[test]
    fn groups_have_no_key() {
        assert!(RenderCommand::EndGroup.key().is_none());
        let tag = RenderCommand::DrawTag {
            key: "member-label-3".into(),
            center: Point::new(1.0, 1.0),
            text: "3".into(),
            fill: ThemeToken::MemberLabelFill.into(),
            text_paint: ThemeToken::MemberLabelText.into(),
            font_size: 4.0,
            corner_radius: 2.0,
            padding: 0.5,
        };
        assert_eq!(tag.key().map(SharedStr::as_str), Some("member-label-3"));
    }

    #[test]
    fn plain_rectangles_are_not_a_command() {
        let json = r#"{"DrawRect":{"key":"legend-panel"}}"#;
        assert!(serde_json::from_str::<RenderCommand>(json).is_err());
    }
}
