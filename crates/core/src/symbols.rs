//! Glyph vocabulary. Every function takes a screen point and a symbol size
//! `s` in pixels and returns self-contained, uniquely keyed commands.

use trussview_protocol::{Paint, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::color_scale::{self, ForceGradient};
use crate::model::ForceSummary;

const HATCH_HALF_WIDTH: f64 = 3.0;
const HATCH_DEPTH: f64 = 3.0;
const PIN_HALF_BASE: f64 = 1.5;
const ROLLER_RADIUS: f64 = 1.25;
const ARROW_LENGTH: f64 = 4.0;
const ARROW_HEAD_LENGTH: f64 = 1.5;
const ARROW_HEAD_HALF_WIDTH: f64 = 0.75;
const NODE_LABEL_FONT: f64 = 3.0;
const TAG_FONT: f64 = 2.0;
const LEGEND_FONT: f64 = 2.0;

/// Paint per symbol role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub member: Paint,
    pub node: Paint,
    pub support: Paint,
    pub load: Paint,
    pub label_text: Paint,
    pub tag_fill: Paint,
    pub tag_text: Paint,
    pub legend_text: Paint,
    pub legend_border: Paint,
    pub axis: Paint,
    pub axis_text: Paint,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            member: ThemeToken::Member.into(),
            node: ThemeToken::Node.into(),
            support: ThemeToken::Support.into(),
            load: ThemeToken::LoadArrow.into(),
            label_text: ThemeToken::NodeLabel.into(),
            tag_fill: ThemeToken::MemberLabelFill.into(),
            tag_text: ThemeToken::MemberLabelText.into(),
            legend_text: ThemeToken::LegendText.into(),
            legend_border: ThemeToken::LegendBorder.into(),
            axis: ThemeToken::Axis.into(),
            axis_text: ThemeToken::AxisText.into(),
        }
    }
}

fn key(prefix: &str, index: usize, part: &str) -> SharedStr {
    SharedStr::from(format!("{prefix}-{index}-{part}"))
}

fn hatch(key: SharedStr, from: Point, to: Point, s: f64, paint: Paint) -> RenderCommand {
    RenderCommand::DrawLine {
        key,
        from,
        to,
        paint,
        width: s,
    }
}

/// Pin: ground hatch plus an inverted V whose apex sits half a symbol
/// below the node.
pub fn pin_support(index: usize, node: Point, s: f64, palette: &Palette) -> Vec<RenderCommand> {
    let anchor = node.offset(0.0, s / 2.0);
    let ground = anchor.y + HATCH_DEPTH * s;
    vec![
        hatch(
            key("support", index, "hatch"),
            Point::new(anchor.x - HATCH_HALF_WIDTH * s, ground),
            Point::new(anchor.x + HATCH_HALF_WIDTH * s, ground),
            s,
            palette.support,
        ),
        RenderCommand::DrawPolyline {
            key: key("support", index, "pin"),
            points: vec![
                Point::new(anchor.x - PIN_HALF_BASE * s, ground),
                anchor,
                Point::new(anchor.x + PIN_HALF_BASE * s, ground),
            ],
            paint: palette.support,
            width: s,
        },
    ]
}

/// Roller: ground hatch plus a wheel, one symbol below the node.
pub fn roller_support(index: usize, node: Point, s: f64, palette: &Palette) -> Vec<RenderCommand> {
    let anchor = node.offset(0.0, s);
    let ground = anchor.y + HATCH_DEPTH * s;
    vec![
        hatch(
            key("support", index, "hatch"),
            Point::new(anchor.x - HATCH_HALF_WIDTH * s, ground),
            Point::new(anchor.x + HATCH_HALF_WIDTH * s, ground),
            s,
            palette.support,
        ),
        wheel(key("support", index, "roller"), anchor.offset(0.0, s), s, palette),
    ]
}

/// Y-roller: the roller turned a quarter, one symbol to the left of the
/// node with a vertical wall hatch.
pub fn y_roller_support(
    index: usize,
    node: Point,
    s: f64,
    palette: &Palette,
) -> Vec<RenderCommand> {
    let anchor = node.offset(-s, 0.0);
    let wall = anchor.x - HATCH_DEPTH * s;
    vec![
        hatch(
            key("support", index, "hatch"),
            Point::new(wall, anchor.y - HATCH_HALF_WIDTH * s),
            Point::new(wall, anchor.y + HATCH_HALF_WIDTH * s),
            s,
            palette.support,
        ),
        wheel(key("support", index, "roller"), anchor.offset(-s, 0.0), s, palette),
    ]
}

fn wheel(key: SharedStr, center: Point, s: f64, palette: &Palette) -> RenderCommand {
    RenderCommand::DrawCircle {
        key,
        center,
        radius: ROLLER_RADIUS * s,
        fill: None,
        stroke: Some(palette.support),
        stroke_width: s,
    }
}

/// One fixed-length arrow per nonzero load component. The head touches the
/// node and the arrow points along the component's sign (+y is up).
pub fn load_arrows(
    index: usize,
    node: Point,
    fx: f64,
    fy: f64,
    s: f64,
    palette: &Palette,
) -> Vec<RenderCommand> {
    let mut commands = Vec::new();
    if fx != 0.0 && fx.is_finite() {
        arrow(&mut commands, index, "x", node, (fx.signum(), 0.0), s, palette);
    }
    if fy != 0.0 && fy.is_finite() {
        // Screen y grows downward.
        arrow(&mut commands, index, "y", node, (0.0, -fy.signum()), s, palette);
    }
    commands
}

fn arrow(
    commands: &mut Vec<RenderCommand>,
    index: usize,
    axis: &str,
    head: Point,
    (dx, dy): (f64, f64),
    s: f64,
    palette: &Palette,
) {
    let tail = head.offset(-dx * ARROW_LENGTH * s, -dy * ARROW_LENGTH * s);
    let neck = head.offset(-dx * ARROW_HEAD_LENGTH * s, -dy * ARROW_HEAD_LENGTH * s);
    // Perpendicular to the shaft.
    let (px, py) = (-dy * ARROW_HEAD_HALF_WIDTH * s, dx * ARROW_HEAD_HALF_WIDTH * s);
    commands.push(RenderCommand::DrawLine {
        key: SharedStr::from(format!("load-{index}-{axis}-shaft")),
        from: tail,
        to: neck,
        paint: palette.load,
        width: s / 2.0,
    });
    commands.push(RenderCommand::DrawPolygon {
        key: SharedStr::from(format!("load-{index}-{axis}-head")),
        points: vec![head, neck.offset(px, py), neck.offset(-px, -py)],
        fill: palette.load,
    });
}

pub fn node_dot(index: usize, node: Point, s: f64, palette: &Palette) -> RenderCommand {
    RenderCommand::DrawCircle {
        key: SharedStr::indexed("node", index),
        center: node,
        radius: s,
        fill: Some(palette.node),
        stroke: None,
        stroke_width: 0.0,
    }
}

/// Node index text, above the node unless `below` is set.
pub fn node_label(
    index: usize,
    node: Point,
    s: f64,
    below: bool,
    palette: &Palette,
) -> RenderCommand {
    let font_size = NODE_LABEL_FONT * s;
    let baseline = if below {
        node.y + s + font_size
    } else {
        node.y - 1.5 * s
    };
    RenderCommand::DrawText {
        key: SharedStr::indexed("node-label", index),
        position: Point::new(node.x, baseline),
        text: SharedStr::from(index.to_string()),
        paint: palette.label_text,
        font_size,
        align: TextAlign::Center,
    }
}

pub fn member_line(
    index: usize,
    from: Point,
    to: Point,
    s: f64,
    paint: Paint,
) -> RenderCommand {
    RenderCommand::DrawLine {
        key: SharedStr::indexed("member", index),
        from,
        to,
        paint,
        width: s,
    }
}

/// Rounded index tag on the member midpoint.
pub fn member_label(
    index: usize,
    from: Point,
    to: Point,
    s: f64,
    palette: &Palette,
) -> RenderCommand {
    RenderCommand::DrawTag {
        key: SharedStr::indexed("member-label", index),
        center: from.midpoint(to),
        text: SharedStr::from(index.to_string()),
        fill: palette.tag_fill,
        text_paint: palette.tag_text,
        font_size: TAG_FONT * s,
        corner_radius: s,
        padding: s / 4.0,
    }
}

/// Middle legend value, snapped to zero when it is negligible against the
/// maximum and small in absolute terms.
pub fn legend_midpoint(summary: &ForceSummary) -> f64 {
    let mid = summary.midpoint();
    if mid.abs() <= 0.01 * summary.max.abs() && mid.abs() < 1e-3 {
        0.0
    } else {
        mid
    }
}

/// Four significant digits; magnitudes below `1e-4` print as `0`.
pub fn format_force(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() < 1e-4 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (3 - magnitude).max(0) as usize;
    let step = 10f64.powi(magnitude - 3);
    let rounded = (value / step).round() * step;
    let text = format!("{rounded:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Gradient bar from the maximum (top) to the minimum (bottom) with three
/// labels to its right.
pub fn force_legend(
    summary: &ForceSummary,
    gradient: &ForceGradient,
    bar: Rect,
    s: f64,
    palette: &Palette,
) -> Vec<RenderCommand> {
    let top = color_scale::interpolate(summary.max, summary.max, summary.min, gradient);
    let bottom = color_scale::interpolate(summary.min, summary.max, summary.min, gradient);
    let font_size = LEGEND_FONT * s;
    let label_x = bar.right() + s / 2.0;
    let label = |name: &str, value: f64, y: f64| RenderCommand::DrawText {
        key: SharedStr::from(format!("legend-{name}")),
        position: Point::new(label_x, y + font_size * 0.35),
        text: SharedStr::from(format_force(value)),
        paint: palette.legend_text,
        font_size,
        align: TextAlign::Left,
    };
    vec![
        RenderCommand::DrawGradientBar {
            key: "legend-bar".into(),
            rect: bar,
            top: top.into(),
            bottom: bottom.into(),
            border: Some(palette.legend_border),
        },
        label("max", summary.max, bar.y),
        label("mid", legend_midpoint(summary), bar.y + bar.h / 2.0),
        label("min", summary.min, bar.bottom()),
    ]
}

/// Small x/y direction glyph with its origin at `origin`.
pub fn axes(origin: Point, s: f64, palette: &Palette) -> Vec<RenderCommand> {
    let length = 3.0 * s;
    let head = 0.6 * s;
    let x_tip = origin.offset(length, 0.0);
    let y_tip = origin.offset(0.0, -length);
    vec![
        RenderCommand::DrawPolyline {
            key: "axis-x".into(),
            points: vec![origin, x_tip],
            paint: palette.axis,
            width: s / 3.0,
        },
        RenderCommand::DrawPolygon {
            key: "axis-x-head".into(),
            points: vec![
                x_tip.offset(head, 0.0),
                x_tip.offset(0.0, -head / 2.0),
                x_tip.offset(0.0, head / 2.0),
            ],
            fill: palette.axis,
        },
        RenderCommand::DrawPolyline {
            key: "axis-y".into(),
            points: vec![origin, y_tip],
            paint: palette.axis,
            width: s / 3.0,
        },
        RenderCommand::DrawPolygon {
            key: "axis-y-head".into(),
            points: vec![
                y_tip.offset(0.0, -head),
                y_tip.offset(-head / 2.0, 0.0),
                y_tip.offset(head / 2.0, 0.0),
            ],
            fill: palette.axis,
        },
        RenderCommand::DrawText {
            key: "axis-x-label".into(),
            position: x_tip.offset(head + s / 2.0, s / 2.0),
            text: "x".into(),
            paint: palette.axis_text,
            font_size: 1.5 * s,
            align: TextAlign::Left,
        },
        RenderCommand::DrawText {
            key: "axis-y-label".into(),
            position: y_tip.offset(s / 2.0, 0.0),
            text: "y".into(),
            paint: palette.axis_text,
            font_size: 1.5 * s,
            align: TextAlign::Left,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const S: f64 = 2.0;

    fn line_ends(cmd: &RenderCommand) -> Option<(Point, Point)> {
        match cmd {
            RenderCommand::DrawLine { from, to, .. } => Some((*from, *to)),
            _ => None,
        }
    }

    #[test]
    fn pin_geometry() {
        let cmds = pin_support(0, Point::new(100.0, 50.0), S, &Palette::default());
        assert_eq!(cmds.len(), 2);
        let (from, to) = line_ends(&cmds[0]).unwrap();
        // anchor at y = 51, hatch 3s below it
        assert_eq!(from, Point::new(94.0, 57.0));
        assert_eq!(to, Point::new(106.0, 57.0));
        match &cmds[1] {
            RenderCommand::DrawPolyline { points, .. } => {
                assert_eq!(points[1], Point::new(100.0, 51.0));
                assert_eq!(points[0], Point::new(97.0, 57.0));
                assert_eq!(points[2], Point::new(103.0, 57.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn roller_geometry() {
        let cmds = roller_support(1, Point::new(0.0, 0.0), S, &Palette::default());
        let (from, _) = line_ends(&cmds[0]).unwrap();
        assert_eq!(from.y, 8.0);
        match &cmds[1] {
            RenderCommand::DrawCircle { center, radius, .. } => {
                assert_eq!(*center, Point::new(0.0, 4.0));
                assert_eq!(*radius, 2.5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn y_roller_is_rotated() {
        let cmds = y_roller_support(2, Point::new(20.0, 20.0), S, &Palette::default());
        let (from, to) = line_ends(&cmds[0]).unwrap();
        assert_eq!(from.x, to.x);
        assert_eq!(from.x, 12.0);
        match &cmds[1] {
            RenderCommand::DrawCircle { center, .. } => assert_eq!(*center, Point::new(16.0, 20.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn arrows_point_along_sign_with_fixed_length() {
        let node = Point::new(50.0, 50.0);
        let cmds = load_arrows(3, node, -2.0, 300.0, S, &Palette::default());
        assert_eq!(cmds.len(), 4);
        // -x: tail to the right of the node
        let (tail, _) = line_ends(&cmds[0]).unwrap();
        assert_eq!(tail, Point::new(58.0, 50.0));
        // +y (up): tail below the node on screen, same length regardless of magnitude
        let (tail, _) = line_ends(&cmds[2]).unwrap();
        assert_eq!(tail, Point::new(50.0, 58.0));
        match &cmds[3] {
            RenderCommand::DrawPolygon { points, .. } => assert_eq!(points[0], node),
            other => panic!("unexpected {other:?}"),
        }
        assert!(load_arrows(3, node, 0.0, 0.0, S, &Palette::default()).is_empty());
        assert_eq!(load_arrows(3, node, 0.0, -1.0, S, &Palette::default()).len(), 2);
    }

    #[test]
    fn member_tag_sizes() {
        let (from, to) = (Point::new(0.0, 0.0), Point::new(10.0, 4.0));
        let cmd = member_label(7, from, to, S, &Palette::default());
        match cmd {
            RenderCommand::DrawTag {
                center,
                text,
                font_size,
                corner_radius,
                padding,
                ..
            } => {
                assert_eq!(center, Point::new(5.0, 2.0));
                assert_eq!(text, "7");
                assert_eq!((font_size, corner_radius, padding), (4.0, 2.0, 0.5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn labels_above_or_below() {
        let above = node_label(0, Point::new(0.0, 100.0), S, false, &Palette::default());
        let below = node_label(0, Point::new(0.0, 100.0), S, true, &Palette::default());
        let y = |cmd: &RenderCommand| match cmd {
            RenderCommand::DrawText { position, font_size, .. } => {
                assert_eq!(*font_size, 6.0);
                position.y
            }
            _ => f64::NAN,
        };
        assert!(y(&above) < 100.0);
        assert!(y(&below) > 100.0);
    }

    #[test]
    fn force_formatting() {
        assert_eq!(format_force(12.3456), "12.35");
        assert_eq!(format_force(-2.5), "-2.5");
        assert_eq!(format_force(1000.0), "1000");
        assert_eq!(format_force(123456.0), "123500");
        assert_eq!(format_force(0.00005), "0");
        assert_eq!(format_force(-0.0012346), "-0.001235");
    }

    #[test]
    fn midpoint_snaps_to_zero() {
        let tiny = ForceSummary {
            min: -10.0004,
            max: 10.0,
        };
        assert_eq!(legend_midpoint(&tiny), 0.0);
        let real = ForceSummary { min: -4.0, max: 10.0 };
        assert_eq!(legend_midpoint(&real), 3.0);
    }

    #[test]
    fn legend_runs_max_to_min() {
        let summary = ForceSummary { min: -5.0, max: 5.0 };
        let gradient = ForceGradient::default();
        let bar = Rect::new(90.0, 10.0, 4.0, 40.0);
        let cmds = force_legend(&summary, &gradient, bar, S, &Palette::default());
        match &cmds[0] {
            RenderCommand::DrawGradientBar { top, bottom, .. } => {
                assert_eq!(*top, Paint::Rgb(gradient.high));
                assert_eq!(*bottom, Paint::Rgb(gradient.low));
            }
            other => panic!("unexpected {other:?}"),
        }
        let texts: Vec<String> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText {
                    text,
                    position,
                    align,
                    ..
                } => {
                    // labels read left to right from just past the bar
                    assert!(position.x > bar.right());
                    assert_eq!(*align, TextAlign::Left);
                    Some(text.to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["5", "0", "-5"]);
    }

    #[test]
    fn glyph_keys_are_unique() {
        let palette = Palette::default();
        let p = Point::new(10.0, 10.0);
        let mut cmds = Vec::new();
        cmds.extend(pin_support(0, p, S, &palette));
        cmds.extend(roller_support(1, p, S, &palette));
        cmds.extend(y_roller_support(2, p, S, &palette));
        cmds.extend(load_arrows(0, p, 1.0, 1.0, S, &palette));
        cmds.extend(load_arrows(1, p, 1.0, 1.0, S, &palette));
        cmds.push(node_dot(0, p, S, &palette));
        cmds.push(node_label(0, p, S, false, &palette));
        cmds.push(member_line(0, p, p, S, palette.member));
        cmds.push(member_label(0, p, p, S, &palette));
        cmds.extend(axes(p, S, &palette));
        let keys: Vec<&str> = cmds
            .iter()
            .filter_map(RenderCommand::key)
            .map(SharedStr::as_str)
            .collect();
        let unique: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());
    }
}
