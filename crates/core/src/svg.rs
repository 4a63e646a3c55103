//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::borrow::Cow;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use trussview_protocol::{Color, Frame, Paint, Point, RenderCommand, TextAlign, ThemeToken};

/// Average glyph advance as a fraction of the font size, used to size tags
/// without a font engine.
const GLYPH_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Render a list of commands as an SVG document string sized to `frame`.
pub fn render_svg(commands: &[RenderCommand], frame: &Frame, mode: ThemeMode) -> String {
    let (width, height) = (frame.width, frame.height);
    let mut svg = String::with_capacity(commands.len() * 160 + 256);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, mode),
    );

    for cmd in commands {
        match cmd {
            RenderCommand::DrawLine {
                key,
                from,
                to,
                paint,
                width,
            } => {
                let _ = write!(
                    svg,
                    r#"<line id="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{width}" stroke-linecap="round"/>"#,
                    escape_xml(key),
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    paint_css(*paint, mode),
                );
            }
            RenderCommand::DrawPolyline {
                key,
                points,
                paint,
                width,
            } => {
                let _ = write!(
                    svg,
                    r#"<polyline id="{}" points="{}" fill="none" stroke="{}" stroke-width="{width}"/>"#,
                    escape_xml(key),
                    point_list(points),
                    paint_css(*paint, mode),
                );
            }
            RenderCommand::DrawPolygon { key, points, fill } => {
                let _ = write!(
                    svg,
                    r#"<polygon id="{}" points="{}" fill="{}"/>"#,
                    escape_xml(key),
                    point_list(points),
                    paint_css(*fill, mode),
                );
            }
            RenderCommand::DrawCircle {
                key,
                center,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                let fill = fill.map_or(Cow::Borrowed("none"), |p| paint_css(p, mode));
                let _ = write!(
                    svg,
                    r#"<circle id="{}" cx="{}" cy="{}" r="{radius}" fill="{fill}"{}/>"#,
                    escape_xml(key),
                    center.x,
                    center.y,
                    stroke_attr(*stroke, *stroke_width, mode),
                );
            }
            RenderCommand::DrawText {
                key,
                position,
                text,
                paint,
                font_size,
                align,
            } => {
                let _ = write!(
                    svg,
                    r#"<text id="{}" x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{}">{}</text>"#,
                    escape_xml(key),
                    position.x,
                    position.y,
                    paint_css(*paint, mode),
                    anchor(*align),
                    escape_xml(text),
                );
            }
            RenderCommand::DrawTag {
                key,
                center,
                text,
                fill,
                text_paint,
                font_size,
                corner_radius,
                padding,
            } => {
                let w = text.chars().count() as f64 * font_size * GLYPH_ADVANCE + 2.0 * padding;
                let h = font_size + 2.0 * padding;
                let _ = write!(
                    svg,
                    r#"<g id="{}"><rect x="{}" y="{}" width="{w}" height="{h}" rx="{corner_radius}" fill="{}"/><text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="middle" dominant-baseline="central">{}</text></g>"#,
                    escape_xml(key),
                    center.x - w / 2.0,
                    center.y - h / 2.0,
                    paint_css(*fill, mode),
                    center.x,
                    center.y,
                    paint_css(*text_paint, mode),
                    escape_xml(text),
                );
            }
            RenderCommand::DrawGradientBar {
                key,
                rect,
                top,
                bottom,
                border,
            } => {
                let id = format!("{}-gradient", escape_xml(key));
                let _ = write!(
                    svg,
                    r#"<defs><linearGradient id="{id}" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs><rect id="{}" x="{}" y="{}" width="{}" height="{}" fill="url(#{id})"{}/>"#,
                    paint_css(*top, mode),
                    paint_css(*bottom, mode),
                    escape_xml(key),
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    stroke_attr(*border, 1.0, mode),
                );
            }
            RenderCommand::BeginGroup { id, label } => {
                let _ = write!(svg, r#"<g class="{}">"#, escape_xml(id));
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

pub fn resolve_color(token: ThemeToken, mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::Member => "#004aad",
            ThemeToken::Node | ThemeToken::NodeLabel => "#000000",
            ThemeToken::Support => "#faa92f",
            ThemeToken::LoadArrow => "#bf211e",
            ThemeToken::MemberLabelFill => "#ffffff",
            ThemeToken::MemberLabelText => "#0000ff",
            ThemeToken::LegendText => "#1a1a2e",
            ThemeToken::LegendBorder | ThemeToken::Axis | ThemeToken::AxisText => "#5c777c",
        },
        ThemeMode::Dark => match token {
            ThemeToken::Background => "#181818",
            ThemeToken::Member => "#448aff",
            ThemeToken::Node | ThemeToken::NodeLabel | ThemeToken::LegendText => "#ececec",
            ThemeToken::Support => "#ffa726",
            ThemeToken::LoadArrow => "#f44336",
            ThemeToken::MemberLabelFill => "#303030",
            ThemeToken::MemberLabelText => "#9ecbff",
            ThemeToken::LegendBorder | ThemeToken::Axis | ThemeToken::AxisText => "#9e9e9e",
        },
    }
}

fn paint_css(paint: Paint, mode: ThemeMode) -> Cow<'static, str> {
    match paint {
        Paint::Theme(token) => Cow::Borrowed(resolve_color(token, mode)),
        Paint::Rgb(color) => Cow::Owned(color_css(color)),
    }
}

fn color_css(color: Color) -> String {
    if color.a == 255 {
        color.to_hex()
    } else {
        color.to_css()
    }
}

fn stroke_attr(paint: Option<Paint>, width: f64, mode: ThemeMode) -> String {
    match paint {
        Some(paint) if width > 0.0 => {
            format!(r#" stroke="{}" stroke-width="{width}""#, paint_css(paint, mode))
        }
        _ => String::new(),
    }
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
