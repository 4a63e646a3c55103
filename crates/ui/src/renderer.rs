use egui::{Align2, CornerRadius, FontId, Mesh, Pos2, Rect, Shape, Stroke, StrokeKind};
use trussview_core::svg::ThemeMode;
use trussview_protocol::{Point, RenderCommand, TextAlign};

use crate::theme;

fn pos(p: &Point, offset: Pos2) -> Pos2 {
    Pos2::new(p.x as f32 + offset.x, p.y as f32 + offset.y)
}

fn rect(r: &trussview_protocol::Rect, offset: Pos2) -> Rect {
    Rect::from_min_size(
        Pos2::new(r.x as f32 + offset.x, r.y as f32 + offset.y),
        egui::vec2(r.w as f32, r.h as f32),
    )
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area. Text
/// positions are baselines.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawLine {
                from,
                to,
                paint,
                width,
                ..
            } => {
                painter.line_segment(
                    [pos(from, offset), pos(to, offset)],
                    Stroke::new(*width as f32, theme::paint(*paint, mode)),
                );
            }

            RenderCommand::DrawPolyline {
                points,
                paint,
                width,
                ..
            } => {
                let points = points.iter().map(|p| pos(p, offset)).collect();
                painter.add(Shape::line(
                    points,
                    Stroke::new(*width as f32, theme::paint(*paint, mode)),
                ));
            }

            RenderCommand::DrawPolygon { points, fill, .. } => {
                let points = points.iter().map(|p| pos(p, offset)).collect();
                painter.add(Shape::convex_polygon(
                    points,
                    theme::paint(*fill, mode),
                    Stroke::NONE,
                ));
            }

            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
                stroke,
                stroke_width,
                ..
            } => {
                let fill = fill.map_or(egui::Color32::TRANSPARENT, |p| theme::paint(p, mode));
                let stroke = stroke.map_or(Stroke::NONE, |p| {
                    Stroke::new(*stroke_width as f32, theme::paint(p, mode))
                });
                painter.circle(pos(center, offset), *radius as f32, fill, stroke);
            }

            RenderCommand::DrawText {
                position,
                text,
                paint,
                font_size,
                align,
                ..
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_BOTTOM,
                    TextAlign::Center => Align2::CENTER_BOTTOM,
                    TextAlign::Right => Align2::RIGHT_BOTTOM,
                };
                painter.text(
                    pos(position, offset),
                    anchor,
                    text.as_str(),
                    FontId::proportional(size),
                    theme::paint(*paint, mode),
                );
            }

            RenderCommand::DrawTag {
                center,
                text,
                fill,
                text_paint,
                font_size,
                corner_radius,
                padding,
                ..
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let text_color = theme::paint(*text_paint, mode);
                let font = FontId::proportional(size);
                let galley = painter.layout_no_wrap(text.to_string(), font, text_color);
                let center = pos(center, offset);
                let tag = Rect::from_center_size(
                    center,
                    galley.size() + egui::Vec2::splat(2.0 * *padding as f32),
                );
                let radius = corner_radius.clamp(0.0, f64::from(u8::MAX)) as u8;
                painter.rect_filled(tag, CornerRadius::same(radius), theme::paint(*fill, mode));
                painter.galley(center - galley.size() / 2.0, galley, text_color);
            }

            RenderCommand::DrawGradientBar {
                rect: r,
                top,
                bottom,
                border,
                ..
            } => {
                let bar = rect(r, offset);
                let (top, bottom) = (theme::paint(*top, mode), theme::paint(*bottom, mode));
                let mut mesh = Mesh::default();
                mesh.colored_vertex(bar.left_top(), top);
                mesh.colored_vertex(bar.right_top(), top);
                mesh.colored_vertex(bar.right_bottom(), bottom);
                mesh.colored_vertex(bar.left_bottom(), bottom);
                mesh.add_triangle(0, 1, 2);
                mesh.add_triangle(0, 2, 3);
                painter.add(Shape::mesh(mesh));
                if let Some(border) = border {
                    painter.rect_stroke(
                        bar,
                        CornerRadius::ZERO,
                        Stroke::new(1.0, theme::paint(*border, mode)),
                        StrokeKind::Outside,
                    );
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic, no visual effect in egui
            }
        }
    }
}
