use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Style},
    symbols::Marker,
    text::Line as TextLine,
    widgets::{
        Block, Paragraph,
        canvas::{Canvas, Circle, Context, Line},
    },
};
use trussview_core::{RenderOptions, TrussCanvas, TrussSession};
use trussview_protocol::{Frame, Paint, Point, RenderCommand, ThemeToken};

/// Braille cells hold a 2x4 dot grid.
const DOTS_PER_COLUMN: f64 = 2.0;
const DOTS_PER_ROW: f64 = 4.0;
const GRADIENT_STEPS: usize = 8;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Member => Color::LightBlue,
        ThemeToken::Node | ThemeToken::NodeLabel => Color::White,
        ThemeToken::Support => Color::Rgb(250, 169, 47),
        ThemeToken::LoadArrow => Color::LightRed,
        ThemeToken::MemberLabelFill => Color::DarkGray,
        ThemeToken::MemberLabelText => Color::Cyan,
        ThemeToken::LegendText => Color::Gray,
        ThemeToken::LegendBorder | ThemeToken::Axis | ThemeToken::AxisText => Color::DarkGray,
    }
}

fn paint_to_color(paint: Paint) -> Color {
    match paint {
        Paint::Theme(token) => theme_to_color(token),
        Paint::Rgb(c) => Color::Rgb(c.r, c.g, c.b),
    }
}

fn lerp_paint(top: Paint, bottom: Paint, t: f64) -> Color {
    match (top, bottom) {
        (Paint::Rgb(a), Paint::Rgb(b)) => {
            let mix =
                |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
            Color::Rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
        }
        _ if t < 0.5 => paint_to_color(top),
        _ => paint_to_color(bottom),
    }
}

/// Scene pixels for a canvas of `cols` x `rows` braille cells.
fn dot_frame(cols: u16, rows: u16) -> Frame {
    Frame::new(
        f64::from(cols) * DOTS_PER_COLUMN,
        f64::from(rows) * DOTS_PER_ROW,
    )
}

/// Draws scene commands onto a canvas whose y axis points up.
struct Painter<'a, 'b> {
    ctx: &'a mut Context<'b>,
    height: f64,
}

impl Painter<'_, '_> {
    fn flip(&self, p: Point) -> (f64, f64) {
        (p.x, self.height - p.y)
    }

    fn segment(&mut self, from: Point, to: Point, color: Color) {
        let (x1, y1) = self.flip(from);
        let (x2, y2) = self.flip(to);
        self.ctx.draw(&Line::new(x1, y1, x2, y2, color));
    }

    fn path(&mut self, points: &[Point], closed: bool, color: Color) {
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], color);
        }
        if closed
            && points.len() > 2
            && let (Some(&first), Some(&last)) = (points.first(), points.last())
        {
            self.segment(last, first, color);
        }
    }

    fn text(&mut self, at: Point, text: &str, color: Color) {
        let (x, y) = self.flip(at);
        self.ctx
            .print(x, y, TextLine::styled(text.to_string(), Style::default().fg(color)));
    }

    fn command(&mut self, cmd: &RenderCommand) {
        match cmd {
            RenderCommand::DrawLine {
                from, to, paint, ..
            } => self.segment(*from, *to, paint_to_color(*paint)),
            RenderCommand::DrawPolyline { points, paint, .. } => {
                self.path(points, false, paint_to_color(*paint));
            }
            RenderCommand::DrawPolygon { points, fill, .. } => {
                self.path(points, true, paint_to_color(*fill));
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
                stroke,
                ..
            } => {
                let Some(paint) = stroke.or(*fill) else {
                    return;
                };
                let (x, y) = self.flip(*center);
                self.ctx.draw(&Circle {
                    x,
                    y,
                    radius: *radius,
                    color: paint_to_color(paint),
                });
            }
            RenderCommand::DrawText {
                position,
                text,
                paint,
                ..
            } => self.text(*position, text, paint_to_color(*paint)),
            RenderCommand::DrawTag {
                center,
                text,
                text_paint,
                ..
            } => self.text(*center, text, paint_to_color(*text_paint)),
            RenderCommand::DrawGradientBar {
                rect, top, bottom, ..
            } => {
                for step in 0..=GRADIENT_STEPS {
                    let t = step as f64 / GRADIENT_STEPS as f64;
                    let y = rect.y + rect.h * t;
                    self.segment(
                        Point::new(rect.x, y),
                        Point::new(rect.right(), y),
                        lerp_paint(*top, *bottom, t),
                    );
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

pub struct Viewer {
    session: TrussSession,
    canvas: TrussCanvas,
    options: RenderOptions,
}

impl Viewer {
    pub fn new(session: TrussSession, canvas: TrussCanvas, options: RenderOptions) -> Self {
        Self {
            session,
            canvas,
            options,
        }
    }

    fn header(&self) -> String {
        let model = self.session.model();
        let flag = |on: bool| if on { "on" } else { "off" };
        let mut header = format!(
            " trussview: {} nodes, {} members | n labels {} | m tags {} | a loads {} \
             | x axes {} | q quit ",
            model.node_count(),
            model.member_count(),
            flag(self.options.show_node_labels),
            flag(self.options.show_member_labels),
            flag(self.options.show_force_arrows),
            flag(self.options.show_axes),
        );
        if let Some(summary) = self.session.force_summary() {
            header.push_str(&format!("| axial {:.3} .. {:.3} ", summary.min, summary.max));
        }
        header
    }

    /// Returns `false` when the viewer should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let options = &mut self.options;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('n') => options.show_node_labels = !options.show_node_labels,
            KeyCode::Char('m') => options.show_member_labels = !options.show_member_labels,
            KeyCode::Char('a') => options.show_force_arrows = !options.show_force_arrows,
            KeyCode::Char('x') => options.show_axes = !options.show_axes,
            KeyCode::Char('l') => options.show_legend = !options.show_legend,
            _ => {}
        }
        true
    }
}

pub fn run(mut viewer: Viewer) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|frame| {
            let [header_area, content_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());
            frame.render_widget(
                Paragraph::new(viewer.header())
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                header_area,
            );

            let dots = dot_frame(content_area.width, content_area.height);
            let scene = viewer.canvas.render(
                viewer.session.model(),
                viewer.session.overlay(),
                &dots,
                &viewer.options,
            );
            let widget = Canvas::default()
                .block(Block::default().style(Style::default().bg(Color::Black)))
                .marker(Marker::Braille)
                .x_bounds([0.0, dots.width])
                .y_bounds([0.0, dots.height])
                .paint(|ctx| {
                    let mut painter = Painter {
                        ctx,
                        height: dots.height,
                    };
                    for cmd in &scene.commands {
                        painter.command(cmd);
                    }
                });
            frame.render_widget(widget, content_area);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !viewer.handle_key(key.code)
        {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trussview_protocol::Color as Rgb;

    #[test]
    fn dot_frame_uses_braille_resolution() {
        let frame = dot_frame(80, 20);
        assert_eq!((frame.width, frame.height), (160.0, 80.0));
    }

    #[test]
    fn gradient_steps_blend_fixed_colors() {
        let top = Paint::Rgb(Rgb::rgb(0, 0, 0));
        let bottom = Paint::Rgb(Rgb::rgb(200, 100, 50));
        assert_eq!(lerp_paint(top, bottom, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(lerp_paint(top, bottom, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(lerp_paint(top, bottom, 1.0), Color::Rgb(200, 100, 50));
    }

    #[test]
    fn keys_toggle_layers() {
        let mut viewer = Viewer::new(
            TrussSession::default(),
            TrussCanvas::default(),
            RenderOptions::default(),
        );
        assert!(viewer.handle_key(KeyCode::Char('n')));
        assert!(!viewer.options.show_node_labels);
        assert!(viewer.handle_key(KeyCode::Char('x')));
        assert!(!viewer.options.show_axes);
        assert!(!viewer.handle_key(KeyCode::Char('q')));
        assert!(viewer.header().contains("0 nodes"));
    }
}
