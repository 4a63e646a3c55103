//! Scene composition: lays a geometry model out in a frame and emits its
//! glyphs in draw order.

use serde::{Deserialize, Serialize};
use trussview_protocol::{Frame, Paint, Point, Rect, RenderCommand};

use crate::config::TrussConfig;
use crate::model::{Bounds, ForceOverlay, GeometryModel, SupportType};
use crate::symbols::{self, Palette};
use crate::viewport::{LayoutConfig, ViewportTransform};

/// Width, in symbol sizes, kept free right of the scene for the legend.
const LEGEND_COLUMN: f64 = 14.0;

/// Which optional layers to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub show_node_labels: bool,
    pub show_member_labels: bool,
    pub show_force_arrows: bool,
    pub show_axes: bool,
    /// Only takes effect when a force overlay is present.
    pub show_legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_node_labels: true,
            show_member_labels: true,
            show_force_arrows: true,
            show_axes: true,
            show_legend: true,
        }
    }
}

/// The output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub commands: Vec<RenderCommand>,
    /// `None` when there was nothing to lay out.
    pub transform: Option<ViewportTransform>,
}

impl Scene {
    fn empty() -> Self {
        Self {
            commands: Vec::new(),
            transform: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrussCanvas {
    layout: LayoutConfig,
    palette: Palette,
}

impl TrussCanvas {
    pub fn new(layout: LayoutConfig, palette: Palette) -> Self {
        Self { layout, palette }
    }

    pub fn from_config(config: &TrussConfig) -> Self {
        Self::new(config.layout, config.palette.resolve())
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Lay `model` out in `frame` and emit members, member labels,
    /// supports, nodes, node labels, load arrows, axes and legend, in that
    /// order.
    pub fn render(
        &self,
        model: &GeometryModel,
        overlay: Option<&ForceOverlay>,
        frame: &Frame,
        options: &RenderOptions,
    ) -> Scene {
        let Some(bounds) = model.bounds() else {
            return Scene::empty();
        };
        let legend_overlay = overlay.filter(|_| options.show_legend);
        let Some((transform, legend_x)) = self.fit(&bounds, frame, legend_overlay.is_some()) else {
            log::debug!("frame {}x{} cannot host a scene", frame.width, frame.height);
            return Scene::empty();
        };
        let s = transform.symbol_size();
        let palette = &self.palette;
        let screen: Vec<Point> = model
            .nodes()
            .iter()
            .map(|n| transform.to_screen(n.x, n.y))
            .collect();
        let members: Vec<(usize, Point, Point)> = model
            .members()
            .iter()
            .enumerate()
            .filter_map(|(i, m)| Some((i, *screen.get(m.start)?, *screen.get(m.end)?)))
            .collect();

        let mut commands =
            Vec::with_capacity(model.node_count() * 6 + model.member_count() * 2 + 16);

        group(&mut commands, "members", |out| {
            for &(i, from, to) in &members {
                let paint = overlay
                    .and_then(|o| o.member_color(i))
                    .map_or(palette.member, Paint::Rgb);
                out.push(symbols::member_line(i, from, to, s, paint));
            }
        });

        if options.show_member_labels {
            group(&mut commands, "member-labels", |out| {
                for &(i, from, to) in &members {
                    out.push(symbols::member_label(i, from, to, s, palette));
                }
            });
        }

        group(&mut commands, "supports", |out| {
            for (i, (node, &at)) in model.nodes().iter().zip(&screen).enumerate() {
                match node.support {
                    SupportType::Free => {}
                    SupportType::Pin => out.extend(symbols::pin_support(i, at, s, palette)),
                    SupportType::Roller => out.extend(symbols::roller_support(i, at, s, palette)),
                    SupportType::YRoller => {
                        out.extend(symbols::y_roller_support(i, at, s, palette))
                    }
                }
            }
        });

        group(&mut commands, "nodes", |out| {
            for (i, &at) in screen.iter().enumerate() {
                out.push(symbols::node_dot(i, at, s, palette));
            }
        });

        if options.show_node_labels {
            group(&mut commands, "node-labels", |out| {
                for (i, (node, &at)) in model.nodes().iter().zip(&screen).enumerate() {
                    let below = is_interior_bottom(node.x, node.y, &bounds);
                    out.push(symbols::node_label(i, at, s, below, palette));
                }
            });
        }

        if options.show_force_arrows {
            group(&mut commands, "loads", |out| {
                for (i, (node, &at)) in model.nodes().iter().zip(&screen).enumerate() {
                    out.extend(symbols::load_arrows(i, at, node.fx, node.fy, s, palette));
                }
            });
        }

        let scene = transform.scene_rect();
        if options.show_axes {
            let origin = Point::new(scene.x + 1.5 * s, frame.height - 1.5 * s);
            group(&mut commands, "axes", |out| {
                out.extend(symbols::axes(origin, s, palette));
            });
        }

        if let (Some(overlay), Some(legend_x)) = (legend_overlay, legend_x) {
            let bar = Rect::new(legend_x + s, scene.y + s, s, scene.h / 2.0);
            group(&mut commands, "legend", |out| {
                out.extend(symbols::force_legend(
                    overlay.summary(),
                    overlay.gradient(),
                    bar,
                    s,
                    palette,
                ));
            });
        }

        Scene {
            commands,
            transform: Some(transform),
        }
    }

    /// Fit the scene, narrowing the frame by a legend column when one is
    /// wanted. The second value is the column's left edge; it is `None` when
    /// no legend is drawn or the frame is too narrow to spare the column.
    fn fit(
        &self,
        bounds: &Bounds,
        frame: &Frame,
        legend: bool,
    ) -> Option<(ViewportTransform, Option<f64>)> {
        let full = ViewportTransform::fit(bounds, frame, &self.layout)?;
        if !legend {
            return Some((full, None));
        }
        let column = LEGEND_COLUMN * full.symbol_size();
        let narrowed = Frame {
            width: frame.width - column,
            ..*frame
        };
        match ViewportTransform::fit(bounds, &narrowed, &self.layout) {
            Some(transform) => Some((transform, Some(narrowed.width))),
            None => {
                log::debug!("no room for a legend in a {}px wide frame", frame.width);
                Some((full, None))
            }
        }
    }
}

/// Bottom-chord nodes between the two ends get their label underneath.
fn is_interior_bottom(x: f64, y: f64, bounds: &Bounds) -> bool {
    y == bounds.min_y && x > bounds.min_x && x < bounds.max_x
}

fn group(commands: &mut Vec<RenderCommand>, id: &str, body: impl FnOnce(&mut Vec<RenderCommand>)) {
    commands.push(RenderCommand::BeginGroup {
        id: id.into(),
        label: None,
    });
    body(commands);
    commands.push(RenderCommand::EndGroup);
}
