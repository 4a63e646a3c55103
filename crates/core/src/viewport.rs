//! Aspect-fit mapping from model coordinates (+y up) to screen pixels
//! (+y down).

use serde::{Deserialize, Serialize};
use trussview_protocol::{Frame, Point, Rect};

use crate::model::Bounds;

/// Margins are in multiples of the node size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub side_margin: f64,
    pub bottom_margin: f64,
    /// Floor applied to the structure's width and height.
    pub min_extent: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            side_margin: 4.0,
            bottom_margin: 5.0,
            min_extent: 1e-3,
        }
    }
}

impl LayoutConfig {
    pub const SIDE_MARGIN_RANGE: (f64, f64) = (4.0, 5.0);
    pub const BOTTOM_MARGIN_RANGE: (f64, f64) = (5.0, 6.0);

    /// The same configuration with every value forced into its accepted
    /// range.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f64, (lo, hi): (f64, f64), fallback: f64| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(lo, hi)
            }
        };
        Self {
            side_margin: clamp(self.side_margin, Self::SIDE_MARGIN_RANGE, defaults.side_margin),
            bottom_margin: clamp(
                self.bottom_margin,
                Self::BOTTOM_MARGIN_RANGE,
                defaults.bottom_margin,
            ),
            min_extent: if self.min_extent > 0.0 && self.min_extent.is_finite() {
                self.min_extent
            } else {
                defaults.min_extent
            },
        }
    }
}

/// One render pass's mapping. Recomputed from scratch whenever the frame or
/// the node set changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    /// Model-space node size, `max(3H, W) / 100`.
    pub node_size: f64,
    /// Model-space margins.
    pub border: f64,
    pub border_bottom: f64,
    pub min_x: f64,
    pub min_y: f64,
    /// Floored structure extents.
    pub width: f64,
    pub height: f64,
}

impl ViewportTransform {
    pub fn fit(bounds: &Bounds, frame: &Frame, config: &LayoutConfig) -> Option<Self> {
        Self::fit_extent(
            bounds.min_x,
            bounds.min_y,
            bounds.width(),
            bounds.height(),
            frame,
            config,
        )
    }

    /// `None` for a degenerate frame or non-finite geometry.
    pub fn fit_extent(
        min_x: f64,
        min_y: f64,
        width: f64,
        height: f64,
        frame: &Frame,
        config: &LayoutConfig,
    ) -> Option<Self> {
        if frame.is_degenerate() || !(min_x.is_finite() && min_y.is_finite()) {
            return None;
        }
        if !(width.is_finite() && height.is_finite()) {
            return None;
        }
        let config = config.clamped();
        let width = width.max(config.min_extent);
        let height = height.max(config.min_extent);

        let node_size = (3.0 * height).max(width) / 100.0;
        let border = config.side_margin * node_size;
        let border_bottom = config.bottom_margin * node_size;
        let scene_width = width + 2.0 * border;
        let scene_height = height + border + border_bottom;
        let scale = (frame.height / scene_height).min(frame.width / scene_width);
        let offset_x = (frame.width - scene_width * scale) / 2.0;

        log::debug!(
            "layout {width}x{height} into {}x{}: scale {scale:.4}, node size {node_size:.4}",
            frame.width,
            frame.height
        );

        Some(Self {
            scale,
            offset_x,
            frame_width: frame.width,
            frame_height: frame.height,
            node_size,
            border,
            border_bottom,
            min_x,
            min_y,
            width,
            height,
        })
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.offset_x + (self.border + x - self.min_x) * self.scale,
            self.frame_height - (self.border_bottom + y - self.min_y) * self.scale,
        )
    }

    /// Symbol size in pixels.
    pub fn symbol_size(&self) -> f64 {
        self.node_size * self.scale
    }

    pub fn scene_width(&self) -> f64 {
        self.width + 2.0 * self.border
    }

    pub fn scene_height(&self) -> f64 {
        self.height + self.border + self.border_bottom
    }

    /// Screen-space rectangle covered by the scaled scene, bottom-aligned.
    pub fn scene_rect(&self) -> Rect {
        let w = self.scene_width() * self.scale;
        let h = self.scene_height() * self.scale;
        Rect::new(self.offset_x, self.frame_height - h, w, h)
    }
}
