use egui::Color32;
use trussview_core::svg::ThemeMode;
use trussview_protocol::{Paint, ThemeToken};

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
}

fn resolve_dark(token: ThemeToken) -> Color32 {
    // Catppuccin Mocha
    use ThemeToken::*;
    match token {
        Background => Color32::from_rgb(0x1e, 0x1e, 0x2e), // Base
        Member => Color32::from_rgb(0x89, 0xb4, 0xfa),     // Blue
        Node | NodeLabel => Color32::from_rgb(0xcd, 0xd6, 0xf4), // Text
        Support => Color32::from_rgb(0xfa, 0xb3, 0x87),    // Peach
        LoadArrow => Color32::from_rgb(0xf3, 0x8b, 0xa8),  // Red
        MemberLabelFill => Color32::from_rgb(0x31, 0x32, 0x44), // Surface0
        MemberLabelText => Color32::from_rgb(0x89, 0xdc, 0xeb), // Sky
        LegendText => Color32::from_rgb(0xba, 0xc2, 0xde), // Subtext1
        LegendBorder | Axis | AxisText => Color32::from_rgb(0x7f, 0x84, 0x9c), // Overlay1
    }
}

fn resolve_light(token: ThemeToken) -> Color32 {
    use ThemeToken::*;
    match token {
        Background => Color32::WHITE,
        Member => Color32::from_rgb(0x00, 0x4a, 0xad),
        Node | NodeLabel => Color32::BLACK,
        Support => Color32::from_rgb(0xfa, 0xa9, 0x2f),
        LoadArrow => Color32::from_rgb(0xbf, 0x21, 0x1e),
        MemberLabelFill => Color32::WHITE,
        MemberLabelText => Color32::BLUE,
        LegendText => Color32::from_rgb(0x1a, 0x1a, 0x2e),
        LegendBorder | Axis | AxisText => Color32::from_rgb(92, 119, 124),
    }
}

pub fn paint(paint: Paint, mode: ThemeMode) -> Color32 {
    match paint {
        Paint::Theme(token) => resolve(token, mode),
        Paint::Rgb(c) => Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a),
    }
}
