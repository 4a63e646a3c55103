pub mod commands;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use shared_str::SharedStr;
pub use theme::{Paint, ThemeToken};
pub use types::{Color, Frame, Point, Rect};
