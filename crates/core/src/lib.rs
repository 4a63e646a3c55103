//! Truss structure model, share-link codec and scene rendering.
//!
//! The core is backend agnostic: [`canvas::TrussCanvas`] turns a
//! [`model::GeometryModel`] into `RenderCommand`s that the wasm, terminal
//! and desktop frontends draw.

pub mod api;
pub mod canvas;
pub mod codec;
pub mod color_scale;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod svg;
pub mod symbols;
pub mod viewport;

pub use canvas::{RenderOptions, Scene, TrussCanvas};
pub use codec::DecodePolicy;
pub use color_scale::ForceGradient;
pub use config::TrussConfig;
pub use error::TrussError;
pub use model::{GeometryModel, Member, Node, SupportType, TrussSession};
pub use query::ShareState;
pub use viewport::{LayoutConfig, ViewportTransform};
