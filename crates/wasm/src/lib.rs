use serde::Serialize;
use trussview_core::api::{self, AnalysisRequest};
use trussview_core::svg::{self, ThemeMode};
use trussview_core::{
    DecodePolicy, ForceGradient, GeometryModel, RenderOptions, ShareState, TrussCanvas,
    TrussSession,
};
use trussview_protocol::Frame;
use wasm_bindgen::prelude::*;

fn js_err(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(js_err)
}

fn policy(strict: bool) -> DecodePolicy {
    if strict {
        DecodePolicy::Strict
    } else {
        DecodePolicy::Lenient
    }
}

fn custom_model(query: &str) -> Result<GeometryModel, JsError> {
    Ok(ShareState::from_query(query, DecodePolicy::Lenient)
        .map_err(js_err)?
        .custom_model())
}

fn parse_options(options_json: Option<String>) -> Result<RenderOptions, JsError> {
    match options_json.as_deref() {
        None | Some("") => Ok(RenderOptions::default()),
        Some(json) => serde_json::from_str(json).map_err(js_err),
    }
}

/// Decode a page query string into the share state, as JSON. In lenient
/// mode unreadable entries are listed under `warnings`.
#[wasm_bindgen]
pub fn decode_share_state(query: &str, strict: bool) -> Result<String, JsError> {
    let state = ShareState::from_query(query, policy(strict)).map_err(js_err)?;
    to_json(&state)
}

/// Encode a share state (as produced by `decode_share_state`) back into a
/// query string without the leading `?`.
#[wasm_bindgen]
pub fn encode_share_state(state_json: &str) -> Result<String, JsError> {
    let state: ShareState = serde_json::from_str(state_json).map_err(js_err)?;
    Ok(state.to_query())
}

/// Render the custom structure in `query`, returning render commands as JSON.
#[wasm_bindgen]
pub fn render_scene(
    query: &str,
    width: f64,
    height: f64,
    dpr: f64,
    options_json: Option<String>,
) -> Result<String, JsError> {
    let model = custom_model(query)?;
    let options = parse_options(options_json)?;
    let frame = Frame { width, height, dpr };
    let scene = TrussCanvas::default().render(&model, None, &frame, &options);
    to_json(&scene.commands)
}

/// Render a parametric structure returned by the geometry endpoint, with the
/// loads and sections of `query` merged in.
#[wasm_bindgen]
pub fn render_geometry(
    geometry_json: &str,
    query: &str,
    width: f64,
    height: f64,
    dpr: f64,
) -> Result<String, JsError> {
    let state = ShareState::from_query(query, DecodePolicy::Lenient).map_err(js_err)?;
    let model = api::parse_geometry(geometry_json)
        .and_then(|payload| payload.into_model(Some(&state.params)))
        .map_err(js_err)?;
    let frame = Frame { width, height, dpr };
    let scene = TrussCanvas::default().render(&model, None, &frame, &RenderOptions::default());
    to_json(&scene.commands)
}

/// Render the custom structure in `query` as a standalone SVG document.
#[wasm_bindgen]
pub fn render_scene_svg(
    query: &str,
    width: f64,
    height: f64,
    dark: bool,
) -> Result<String, JsError> {
    let model = custom_model(query)?;
    let frame = Frame::new(width, height);
    let scene = TrussCanvas::default().render(&model, None, &frame, &RenderOptions::default());
    let mode = if dark { ThemeMode::Dark } else { ThemeMode::Light };
    Ok(svg::render_svg(&scene.commands, &frame, mode))
}

/// Render the custom structure with members colored by the axial forces in
/// `analysis_json`. An unusable or mismatched result renders uncolored.
#[wasm_bindgen]
pub fn render_analysis(
    query: &str,
    analysis_json: &str,
    width: f64,
    height: f64,
) -> Result<String, JsError> {
    let analysis = api::parse_analysis(analysis_json).map_err(js_err)?;
    let mut session = TrussSession::new(custom_model(query)?);
    if analysis.is_usable() {
        session.attach_forces(&analysis.axial_forces(), ForceGradient::default());
    }
    let scene = TrussCanvas::default().render(
        session.model(),
        session.overlay(),
        &Frame::new(width, height),
        &RenderOptions::default(),
    );
    to_json(&scene.commands)
}

/// `{min, max}` of the axial forces, or `null` for a failed solve.
#[wasm_bindgen]
pub fn summarize_forces(analysis_json: &str) -> Result<String, JsError> {
    let analysis = api::parse_analysis(analysis_json).map_err(js_err)?;
    to_json(&analysis.force_summary())
}

/// Body for the custom-analysis endpoint, loads in the solver's sign
/// convention.
#[wasm_bindgen]
pub fn build_analysis_request(query: &str) -> Result<String, JsError> {
    to_json(&AnalysisRequest::from_model(&custom_model(query)?))
}
