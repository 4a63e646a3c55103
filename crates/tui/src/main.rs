mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use trussview_core::api;
use trussview_core::model::TrussCategory;
use trussview_core::svg::{self, ThemeMode};
use trussview_core::{DecodePolicy, ShareState, TrussCanvas, TrussConfig, TrussSession};
use trussview_protocol::Frame;

/// View a truss share link in the terminal or export it as SVG.
#[derive(Debug, Parser)]
#[command(name = "trussview", version)]
struct Args {
    /// Full share link or just its query string (`cat=custom&cnodes=...`).
    link: String,

    /// Write an SVG to this file instead of opening the viewer.
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    #[arg(long, default_value_t = 900.0)]
    width: f64,

    #[arg(long, default_value_t = 300.0)]
    height: f64,

    /// Light theme for the SVG export.
    #[arg(long)]
    light: bool,

    /// Reject links with unreadable entries instead of substituting defaults.
    #[arg(long)]
    strict: bool,

    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Geometry endpoint response for a parametric link.
    #[arg(long, value_name = "FILE")]
    geometry: Option<PathBuf>,

    /// Analysis endpoint response used to color members by axial force.
    #[arg(long, value_name = "FILE")]
    analysis: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrussConfig::load_from_file(path)?,
        None => TrussConfig::load_or_default(),
    };
    let policy = if args.strict {
        DecodePolicy::Strict
    } else {
        config.codec.policy
    };

    let state = if args.link.contains("://") {
        ShareState::from_url(&args.link, policy)?
    } else {
        ShareState::from_query(&args.link, policy)?
    };
    for warning in &state.warnings {
        log::warn!("{warning}");
    }

    let model = match (&args.geometry, state.category) {
        (Some(path), _) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            api::parse_geometry(&json)?.into_model(Some(&state.params))?
        }
        (None, TrussCategory::Custom) => state.custom_model(),
        (None, category) => bail!(
            "{category} links describe a generated structure; pass its geometry with --geometry"
        ),
    };

    let mut session = TrussSession::new(model);
    if let Some(path) = &args.analysis {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let analysis = api::parse_analysis(&json)?;
        if !analysis.is_usable() {
            bail!(
                "analysis did not produce a stable solution: {}",
                analysis.error.as_deref().unwrap_or("unstable structure")
            );
        }
        if session
            .attach_forces(&analysis.axial_forces(), config.gradient())
            .is_none()
        {
            log::warn!("analysis results do not match the structure; showing it uncolored");
        }
    }

    let canvas = TrussCanvas::from_config(&config);
    let options = config.render_options();

    if let Some(path) = &args.svg {
        let frame = Frame::new(args.width, args.height);
        let scene = canvas.render(session.model(), session.overlay(), &frame, &options);
        let mode = if args.light {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        std::fs::write(path, svg::render_svg(&scene.commands, &frame, mode))
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
        return Ok(());
    }

    renderer::run(renderer::Viewer::new(session, canvas, options))
}
