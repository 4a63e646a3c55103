use eframe::egui;
use trussview_core::model::TrussCategory;
use trussview_core::svg::ThemeMode;
use trussview_core::{RenderOptions, ShareState, TrussCanvas, TrussConfig, TrussSession};
use trussview_protocol::Frame;

use crate::renderer;

/// Main application state.
pub struct TrussApp {
    state: ShareState,
    session: TrussSession,
    canvas: TrussCanvas,
    config: TrussConfig,
    options: RenderOptions,
    theme_mode: ThemeMode,
    /// Contents of the paste-a-link field.
    link_input: String,
    /// Error message to display.
    error: Option<String>,
}

impl TrussApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        #[cfg(target_arch = "wasm32")]
        let config = TrussConfig::default();
        #[cfg(not(target_arch = "wasm32"))]
        let config = TrussConfig::load_or_default();

        let mut app = Self {
            state: ShareState::default(),
            session: TrussSession::default(),
            canvas: TrussCanvas::from_config(&config),
            options: config.render_options(),
            config,
            theme_mode: ThemeMode::Dark,
            link_input: String::new(),
            error: None,
        };

        // On WASM the share state lives in the page's own query string.
        #[cfg(target_arch = "wasm32")]
        {
            let search = web_sys::window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if !search.is_empty() {
                app.load_link(&search);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(link) = std::env::args().nth(1) {
                app.load_link(&link);
            }
        }

        app
    }

    fn load_link(&mut self, link: &str) {
        let policy = self.config.codec.policy;
        let parsed = if link.contains("://") {
            ShareState::from_url(link, policy).map_err(|e| e.to_string())
        } else {
            ShareState::from_query(link, policy).map_err(|e| e.to_string())
        };
        match parsed {
            Ok(state) => {
                for warning in &state.warnings {
                    log::warn!("{warning}");
                }
                self.error = if state.category == TrussCategory::Custom {
                    None
                } else {
                    Some(format!(
                        "{} links are generated by the analysis service; \
                         only custom structures draw offline",
                        state.category
                    ))
                };
                self.session.replace_model(state.custom_model());
                self.link_input = state.to_query();
                self.state = state;
            }
            Err(e) => self.error = Some(format!("Invalid link: {e}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_results(&mut self, path: &std::path::Path) {
        let analysis = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| trussview_core::api::parse_analysis(&json).map_err(|e| e.to_string()));
        match analysis {
            Ok(analysis) if analysis.is_usable() => {
                let attached = self
                    .session
                    .attach_forces(&analysis.axial_forces(), self.config.gradient())
                    .is_some();
                self.error = (!attached)
                    .then(|| "Results do not match this structure".to_string());
            }
            Ok(analysis) => {
                self.error = Some(
                    analysis
                        .error
                        .unwrap_or_else(|| "Structure is unstable".to_string()),
                );
            }
            Err(e) => self.error = Some(format!("Failed to read results: {e}")),
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("trussview");
            ui.separator();

            let field = ui.add(
                egui::TextEdit::singleline(&mut self.link_input)
                    .hint_text("Paste a share link")
                    .desired_width(280.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                let link = self.link_input.clone();
                self.load_link(&link);
            }
            if ui.button("Copy link").clicked() {
                ctx.copy_text(format!("?{}", self.state.to_query()));
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                if ui.button("Open results").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Analysis", &["json"])
                        .pick_file()
                    {
                        self.load_results(&path);
                    }
                }
            }

            ui.separator();
            ui.checkbox(&mut self.options.show_node_labels, "Node labels");
            ui.checkbox(&mut self.options.show_member_labels, "Member labels");
            ui.checkbox(&mut self.options.show_force_arrows, "Loads");
            ui.checkbox(&mut self.options.show_axes, "Axes");
            ui.checkbox(&mut self.options.show_legend, "Legend");
            ui.separator();

            let theme_label = match self.theme_mode {
                ThemeMode::Dark => "Dark",
                ThemeMode::Light => "Light",
            };
            if ui.button(theme_label).clicked() {
                self.theme_mode = match self.theme_mode {
                    ThemeMode::Dark => {
                        ctx.set_visuals(egui::Visuals::light());
                        ThemeMode::Light
                    }
                    ThemeMode::Light => {
                        ctx.set_visuals(egui::Visuals::dark());
                        ThemeMode::Dark
                    }
                };
            }
        });
    }
}

impl eframe::App for TrussApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ctx, ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                } else {
                    let model = self.session.model();
                    ui.label(format!(
                        "{} nodes | {} members",
                        model.node_count(),
                        model.member_count()
                    ));
                    if let Some(summary) = self.session.force_summary() {
                        ui.separator();
                        ui.label(format!("Axial force {:.4} .. {:.4}", summary.min, summary.max));
                    }
                    if !self.state.warnings.is_empty() {
                        ui.separator();
                        let replaced = self.state.warnings.len();
                        ui.colored_label(
                            egui::Color32::YELLOW,
                            format!("{replaced} link entries replaced with defaults"),
                        );
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.model().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Paste a custom truss share link to draw it");
                });
                return;
            }

            let available = ui.available_rect_before_wrap();
            let frame = Frame {
                width: f64::from(available.width()),
                height: f64::from(available.height()),
                dpr: f64::from(ctx.pixels_per_point()),
            };
            let scene = self.canvas.render(
                self.session.model(),
                self.session.overlay(),
                &frame,
                &self.options,
            );
            let painter = ui.painter_at(available);
            renderer::render_commands(&painter, &scene.commands, available.min, self.theme_mode);
        });
    }
}
