use crate::app::ClickHistApp;
use std::path::PathBuf;

fn open(app: &mut ClickHistApp, path: PathBuf) {
    if let Err(e) = app.open_config(path) {
        log::error!("failed to open session: {}", e);
        app.state.ui.set_error(e.user_message());
    }
}

/// Render the toolbar: session config, axis scales and overlays
pub fn render_toolbar(app: &mut ClickHistApp, ctx: &eframe::egui::Context, ui: &mut eframe::egui::Ui) {
    ui.horizontal(|ui| {
        // File operations
        if ui.button("📂").on_hover_text("Open Session Config").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Session Config", &["json"])
                .pick_file()
            {
                open(app, path);
            }
        }

        // Recent configs menu
        if !app.state.recent_configs.is_empty() {
            eframe::egui::ComboBox::from_id_salt("recent_configs")
                .selected_text("📋")
                .show_ui(ui, |ui| {
                    ui.label("Recent Configs:");
                    ui.separator();
                    for path in app.state.recent_configs.clone() {
                        if let Some(name) = path.file_name() {
                            if ui.button(name.to_string_lossy()).clicked() {
                                open(app, path.clone());
                            }
                        }
                    }
                });
        }

        if app.state.has_session() {
            ui.separator();
            let view = &mut app.state.view;
            let mut rescaled = false;
            ui.add_enabled_ui(view.x_log_allowed, |ui| {
                rescaled |= ui
                    .toggle_value(&mut view.x_log, "log x")
                    .on_hover_text("Logarithmic x axis")
                    .changed();
            });
            ui.add_enabled_ui(view.y_log_allowed, |ui| {
                rescaled |= ui
                    .toggle_value(&mut view.y_log, "log y")
                    .on_hover_text("Logarithmic y axis")
                    .changed();
            });
            if rescaled {
                view.reset_bounds = true;
            }

            ui.separator();
            ui.toggle_value(&mut view.show_scatter, "•").on_hover_text("Plotted points");
            ui.toggle_value(&mut view.show_quantiles, "┆").on_hover_text("Quantile lines");
            ui.toggle_value(&mut view.show_grid, "⊞").on_hover_text("Grid (G)");

            ui.separator();
            if ui.button("🔄").on_hover_text("Reset view (R)").clicked() {
                app.state.view.reset_plot_bounds();
            }
        }

        ui.separator();
        if ui
            .button(if app.state.view.dark_mode { "🌙" } else { "☀" })
            .on_hover_text("Toggle theme (T)")
            .clicked()
        {
            app.state.view.toggle_dark_mode();
        }
        if ui.button("❓").on_hover_text("Help (F1)").clicked() {
            app.state.view.show_help = !app.state.view.show_help;
        }
    });

    // Handle drag and drop using Option combinators
    let dropped = ctx.input(|i| {
        i.raw
            .dropped_files
            .first()
            .and_then(|f| f.path.clone())
    });
    if let Some(path) = dropped {
        open(app, path);
    }
}
