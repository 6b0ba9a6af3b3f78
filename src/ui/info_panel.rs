use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::app::ClickHistApp;
use crate::session::{PointSummary, Session};

fn summary_grid(ui: &mut Ui, id: &str, summary: &PointSummary) {
    egui::Grid::new(id).num_columns(2).striped(true).show(ui, |ui| {
        ui.label("Time");
        ui.label(summary.location.timestamp.to_string());
        ui.end_row();
        ui.label("Location");
        ui.label(summary.location_string());
        ui.end_row();
        ui.label("Values");
        ui.label(&summary.values);
        ui.end_row();
        ui.label("Percentiles");
        ui.label(summary.percentile_string());
        ui.end_row();
        ui.label("Flat index");
        ui.label(summary.flat_index.to_string());
        ui.end_row();
        let idx = summary.location.index;
        ui.label("Grid index");
        ui.label(format!("lon {} lat {} time {}", idx.lon, idx.lat, idx.time));
        ui.end_row();
    });
}

fn quantile_table(ui: &mut Ui, session: &Session) {
    let x = session.x_axis();
    let y = session.y_axis();
    let rows = x.quantiles.len().max(y.quantiles.len());
    if rows == 0 {
        ui.weak("No quantiles configured");
        return;
    }

    TableBuilder::new(ui)
        .id_salt("quantiles")
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(50.0).resizable(false))
        .columns(Column::remainder().clip(true), 2)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("%");
            });
            header.col(|ui| {
                ui.strong(&x.config.name);
            });
            header.col(|ui| {
                ui.strong(&y.config.name);
            });
        })
        .body(|body| {
            body.rows(18.0, rows, |mut row| {
                let i = row.index();
                let percentile = x
                    .quantiles
                    .get(i)
                    .or_else(|| y.quantiles.get(i))
                    .map(|q| q.percentile)
                    .unwrap_or_default();
                row.col(|ui| {
                    ui.label(format!("{}", percentile));
                });
                row.col(|ui| {
                    if let Some(q) = x.quantiles.get(i) {
                        ui.label(x.config.format.format(q.value));
                    }
                });
                row.col(|ui| {
                    if let Some(q) = y.quantiles.get(i) {
                        ui.label(y.config.format.format(q.value));
                    }
                });
            });
        });
}

/// Right-hand panel: current preview, last commit and session facts
pub fn render_info_panel(app: &mut ClickHistApp, ui: &mut Ui) {
    let Some(session) = app.state.session.as_ref() else {
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Preview");
        match &app.state.ui.preview {
            Some(summary) => {
                summary_grid(ui, "preview_grid", summary);
                let hint = app.state.dispatcher.hint();
                if !hint.is_empty() {
                    ui.label(
                        RichText::new(format!("Click the point again to {}", hint))
                            .color(Color32::from_rgb(255, 0, 255)),
                    );
                }
            }
            None => {
                ui.weak("Click a point to preview it");
            }
        }

        ui.separator();
        ui.heading("Last case");
        match &app.state.ui.last_commit {
            Some(summary) => summary_grid(ui, "commit_grid", summary),
            None => {
                ui.weak("Nothing committed yet");
            }
        }
        ui.label(format!("Cases dispatched: {}", app.state.dispatcher.dispatched()));

        ui.separator();
        eframe::egui::CollapsingHeader::new("📊 Session")
            .id_salt("session_info")
            .default_open(true)
            .show(ui, |ui| {
                let dims = session.dataset().dims();
                let histogram = session.histogram();
                let (kx, ky) = histogram.shape();
                if !session.config().metadata.is_empty() {
                    ui.label(&session.config().metadata);
                }
                ui.label(format!(
                    "{} samples ({} lon x {} lat x {} time)",
                    session.dataset().len(),
                    dims.lon_len(),
                    dims.lat_len(),
                    dims.time_len()
                ));
                ui.label(format!(
                    "{} binned, {} occupied of {} bins",
                    histogram.total(),
                    histogram.occupied_count(),
                    kx * ky
                ));
                ui.label(format!(
                    "{} plotted points (at most {} per bin)",
                    session.points().len(),
                    session.config().max_plotted_in_bin
                ));
            });

        eframe::egui::CollapsingHeader::new("📐 Quantiles")
            .id_salt("quantiles_info")
            .default_open(false)
            .show(ui, |ui| quantile_table(ui, session));
    });
}

/// Bottom bar: config file, protocol position and the last error
pub fn render_status_bar(app: &mut ClickHistApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if let Some(name) = app.state.config_path.as_ref().and_then(|p| p.file_name()) {
            ui.label(format!("📁 {}", name.to_string_lossy()));
            ui.separator();
        }
        if let Some(id) = app.state.click.last_nearest() {
            ui.label(format!("Previewing point {}", id));
        } else {
            ui.label("Awaiting first click");
        }

        let mut dismiss = false;
        if let Some(msg) = &app.state.ui.error_message {
            ui.separator();
            ui.colored_label(Color32::from_rgb(255, 100, 100), format!("⚠ {}", msg));
            dismiss = ui.small_button("✖").on_hover_text("Dismiss").clicked();
        }
        if dismiss {
            app.state.ui.clear_error();
        }
    });
}
