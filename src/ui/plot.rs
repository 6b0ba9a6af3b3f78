use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{LineStyle, MarkerShape, Plot, PlotPoints, Points, Polygon, VLine, HLine};

use crate::app::ClickHistApp;
use crate::constants::plot::{HIGHLIGHT_RADIUS, MARKER_RADIUS};
use crate::heat::{heat_rgb, normalized_count};
use crate::pick::{AxisKind, AxisScale, AxisScales, ClickEvent, ClickPoint};

const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 0, 255);
const QUANTILE_COLOR: Color32 = Color32::from_rgb(160, 160, 160);

/// Tick label for a plotted coordinate
fn tick_label(kind: AxisKind, plotted: f64) -> String {
    match kind {
        AxisKind::Log => {
            let value = kind.inverse(plotted);
            if (0.01..1000.0).contains(&value) {
                format!("{}", (value * 1000.0).round() / 1000.0)
            } else {
                format!("{:.0e}", value)
            }
        }
        AxisKind::Linear => {
            if plotted.abs() < 0.01 && plotted != 0.0 {
                format!("{:.2e}", plotted)
            } else if plotted.abs() >= 1000.0 {
                format!("{:.0}", plotted)
            } else {
                format!("{:.2}", plotted)
            }
        }
    }
}

/// Plotted coordinates of a data point, `None` when it cannot be placed
fn plotted(kinds: (AxisKind, AxisKind), x: f64, y: f64) -> Option<[f64; 2]> {
    let (px, py) = (kinds.0.forward(x), kinds.1.forward(y));
    (px.is_finite() && py.is_finite()).then_some([px, py])
}

/// Render the histogram, the plotted markers and the preview highlight
pub fn render_plot(app: &mut ClickHistApp, ui: &mut Ui) {
    profiling::scope!("render_plot");

    let kinds = app.state.axis_kinds();
    let (x_kind, y_kind) = kinds;
    let reset = std::mem::take(&mut app.state.view.reset_bounds);
    let view = app.state.view.clone();
    let previewed = app.state.previewed_point().copied();
    let Some(session) = app.state.session.as_ref() else {
        return;
    };

    let x_axis = session.x_axis();
    let y_axis = session.y_axis();
    let (x_name, y_name) = (x_axis.config.name.clone(), y_axis.config.name.clone());
    let (x_fmt, y_fmt) = (x_axis.config.format, y_axis.config.format);

    let mut plot = Plot::new("clickhist")
        .show_grid(view.show_grid)
        .allow_double_click_reset(false)
        .x_axis_label(x_axis.config.label())
        .y_axis_label(y_axis.config.label())
        .include_x(x_kind.forward(x_axis.edges.first()))
        .include_x(x_kind.forward(x_axis.edges.last()))
        .include_y(y_kind.forward(y_axis.edges.first()))
        .include_y(y_kind.forward(y_axis.edges.last()))
        .x_axis_formatter(move |mark, _range| tick_label(x_kind, mark.value))
        .y_axis_formatter(move |mark, _range| tick_label(y_kind, mark.value))
        .label_formatter(move |_name, value| {
            format!(
                "{}: {}\n{}: {}",
                x_name,
                x_fmt.format(x_kind.inverse(value.x)),
                y_name,
                y_fmt.format(y_kind.inverse(value.y))
            )
        });

    if reset {
        plot = plot.reset();
    }

    let point_color = if view.dark_mode {
        Color32::from_gray(230)
    } else {
        Color32::from_gray(30)
    };

    let plot_response = plot.show(ui, |plot_ui| {
        let histogram = session.histogram();
        let max = histogram.max_count();
        for (ix, iy, members) in histogram.occupied() {
            let (Some((x0, x1)), Some((y0, y1))) =
                (histogram.x_edges().bounds(ix), histogram.y_edges().bounds(iy))
            else {
                continue;
            };
            let (Some(lo), Some(hi)) = (plotted(kinds, x0, y0), plotted(kinds, x1, y1)) else {
                continue;
            };
            let [r, g, b] = heat_rgb(normalized_count(members.len(), max));
            plot_ui.polygon(
                Polygon::new(
                    "",
                    PlotPoints::new(vec![lo, [hi[0], lo[1]], hi, [lo[0], hi[1]]]),
                )
                .fill_color(Color32::from_rgb(r, g, b))
                .stroke(Stroke::NONE),
            );
        }

        if view.show_scatter {
            let markers: Vec<[f64; 2]> = session
                .points()
                .iter()
                .filter_map(|(_, p)| plotted(kinds, p.x, p.y))
                .collect();
            plot_ui.points(
                Points::new("samples", markers)
                    .radius(MARKER_RADIUS)
                    .color(point_color),
            );
        }

        if view.show_quantiles {
            for q in &x_axis.quantiles {
                plot_ui.vline(
                    VLine::new(format!("{} p{}", x_axis.config.name, q.percentile), x_kind.forward(q.value))
                        .color(QUANTILE_COLOR)
                        .style(LineStyle::dashed_loose()),
                );
            }
            for q in &y_axis.quantiles {
                plot_ui.hline(
                    HLine::new(format!("{} p{}", y_axis.config.name, q.percentile), y_kind.forward(q.value))
                        .color(QUANTILE_COLOR)
                        .style(LineStyle::dashed_loose()),
                );
            }
        }

        if let Some(p) = previewed.and_then(|p| plotted(kinds, p.x, p.y)) {
            plot_ui.points(
                Points::new("preview", vec![p])
                    .radius(HIGHLIGHT_RADIUS)
                    .shape(MarkerShape::Circle)
                    .filled(false)
                    .color(HIGHLIGHT_COLOR),
            );
        }
    });

    let mut click = None;
    if plot_response.response.clicked() {
        if let Some(pos) = plot_response.response.interact_pointer_pos() {
            let value = plot_response.transform.value_from_position(pos);
            let scales = AxisScales {
                x: AxisScale {
                    kind: x_kind,
                    pixels_per_unit: plot_response.transform.dpos_dvalue_x(),
                },
                y: AxisScale {
                    kind: y_kind,
                    pixels_per_unit: plot_response.transform.dpos_dvalue_y(),
                },
            };
            click = Some(ClickEvent {
                position: ClickPoint::new(x_kind.inverse(value.x), y_kind.inverse(value.y)),
                scales,
            });
        }
    }

    plot_response.response.context_menu(|ui| {
        if ui.button("Reset View").clicked() {
            app.state.view.reset_plot_bounds();
            ui.close();
        }
        if ui.button("Toggle Grid").clicked() {
            app.state.view.show_grid = !app.state.view.show_grid;
            ui.close();
        }
        ui.separator();
        if ui.button("Cancel Preview").clicked() {
            app.state.cancel_preview();
            ui.close();
        }
    });

    if let Some(event) = click {
        if let Err(e) = app.handle_click(event) {
            log::error!("click failed: {}", e);
            app.state.ui.set_error(e.user_message());
        }
    }
}
