use crate::app::ClickHistApp;

pub fn render_help_dialog(app: &mut ClickHistApp, ctx: &eframe::egui::Context) {
    if app.state.view.show_help {
        eframe::egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(eframe::egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Navigation");
                ui.label("R - Reset view");
                ui.label("G - Toggle grid");
                ui.label("T - Toggle dark/light theme");
                ui.label("H / F1 - Toggle help");
                ui.label("ESC - Close help, or cancel the current preview");

                ui.separator();
                ui.heading("Mouse Controls");
                ui.label("Scroll - Zoom in/out");
                ui.label("Drag - Pan view");
                ui.label("Right-click - Context menu");

                ui.separator();
                ui.heading("Picking");
                ui.label("Click - Preview the nearest plotted point");
                ui.label("Click the same point again - Commit it and save a case");
                ui.label("Click another point - Preview that one instead");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.view.show_help = false;
                }
            });
    }
}
