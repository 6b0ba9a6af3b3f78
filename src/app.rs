use std::path::PathBuf;

use eframe::egui;

use crate::case::{self, CaseRecorder, snapshot};
use crate::error::Result;
use crate::pick::{ActionDispatcher, ClickEvent};
use crate::session::{ClickResponse, Session};
use crate::state::AppState;
use crate::ui;

pub struct ClickHistApp {
    pub state: AppState,
}

impl Default for ClickHistApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl ClickHistApp {
    /// App showing `session`, with the case recorder registered for commits
    pub fn new(session: Session, config_path: Option<PathBuf>) -> Self {
        let mut app = Self::default();
        app.install(session, config_path);
        app
    }

    fn install(&mut self, session: Session, config_path: Option<PathBuf>) {
        let dispatcher = ActionDispatcher::with_action(Box::new(CaseRecorder::for_session(&session)));
        self.state.view.adopt_session(&session);
        self.state.ui.on_session_loaded();
        self.state.cancel_preview();
        self.state.dispatcher = dispatcher;
        self.state.session = Some(session);
        if let Some(path) = &config_path {
            self.state.remember_config(path.clone());
        }
        self.state.config_path = config_path;
    }

    /// Replace the session with one built from another config file
    pub fn open_config(&mut self, path: PathBuf) -> Result<()> {
        let session = Session::open(&path, None)?;
        self.install(session, Some(path));
        Ok(())
    }

    /// Feed one plot click through the preview/commit protocol
    ///
    /// The click state is advanced before anything is dispatched; a failing
    /// case action leaves the protocol back at the first click.
    pub fn handle_click(&mut self, event: ClickEvent) -> Result<()> {
        profiling::scope!("handle_click");
        let kinds = self.state.axis_kinds();
        let state = &mut self.state;
        let Some(session) = &state.session else {
            return Ok(());
        };

        let (next, response) = session.click(&event, state.click)?;
        state.click = next;
        match response {
            ClickResponse::Preview(summary) => {
                state.ui.preview = Some(summary);
            }
            ClickResponse::Commit {
                summary,
                instruction,
            } => {
                state.ui.preview = None;
                let staged = CaseRecorder::snapshot_staging_path(&session.config().case);
                if let Err(e) = snapshot::save(
                    &staged,
                    session.histogram(),
                    session.points(),
                    kinds,
                    Some((summary.x, summary.y)),
                ) {
                    log::warn!("could not save histogram snapshot: {}", e);
                }
                let recorder_config = &session.config().case;
                let links = if recorder_config.open_quicklook_tabs {
                    case::quicklook_links(recorder_config, summary.location.timestamp)
                } else {
                    Vec::new()
                };
                state.ui.last_commit = Some(summary);
                state.dispatcher.dispatch(instruction)?;
                state.ui.pending_links.extend(links);
            }
        }
        Ok(())
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let mut cancel = false;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::R) {
                self.state.view.reset_plot_bounds();
            }
            if i.key_pressed(egui::Key::G) {
                self.state.view.show_grid = !self.state.view.show_grid;
            }
            if i.key_pressed(egui::Key::T) {
                self.state.view.toggle_dark_mode();
            }
            if i.key_pressed(egui::Key::H) || i.key_pressed(egui::Key::F1) {
                self.state.view.show_help = !self.state.view.show_help;
            }
            if i.key_pressed(egui::Key::Escape) {
                if self.state.view.show_help {
                    self.state.view.show_help = false;
                } else {
                    cancel = true;
                }
            }
        });
        if cancel {
            self.state.cancel_preview();
        }
    }
}

impl eframe::App for ClickHistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        for url in self.state.ui.pending_links.drain(..) {
            ctx.open_url(egui::OpenUrl::new_tab(url));
        }

        if self.state.view.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        self.handle_keyboard(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::render_toolbar(self, ctx, ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui::render_status_bar(self, ui);
        });

        if self.state.has_session() {
            egui::SidePanel::right("info")
                .default_width(crate::constants::layout::INFO_PANEL_WIDTH)
                .show(ctx, |ui| {
                    ui::render_info_panel(self, ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.has_session() {
                ui::render_plot(self, ui);
            } else {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 2.0 - 20.0);
                    ui.label("Open a session config to start (📂 or drop a .json file)");
                });
            }
        });

        ui::render_help_dialog(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisConfig, ClickHistConfig, ValueFormat};
    use crate::data::GridDataset;
    use crate::grid::Dimensions;
    use crate::pick::{AxisScales, CaseAction, ClickPoint, ClickState, DispatchContext};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Counting(Rc<RefCell<Vec<usize>>>);

    impl CaseAction for Counting {
        fn perform(&mut self, flat_index: usize, _context: &DispatchContext) -> Result<()> {
            self.0.borrow_mut().push(flat_index);
            Ok(())
        }
    }

    fn app(output: &std::path::Path, open_tabs: bool) -> ClickHistApp {
        let axis = |name: &str| AxisConfig {
            name: name.to_string(),
            units: String::new(),
            edges: vec![0.0, 5.0, 10.0],
            format: ValueFormat::default(),
            log_scale: false,
        };
        let mut config = ClickHistConfig::new(axis("a"), axis("b"));
        config.case.output_dir = output.to_path_buf();
        config.case.open_quicklook_tabs = open_tabs;
        let dims = Dimensions::new(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0],
            NaiveDate::from_ymd_opt(2005, 5, 16)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .unwrap();
        let dataset =
            GridDataset::from_parts(dims, vec![1.0, 2.0, 6.0, 8.0], vec![1.0, 7.0, 2.0, 9.0]).unwrap();
        ClickHistApp::new(Session::build(config, dataset).unwrap(), None)
    }

    fn at(x: f64, y: f64) -> ClickEvent {
        ClickEvent {
            position: ClickPoint::new(x, y),
            scales: AxisScales::default(),
        }
    }

    #[test]
    fn test_commit_saves_snapshot_and_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), false);
        let calls = Rc::new(RefCell::new(Vec::new()));
        app.state.dispatcher.register(Box::new(Counting(calls.clone())));

        app.handle_click(at(6.1, 2.1)).unwrap();
        assert_eq!(app.state.click, ClickState::PreviewShown(2));
        assert_eq!(app.state.ui.preview.as_ref().map(|p| p.flat_index), Some(2));
        assert!(calls.borrow().is_empty());

        app.handle_click(at(5.9, 1.9)).unwrap();
        assert_eq!(app.state.click, ClickState::AwaitingFirstClick);
        assert_eq!(*calls.borrow(), vec![2]);
        assert!(app.state.ui.preview.is_none());
        assert_eq!(app.state.ui.last_commit.as_ref().map(|p| p.flat_index), Some(2));

        let staged = dir.path().join("Tmp").join("mostRecentCH.png");
        assert!(staged.exists());
        assert!(app.state.ui.pending_links.is_empty());
    }

    #[test]
    fn test_commit_queues_quicklook_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), true);
        app.state.dispatcher = ActionDispatcher::with_action(Box::new(Counting(Rc::default())));

        app.handle_click(at(1.0, 1.0)).unwrap();
        assert!(app.state.ui.pending_links.is_empty());
        app.handle_click(at(1.0, 1.0)).unwrap();
        assert_eq!(
            app.state.ui.pending_links,
            vec![
                "http://g5nr.nccs.nasa.gov/static/naturerun/fimages/STORMS/Y2005/M05/D16/\
                 storms_globe_c1440_NR_BETA9-SNAP_20050516_0000z.png"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_no_tabs_when_action_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), true);
        app.state.dispatcher = ActionDispatcher::new();

        app.handle_click(at(1.0, 1.0)).unwrap();
        assert!(app.handle_click(at(1.0, 1.0)).is_err());
        assert!(app.state.ui.pending_links.is_empty());
    }

    #[test]
    fn test_failed_action_leaves_protocol_reset() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), false);
        app.state.dispatcher = ActionDispatcher::new();

        app.handle_click(at(1.0, 1.0)).unwrap();
        assert!(app.handle_click(at(1.0, 1.0)).is_err());
        assert_eq!(app.state.click, ClickState::AwaitingFirstClick);
    }

    #[test]
    fn test_cancel_preview_after_first_click() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), false);
        app.handle_click(at(8.0, 9.0)).unwrap();
        assert!(app.state.previewed_point().is_some());
        app.state.cancel_preview();
        assert!(app.state.previewed_point().is_none());
        assert!(app.state.ui.preview.is_none());
    }
}
