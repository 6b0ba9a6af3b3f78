//! Application state management
//!
//! The loaded session is read-only after startup. What changes from frame to
//! frame is split into the click protocol state, display toggles and the
//! messages shown in the side panel.

mod ui;
mod view;

pub use ui::UiState;
pub use view::ViewState;

use std::path::PathBuf;

use crate::hist::PlottedPoint;
use crate::pick::{ActionDispatcher, AxisKind, ClickState};
use crate::session::Session;

/// Main application state container
#[derive(Default)]
pub struct AppState {
    /// Current session, `None` until a config has been opened
    pub session: Option<Session>,

    /// Preview/commit protocol position
    pub click: ClickState,

    /// Receives committed points
    pub dispatcher: ActionDispatcher,

    /// Display toggles
    pub view: ViewState,

    /// Preview, last case and error messages
    pub ui: UiState,

    /// Config the current session was opened from
    pub config_path: Option<PathBuf>,

    /// Recently opened configs
    pub recent_configs: Vec<PathBuf>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Forget the current preview; the next click previews again
    pub fn cancel_preview(&mut self) {
        if !self.click.is_first_click() {
            log::info!("preview cancelled");
        }
        self.click = ClickState::AwaitingFirstClick;
        self.ui.preview = None;
    }

    /// Marker currently previewed, if any
    pub fn previewed_point(&self) -> Option<&PlottedPoint> {
        let id = self.click.last_nearest()?;
        self.session.as_ref()?.points().get(id)
    }

    /// Scale of each displayed axis
    pub fn axis_kinds(&self) -> (AxisKind, AxisKind) {
        (self.view.x_kind(), self.view.y_kind())
    }

    /// Move `path` to the front of the recent list, keeping five entries
    pub fn remember_config(&mut self, path: PathBuf) {
        self.recent_configs.retain(|p| p != &path);
        self.recent_configs.insert(0, path);
        self.recent_configs.truncate(5);
    }
}
