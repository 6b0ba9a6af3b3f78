//! UI interaction state

use crate::session::PointSummary;

/// Messages and summaries shown in the info panel
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Sample described by the current preview
    pub preview: Option<PointSummary>,

    /// Sample of the most recent commit
    pub last_commit: Option<PointSummary>,

    /// Error message to display in UI (status bar)
    pub error_message: Option<String>,

    /// Links to open in browser tabs on the next frame
    pub pending_links: Vec<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything tied to the previous session
    pub fn on_session_loaded(&mut self) {
        *self = Self::default();
    }

    /// Set an error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Clear the current error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
