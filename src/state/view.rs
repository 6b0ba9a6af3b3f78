//! View and visualization state

use crate::pick::AxisKind;
use crate::session::Session;

/// Display toggles for the histogram plot
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Dark mode theme toggle
    pub dark_mode: bool,

    /// Show help panel
    pub show_help: bool,

    /// Grid visibility
    pub show_grid: bool,

    /// Draw the plotted markers over the histogram
    pub show_scatter: bool,

    /// Draw the configured quantiles as guide lines
    pub show_quantiles: bool,

    /// Plot the x axis in log10 space
    pub x_log: bool,

    /// Plot the y axis in log10 space
    pub y_log: bool,

    /// Log axes need strictly positive edges
    pub x_log_allowed: bool,
    pub y_log_allowed: bool,

    /// Reset zoom bounds flag
    pub reset_bounds: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_help: false,
            show_grid: true,
            show_scatter: true,
            show_quantiles: true,
            x_log: false,
            y_log: false,
            x_log_allowed: false,
            y_log_allowed: false,
            reset_bounds: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the axis scales a freshly opened session was configured with
    pub fn adopt_session(&mut self, session: &Session) {
        self.x_log = session.x_axis().config.log_scale;
        self.y_log = session.y_axis().config.log_scale;
        self.x_log_allowed = session.x_axis().edges.first() > 0.0;
        self.y_log_allowed = session.y_axis().edges.first() > 0.0;
        self.reset_bounds = true;
    }

    pub fn x_kind(&self) -> AxisKind {
        if self.x_log { AxisKind::Log } else { AxisKind::Linear }
    }

    pub fn y_kind(&self) -> AxisKind {
        if self.y_log { AxisKind::Log } else { AxisKind::Linear }
    }

    /// Reset plot bounds on next frame
    pub fn reset_plot_bounds(&mut self) {
        self.reset_bounds = true;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }
}
