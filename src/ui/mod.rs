mod help_dialog;
mod info_panel;
mod plot;
mod toolbar;

pub use help_dialog::render_help_dialog;
pub use info_panel::{render_info_panel, render_status_bar};
pub use plot::render_plot;
pub use toolbar::render_toolbar;
