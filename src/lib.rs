//! ClickHist: an interactive 2D histogram of two gridded variables
//!
//! Samples are binned once at startup, a capped subset of each bin is drawn
//! as markers, and clicks on the plot go through a preview/commit protocol.
//! A committed sample is handed to a registered [`pick::CaseAction`], by
//! default the [`case::CaseRecorder`], which turns it into case artifacts.

pub mod app;
pub mod case;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod grid;
pub mod heat;
pub mod hist;
pub mod pick;
pub mod session;
pub mod state;
pub mod ui;

pub use config::ClickHistConfig;
pub use error::{ClickHistError, Result};
pub use session::Session;
