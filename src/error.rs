//! Error types for ClickHist
//!
//! One error enum covers the interactive core (configuration, picking,
//! index inversion) and the collaborators around it (data loading, case
//! artifacts), so the UI can show any failure the same way.

use thiserror::Error;

/// Main error type for ClickHist operations
#[derive(Error, Debug)]
pub enum ClickHistError {
    /// Bad bin edges, non-positive per-bin cap, mismatched array lengths,
    /// unknown config keys
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Click resolution was attempted with nothing plotted
    #[error("No plotted points to pick from")]
    EmptyPointSet,

    /// Flat sample index outside the grid
    #[error("Flat index {index} out of range (grid has {len} samples)")]
    IndexOutOfRange { index: i64, len: usize },

    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding/encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Quicklook download failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Column not found in data
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// The loaded table is not a dense time x lat x lon grid
    #[error("Data is not a dense grid: {0}")]
    Grid(String),

    /// A commit happened before any action was registered
    #[error("No case action registered")]
    NoActionRegistered,
}

/// Result type alias for ClickHist operations
pub type Result<T> = std::result::Result<T, ClickHistError>;

/// UI-friendly error message formatting
impl ClickHistError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            ClickHistError::InvalidConfiguration(msg) => format!("Config error: {}", msg),
            ClickHistError::EmptyPointSet => {
                "Nothing is plotted yet, so there is no point to pick".to_string()
            }
            ClickHistError::IndexOutOfRange { index, len } => {
                format!("Sample {} does not exist (grid has {} samples)", index, len)
            }
            ClickHistError::FileIo(e) => format!("File error: {}", e),
            ClickHistError::Polars(e) => format!("Data error: {}", e),
            ClickHistError::Json(e) => format!("JSON error: {}", e),
            ClickHistError::Image(e) => format!("Image error: {}", e),
            ClickHistError::Http(e) => format!("Download failed: {}", e),
            ClickHistError::ColumnNotFound { column } => {
                format!("Column '{}' not found", column)
            }
            ClickHistError::Grid(msg) => format!("Grid error: {}", msg),
            ClickHistError::NoActionRegistered => "No case action is registered".to_string(),
        }
    }

    /// Get a short title for the error (for the error window)
    pub fn title(&self) -> &'static str {
        match self {
            ClickHistError::InvalidConfiguration(_) => "Configuration Error",
            ClickHistError::EmptyPointSet => "Empty Point Set",
            ClickHistError::IndexOutOfRange { .. } => "Index Out of Range",
            ClickHistError::FileIo(_) => "File Error",
            ClickHistError::Polars(_) => "Data Error",
            ClickHistError::Json(_) => "JSON Error",
            ClickHistError::Image(_) => "Image Error",
            ClickHistError::Http(_) => "Download Error",
            ClickHistError::ColumnNotFound { .. } => "Column Not Found",
            ClickHistError::Grid(_) => "Grid Error",
            ClickHistError::NoActionRegistered => "No Action",
        }
    }

    /// Shorthand used by the validators
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ClickHistError::InvalidConfiguration(msg.into())
    }
}
