//! Application-wide constants and default values
//!
//! This module centralizes the magic numbers and placeholder strings used
//! throughout the application, making them easier to maintain and configure.

/// Histogram and subsampling defaults
pub mod hist {
    /// Default cap on plotted markers per occupied bin
    pub const DEFAULT_MAX_PLOTTED_IN_BIN: i64 = 1000;

    /// Default seed for the per-bin subsampling draw
    pub const DEFAULT_RNG_SEED: u64 = 0;

    /// Percentile ranks are capped here when building filenames
    pub const MAX_PERCENTILE_IN_NAME: f64 = 99.999;
}

/// Click picking
pub mod pick {
    /// Distances closer than this are treated as ties
    pub const DISTANCE_TOLERANCE: f64 = 1e-12;
}

/// Plotting and visualization defaults
pub mod plot {
    /// Scatter marker radius in points
    pub const MARKER_RADIUS: f32 = 1.5;

    /// Highlight ring radius for the previewed point
    pub const HIGHLIGHT_RADIUS: f32 = 8.0;

    /// Width of a snapshot PNG in pixels
    pub const SNAPSHOT_WIDTH: u32 = 800;

    /// Height of a snapshot PNG in pixels
    pub const SNAPSHOT_HEIGHT: u32 = 800;

    /// Half-size of the square marker drawn into images
    pub const MARKER_HALF_SIZE: i64 = 5;
}

/// UI layout defaults
pub mod layout {
    /// Right panel (preview / case info) default width
    pub const INFO_PANEL_WIDTH: f32 = 320.0;

    /// Default window size in points
    pub const WINDOW_WIDTH: f32 = 1100.0;
    pub const WINDOW_HEIGHT: f32 = 800.0;
}

/// Case recorder defaults
pub mod case {
    /// Half-width of the bundle display window in degrees longitude
    pub const DEFAULT_LON_OFFSET: f64 = 5.0;

    /// Half-height of the bundle display window in degrees latitude
    pub const DEFAULT_LAT_OFFSET: f64 = 5.0;

    /// Half-length of the bundle time loop in seconds
    pub const DEFAULT_DT_FROM_CENTER: i64 = 2 * 3600;

    /// Default quicklook image variable
    pub const DEFAULT_IMAGE_VAR: &str = "storms";

    /// Quicklook crop half-widths in degrees
    pub const QUICKLOOK_HALF_LON: f64 = 30.0;
    pub const QUICKLOOK_HALF_LAT: f64 = 15.0;

    /// The global quicklook images start at 17.5 W rather than 0 E
    pub const QUICKLOOK_LON_ORIGIN_OFFSET: f64 = 17.5;

    /// Base of the quicklook image archive
    pub const QUICKLOOK_BASE_URL: &str = "http://g5nr.nccs.nasa.gov/static/naturerun/fimages";

    /// Give up on a quicklook download after this many seconds
    pub const QUICKLOOK_FETCH_TIMEOUT_SECS: u64 = 30;

    /// Script template filename inside the templates directory
    pub const SCRIPT_TEMPLATE: &str = "idvMovieOutput_fillIn.isl";

    /// Notebook template filename inside the templates directory
    pub const NOTEBOOK_TEMPLATE: &str = "caseNotebookTemplate.ipynb";
}

/// Placeholder literals baked into the bundle templates
pub mod placeholder {
    pub const CENTER_LON: &str = "-154.123456789";
    pub const LON_LEN: &str = "2.123456789";
    pub const MIN_LON: &str = "-155.1851851835";
    pub const MAX_LON: &str = "-153.0617283945";
    pub const INC_LON: &str = "0.345678912";

    pub const CENTER_LAT: &str = "0.135792468";
    pub const LAT_LEN: &str = "1.592592592";
    pub const MIN_LAT: &str = "-0.660503828";
    pub const MAX_LAT: &str = "0.932088764";
    pub const INC_LAT: &str = "0.234567891";

    pub const START_TIME: &str = "1117594837000";
    pub const END_TIME: &str = "1117616461000";
    pub const START_OFFSET: &str = "-119.87654321";
    pub const END_OFFSET: &str = "361.23456789";
    pub const METADATA: &str = "replaceme_METADATASTRING_replaceme";

    /// Script template tokens
    pub const BUNDLE_NAME: &str = "BUNDLENAME";
    pub const MOVIE_NAME: &str = "MOVIENAME";
    pub const IMAGE_NAME: &str = "IMAGENAME";
    pub const SCRIPT_METADATA: &str = "\"METADATA\"";

    /// Notebook template markers
    pub const INSERT_DATE: &str = "INSERT_DATE";
    pub const QUICK_STATS: &str = "Quick Stats";
    pub const LOAD_BUNDLE: &str = "loadBundle()";
}

/// Output directory layout, relative to the configured output root
pub mod output {
    pub const BUNDLES_DIR: &str = "GeneratedBundles";
    pub const ZIDV_DIR: &str = "GeneratedBundlesZ";
    pub const SCRIPTS_DIR: &str = "Scripts";
    pub const IMAGES_DIR: &str = "Images";
    pub const NOTEBOOKS_DIR: &str = "CaseNotebooks";
    pub const TMP_DIR: &str = "Tmp";
}
