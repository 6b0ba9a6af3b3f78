//! Session configuration
//!
//! A ClickHist session is described by one JSON document: the two axes
//! (name, units, bin edges, display format), the subsampling knobs, where the
//! gridded data lives and how committed cases are written out. Every level
//! rejects unknown keys.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{case, hist, layout};
use crate::error::{ClickHistError, Result};
use crate::hist::BinEdges;

/// Top-level session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClickHistConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,

    /// Cap on plotted markers per occupied bin
    #[serde(default = "default_max_plotted_in_bin")]
    pub max_plotted_in_bin: i64,

    /// Seed for the per-bin subsampling draw
    #[serde(default)]
    pub rng_seed: u64,

    /// Percentiles in [0, 100] to mark on both axes
    #[serde(default)]
    pub quantiles: Option<Vec<f64>>,

    /// Free-form description carried into every dispatch
    #[serde(default)]
    pub metadata: String,

    #[serde(default)]
    pub data: Option<DataConfig>,

    #[serde(default)]
    pub case: CaseConfig,

    #[serde(default)]
    pub figure: FigureConfig,
}

fn default_max_plotted_in_bin() -> i64 {
    hist::DEFAULT_MAX_PLOTTED_IN_BIN
}

/// One histogram axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisConfig {
    pub name: String,
    #[serde(default)]
    pub units: String,
    pub edges: Vec<f64>,
    #[serde(default)]
    pub format: ValueFormat,
    #[serde(default)]
    pub log_scale: bool,
}

impl AxisConfig {
    pub fn bin_edges(&self) -> Result<BinEdges> {
        BinEdges::new(self.edges.clone())
    }

    /// Axis label, e.g. `Precip [mm day-1]`
    pub fn label(&self) -> String {
        if self.units.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.units)
        }
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClickHistError::config(format!("{} axis has no name", axis)));
        }
        let edges = self
            .bin_edges()
            .map_err(|e| ClickHistError::config(format!("{} axis: {}", axis, e)))?;
        if self.log_scale && edges.first() <= 0.0 {
            return Err(ClickHistError::config(format!(
                "{} axis is log scaled but its first edge is {}",
                axis,
                edges.first()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    Fixed,
    Exponent,
}

/// Display format for axis values, written as `{:W.Pf}` or `{:W.Pe}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValueFormat {
    width: usize,
    precision: usize,
    notation: Notation,
}

impl ValueFormat {
    pub fn parse(pattern: &str) -> Result<Self> {
        let bad = || ClickHistError::config(format!("unsupported value format '{}'", pattern));
        let body = pattern
            .trim()
            .strip_prefix("{:")
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(bad)?;
        let (digits, notation) = if let Some(s) = body.strip_suffix('f') {
            (s, Notation::Fixed)
        } else if let Some(s) = body.strip_suffix('e') {
            (s, Notation::Exponent)
        } else {
            return Err(bad());
        };
        let (width, precision) = digits.split_once('.').ok_or_else(bad)?;
        let width = if width.is_empty() {
            0
        } else {
            width.parse().map_err(|_| bad())?
        };
        let precision = precision.parse().map_err(|_| bad())?;
        Ok(Self {
            width,
            precision,
            notation,
        })
    }

    pub fn format(&self, value: f64) -> String {
        let (w, p) = (self.width, self.precision);
        match self.notation {
            Notation::Fixed => format!("{:w$.p$}", value),
            Notation::Exponent => format!("{:w$.p$e}", value),
        }
    }
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self {
            width: 0,
            precision: 3,
            notation: Notation::Fixed,
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.notation {
            Notation::Fixed => 'f',
            Notation::Exponent => 'e',
        };
        write!(f, "{{:{}.{}{}}}", self.width, self.precision, kind)
    }
}

impl TryFrom<String> for ValueFormat {
    type Error = ClickHistError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ValueFormat> for String {
    fn from(value: ValueFormat) -> Self {
        value.to_string()
    }
}

/// Where the gridded samples come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// CSV or Parquet table, one row per (time, lat, lon) sample
    pub path: PathBuf,
    pub x_column: String,
    pub y_column: String,
    #[serde(default = "default_lon_column")]
    pub lon_column: String,
    #[serde(default = "default_lat_column")]
    pub lat_column: String,
    #[serde(default = "default_time_column")]
    pub time_column: String,
    #[serde(default = "one")]
    pub x_multiplier: f64,
    #[serde(default = "one")]
    pub y_multiplier: f64,
    /// Converts the time column into seconds since `start_datetime`
    #[serde(default = "one")]
    pub time_multiplier: f64,
    pub start_datetime: String,
    #[serde(default)]
    pub lon_range: Option<[f64; 2]>,
    #[serde(default)]
    pub lat_range: Option<[f64; 2]>,
}

fn default_lon_column() -> String {
    "lon".to_string()
}

fn default_lat_column() -> String {
    "lat".to_string()
}

fn default_time_column() -> String {
    "time".to_string()
}

fn one() -> f64 {
    1.0
}

impl DataConfig {
    pub fn new(path: impl Into<PathBuf>, x_column: &str, y_column: &str, start_datetime: &str) -> Self {
        Self {
            path: path.into(),
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            lon_column: default_lon_column(),
            lat_column: default_lat_column(),
            time_column: default_time_column(),
            x_multiplier: 1.0,
            y_multiplier: 1.0,
            time_multiplier: 1.0,
            start_datetime: start_datetime.to_string(),
            lon_range: None,
            lat_range: None,
        }
    }

    /// Reference time the time column counts from
    pub fn start(&self) -> Result<NaiveDateTime> {
        parse_datetime(&self.start_datetime).ok_or_else(|| {
            ClickHistError::config(format!("cannot parse start_datetime '{}'", self.start_datetime))
        })
    }

    fn validate(&self) -> Result<()> {
        for (name, m) in [
            ("x_multiplier", self.x_multiplier),
            ("y_multiplier", self.y_multiplier),
            ("time_multiplier", self.time_multiplier),
        ] {
            if !m.is_finite() || m == 0.0 {
                return Err(ClickHistError::config(format!("{} must be finite and non-zero", name)));
            }
        }
        for (name, range) in [("lon_range", self.lon_range), ("lat_range", self.lat_range)] {
            if let Some([lo, hi]) = range {
                if !(lo <= hi) {
                    return Err(ClickHistError::config(format!("{} [{}, {}] is empty", name, lo, hi)));
                }
            }
        }
        self.start()?;
        Ok(())
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let trimmed = s.trim();
    formats
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(trimmed, f).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One template bundle and the tag its output files carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleTemplate {
    /// File stem inside the templates directory, without `.xidv`
    pub template: String,
    pub tag: String,
}

/// Settings for the case recorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseConfig {
    pub bundles: Vec<BundleTemplate>,
    /// Prefix of generated case notebooks
    pub notebook_tag: String,
    /// Half-width of the bundle window in degrees
    pub lon_offset: f64,
    pub lat_offset: f64,
    /// Half-length of the bundle time loop in seconds
    pub dt_from_center: i64,
    pub image_vars: Vec<String>,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Local mirror of the global quicklook images, also where downloads are kept
    pub quicklook_dir: Option<PathBuf>,
    /// Download quicklooks missing from the mirror
    pub fetch_quicklooks: bool,
    /// Open each quicklook link in a browser tab after a commit
    pub open_quicklook_tabs: bool,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            bundles: Vec::new(),
            notebook_tag: "Case".to_string(),
            lon_offset: case::DEFAULT_LON_OFFSET,
            lat_offset: case::DEFAULT_LAT_OFFSET,
            dt_from_center: case::DEFAULT_DT_FROM_CENTER,
            image_vars: vec![case::DEFAULT_IMAGE_VAR.to_string()],
            templates_dir: PathBuf::from("Templates"),
            output_dir: PathBuf::from("Output"),
            quicklook_dir: None,
            fetch_quicklooks: true,
            open_quicklook_tabs: false,
        }
    }
}

impl CaseConfig {
    fn validate(&self) -> Result<()> {
        let mut tags = HashSet::new();
        for b in &self.bundles {
            if b.template.trim().is_empty() || b.tag.trim().is_empty() {
                return Err(ClickHistError::config("bundle template and tag must be non-empty"));
            }
            if !tags.insert(b.tag.as_str()) {
                return Err(ClickHistError::config(format!("duplicate bundle tag '{}'", b.tag)));
            }
        }
        if self.notebook_tag.trim().is_empty() {
            return Err(ClickHistError::config("notebook_tag must be non-empty"));
        }
        if !(self.lon_offset > 0.0 && self.lon_offset.is_finite())
            || !(self.lat_offset > 0.0 && self.lat_offset.is_finite())
        {
            return Err(ClickHistError::config("lon_offset and lat_offset must be positive"));
        }
        if self.dt_from_center < 0 {
            return Err(ClickHistError::config("dt_from_center must not be negative"));
        }
        if self.image_vars.iter().any(|v| v.trim().is_empty()) {
            return Err(ClickHistError::config("image_vars entries must be non-empty"));
        }
        Ok(())
    }
}

/// Window size in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigureConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: layout::WINDOW_WIDTH,
            height: layout::WINDOW_HEIGHT,
        }
    }
}

impl ClickHistConfig {
    /// Minimal configuration for two axes, everything else defaulted
    pub fn new(x: AxisConfig, y: AxisConfig) -> Self {
        Self {
            x,
            y,
            max_plotted_in_bin: hist::DEFAULT_MAX_PLOTTED_IN_BIN,
            rng_seed: hist::DEFAULT_RNG_SEED,
            quantiles: None,
            metadata: String::new(),
            data: None,
            case: CaseConfig::default(),
            figure: FigureConfig::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded session config {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            // unknown keys and bad values are configuration problems, not I/O
            if e.is_data() {
                ClickHistError::config(e.to_string())
            } else {
                ClickHistError::Json(e)
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.x.validate("x")?;
        self.y.validate("y")?;
        if self.max_plotted_in_bin <= 0 {
            return Err(ClickHistError::config(format!(
                "max_plotted_in_bin must be positive, got {}",
                self.max_plotted_in_bin
            )));
        }
        if let Some(qs) = &self.quantiles {
            if let Some(bad) = qs.iter().find(|q| !(0.0..=100.0).contains(*q)) {
                return Err(ClickHistError::config(format!("quantile {} outside [0, 100]", bad)));
            }
        }
        if let Some(data) = &self.data {
            data.validate()?;
        }
        self.case.validate()?;
        if !(self.figure.width > 0.0 && self.figure.height > 0.0) {
            return Err(ClickHistError::config("figure size must be positive"));
        }
        Ok(())
    }

    /// Percentiles to mark, empty when none were configured
    pub fn quantile_percentiles(&self) -> &[f64] {
        self.quantiles.as_deref().unwrap_or(&[])
    }
}
