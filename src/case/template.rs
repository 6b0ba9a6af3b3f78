//! Placeholder substitution for bundle and script templates
//!
//! The templates are plain text with fixed filler literals (see
//! [`crate::constants::placeholder`]) standing in for the values of a case.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::constants::placeholder as ph;
use crate::error::Result;

/// Replace every occurrence of each `(placeholder, value)` pair, in order
pub fn substitute(text: &str, replacements: &[(&str, String)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Read `template`, substitute, write `out`
pub fn render_file(template: &Path, out: &Path, replacements: &[(&str, String)]) -> Result<()> {
    let text = fs::read_to_string(template)?;
    fs::write(out, substitute(&text, replacements))?;
    log::info!("wrote {}", out.display());
    Ok(())
}

/// Display window of a bundle around one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundleWindow {
    pub lon: f64,
    pub lat: f64,
    pub lon_offset: f64,
    pub lat_offset: f64,
    pub timestamp: NaiveDateTime,
    /// Half-length of the time loop in seconds
    pub dt_from_center: i64,
}

fn num(v: f64) -> String {
    format!("{:?}", v)
}

impl BundleWindow {
    /// Values for every bundle placeholder
    pub fn replacements(&self, metadata: &str) -> Vec<(&'static str, String)> {
        let center_ms = self.timestamp.and_utc().timestamp_millis();
        let dt_ms = self.dt_from_center * 1000;
        let loop_minutes = (2 * dt_ms) as f64 / 60_000.0;
        vec![
            (ph::MIN_LON, num(self.lon - self.lon_offset)),
            (ph::MAX_LON, num(self.lon + self.lon_offset)),
            (ph::MIN_LAT, num(self.lat - self.lat_offset)),
            (ph::MAX_LAT, num(self.lat + self.lat_offset)),
            (ph::CENTER_LON, num(self.lon)),
            (ph::CENTER_LAT, num(self.lat)),
            (ph::LON_LEN, num(self.lon_offset * 2.0)),
            (ph::LAT_LEN, num(self.lat_offset * 2.0)),
            (ph::INC_LON, num(self.lon_offset / 2.0)),
            (ph::INC_LAT, num(self.lat_offset / 2.0)),
            (ph::START_TIME, (center_ms - dt_ms).to_string()),
            (ph::END_TIME, (center_ms + dt_ms).to_string()),
            (ph::START_OFFSET, "0".to_string()),
            (ph::END_OFFSET, format!("{}", loop_minutes)),
            (ph::METADATA, metadata.to_string()),
        ]
    }
}

/// Values for the image/movie script placeholders
pub fn script_replacements(bundle_stem: &str, common: &str, metadata: &str) -> Vec<(&'static str, String)> {
    vec![
        (ph::BUNDLE_NAME, bundle_stem.to_string()),
        (ph::MOVIE_NAME, common.to_string()),
        (ph::IMAGE_NAME, common.to_string()),
        (ph::SCRIPT_METADATA, format!("\"{}\"", metadata)),
    ]
}
