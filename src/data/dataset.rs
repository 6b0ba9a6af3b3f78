//! Gridded samples: two variables on a dense (time, lat, lon) grid
//!
//! The table on disk is long-format, one row per grid point, in any order.
//! Loading reorders it into the flattening used by [`crate::grid`], so that a
//! position in `x` or `y` is a flat index.

use std::cmp::Ordering;
use std::path::PathBuf;

use super::source::{DataSource, range_filter};
use crate::config::DataConfig;
use crate::error::{ClickHistError, Result};
use crate::grid::{Dimensions, GridIndex};

/// Two sample series sharing one grid
#[derive(Debug, Clone)]
pub struct GridDataset {
    dims: Dimensions,
    x: Vec<f64>,
    y: Vec<f64>,
    source: Option<PathBuf>,
}

impl GridDataset {
    /// Assemble a dataset from already flattened series
    pub fn from_parts(dims: Dimensions, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() || x.len() != dims.len() {
            return Err(ClickHistError::config(format!(
                "x has {} samples, y has {}, grid needs {}",
                x.len(),
                y.len(),
                dims.len()
            )));
        }
        Ok(Self {
            dims,
            x,
            y,
            source: None,
        })
    }

    /// Read and grid the table described by `cfg`
    pub fn load(cfg: &DataConfig) -> Result<Self> {
        profiling::scope!("GridDataset::load");
        let start = cfg.start()?;

        let filter = match (cfg.lon_range, cfg.lat_range) {
            (Some(lon), Some(lat)) => {
                Some(range_filter(&cfg.lon_column, lon).and(range_filter(&cfg.lat_column, lat)))
            }
            (Some(lon), None) => Some(range_filter(&cfg.lon_column, lon)),
            (None, Some(lat)) => Some(range_filter(&cfg.lat_column, lat)),
            (None, None) => None,
        };
        let source = DataSource::load_filtered(&cfg.path, filter)?;
        if source.height() == 0 {
            return Err(ClickHistError::Grid(format!(
                "no rows left in {} after subsetting",
                cfg.path.display()
            )));
        }

        let lon = source.column_as_f64(&cfg.lon_column)?;
        let lat = source.column_as_f64(&cfg.lat_column)?;
        let time: Vec<f64> = source
            .column_as_f64(&cfg.time_column)?
            .into_iter()
            .map(|t| t * cfg.time_multiplier)
            .collect();
        let x = scaled(source.column_as_f64(&cfg.x_column)?, cfg.x_multiplier);
        let y = scaled(source.column_as_f64(&cfg.y_column)?, cfg.y_multiplier);

        let dims = Dimensions::new(
            distinct_sorted(&lon, &cfg.lon_column)?,
            distinct_sorted(&lat, &cfg.lat_column)?,
            distinct_sorted(&time, &cfg.time_column)?,
            start,
        )?;

        let mut filled = vec![false; dims.len()];
        let mut gx = vec![f64::NAN; dims.len()];
        let mut gy = vec![f64::NAN; dims.len()];
        for row in 0..source.height() {
            let index = GridIndex {
                lon: position(&dims.lons, lon[row]),
                lat: position(&dims.lats, lat[row]),
                time: position(&dims.times, time[row]),
            };
            let flat = dims.flatten(index)?;
            if std::mem::replace(&mut filled[flat], true) {
                return Err(ClickHistError::Grid(format!(
                    "duplicate row for lon {} lat {} time {}",
                    lon[row], lat[row], time[row]
                )));
            }
            gx[flat] = x[row];
            gy[flat] = y[row];
        }
        let missing = filled.iter().filter(|f| !**f).count();
        if missing > 0 {
            return Err(ClickHistError::Grid(format!(
                "{} of {} grid points have no row",
                missing,
                dims.len()
            )));
        }

        log::info!(
            "gridded {} samples ({} lon x {} lat x {} time) from {}",
            dims.len(),
            dims.lon_len(),
            dims.lat_len(),
            dims.time_len(),
            cfg.path.display()
        );

        Ok(Self {
            dims,
            x: gx,
            y: gy,
            source: Some(cfg.path.clone()),
        })
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn source(&self) -> Option<&std::path::Path> {
        self.source.as_deref()
    }
}

fn scaled(values: Vec<f64>, multiplier: f64) -> Vec<f64> {
    if multiplier == 1.0 {
        return values;
    }
    values.into_iter().map(|v| v * multiplier).collect()
}

fn distinct_sorted(values: &[f64], column: &str) -> Result<Vec<f64>> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ClickHistError::Grid(format!(
            "coordinate column '{}' holds non-finite value {}",
            column, bad
        )));
    }
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out.dedup();
    Ok(out)
}

// `value` always comes from the column `sorted` was built from
fn position(sorted: &[f64], value: f64) -> usize {
    sorted
        .binary_search_by(|p| p.partial_cmp(&value).unwrap_or(Ordering::Less))
        .unwrap_or_else(|i| i)
}
