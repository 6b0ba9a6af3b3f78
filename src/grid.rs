//! Flat sample index <-> (lon, lat, time) grid coordinates
//!
//! Samples are flattened with time varying slowest, then latitude, with
//! longitude varying fastest:
//! `flat = time * (lat_len * lon_len) + lat * lon_len + lon`.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{ClickHistError, Result};

/// Position of one sample in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub lon: usize,
    pub lat: usize,
    pub time: usize,
}

/// Recover grid indices from a flat sample index
pub fn invert(flat: i64, lon_len: usize, lat_len: usize, time_len: usize) -> Result<GridIndex> {
    let total = lon_len * lat_len * time_len;
    if flat < 0 || flat as u64 >= total as u64 {
        return Err(ClickHistError::IndexOutOfRange {
            index: flat,
            len: total,
        });
    }
    let flat = flat as usize;
    let plane = lat_len * lon_len;
    Ok(GridIndex {
        time: flat / plane,
        lat: (flat % plane) / lon_len,
        lon: flat % lon_len,
    })
}

/// Timestamp of a sample `seconds` after `start`
pub fn resolve_timestamp(start: NaiveDateTime, seconds: f64) -> Result<NaiveDateTime> {
    if !seconds.is_finite() {
        return Err(ClickHistError::Grid(format!("non-finite time offset {}", seconds)));
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| {
            ClickHistError::Grid(format!("time offset {}s overflows the calendar", seconds))
        })
}

/// A resolved sample: indices, coordinates and wall-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLocation {
    pub flat_index: usize,
    pub index: GridIndex,
    pub lon: f64,
    pub lat: f64,
    pub timestamp: NaiveDateTime,
}

/// Coordinate vectors of the sample grid
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
    /// Seconds since `start`
    pub times: Vec<f64>,
    pub start: NaiveDateTime,
}

impl Dimensions {
    pub fn new(lons: Vec<f64>, lats: Vec<f64>, times: Vec<f64>, start: NaiveDateTime) -> Result<Self> {
        if lons.is_empty() || lats.is_empty() || times.is_empty() {
            return Err(ClickHistError::Grid(format!(
                "empty dimension (lon {}, lat {}, time {})",
                lons.len(),
                lats.len(),
                times.len()
            )));
        }
        Ok(Self {
            lons,
            lats,
            times,
            start,
        })
    }

    pub fn lon_len(&self) -> usize {
        self.lons.len()
    }

    pub fn lat_len(&self) -> usize {
        self.lats.len()
    }

    pub fn time_len(&self) -> usize {
        self.times.len()
    }

    /// Total number of samples in the grid
    pub fn len(&self) -> usize {
        self.lon_len() * self.lat_len() * self.time_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invert(&self, flat: i64) -> Result<GridIndex> {
        invert(flat, self.lon_len(), self.lat_len(), self.time_len())
    }

    /// Inverse of [`Dimensions::invert`]
    pub fn flatten(&self, index: GridIndex) -> Result<usize> {
        if index.lon >= self.lon_len() || index.lat >= self.lat_len() || index.time >= self.time_len() {
            return Err(ClickHistError::Grid(format!(
                "grid index {:?} outside {}x{}x{}",
                index,
                self.lon_len(),
                self.lat_len(),
                self.time_len()
            )));
        }
        Ok(index.time * self.lat_len() * self.lon_len() + index.lat * self.lon_len() + index.lon)
    }

    /// Resolve a flat index into coordinates and a timestamp
    pub fn locate(&self, flat: usize) -> Result<GridLocation> {
        let flat_i64 = i64::try_from(flat).map_err(|_| ClickHistError::IndexOutOfRange {
            index: i64::MAX,
            len: self.len(),
        })?;
        let index = self.invert(flat_i64)?;
        let timestamp = resolve_timestamp(self.start, self.times[index.time])?;
        Ok(GridLocation {
            flat_index: flat,
            index,
            lon: self.lons[index.lon],
            lat: self.lats[index.lat],
            timestamp,
        })
    }
}
