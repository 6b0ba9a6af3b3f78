//! Empirical quantiles and percentile ranks for axis annotation

use crate::error::{ClickHistError, Result};

/// A quantile value at a given percentile (`0..=100`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantile {
    pub percentile: f64,
    pub value: f64,
}

/// Sorted copy of the finite samples of one variable
///
/// Built once at startup; serves quantile lookups for the axis guides and
/// percentile ranks for clicked points.
#[derive(Debug, Clone, Default)]
pub struct SortedSample {
    sorted: Vec<f64>,
}

impl SortedSample {
    pub fn new(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.sorted.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    /// Value below which `percentile` percent of samples fall, linearly
    /// interpolated between order statistics
    pub fn quantile(&self, percentile: f64) -> Result<f64> {
        check_percentile(percentile)?;
        let count = self.sorted.len();
        if count == 0 {
            return Err(ClickHistError::config("no finite samples to take quantiles of"));
        }
        let idx = percentile / 100.0 * (count - 1) as f64;
        let lo = idx.floor() as usize;
        let hi = (lo + 1).min(count - 1);
        let frac = idx - lo as f64;
        Ok(self.sorted[lo] * (1.0 - frac) + self.sorted[hi] * frac)
    }

    /// Percentage of samples less than or equal to `value`
    pub fn percentile_rank(&self, value: f64) -> f64 {
        if self.sorted.is_empty() || value.is_nan() {
            return f64::NAN;
        }
        let at_or_below = self.sorted.partition_point(|&s| s <= value);
        100.0 * at_or_below as f64 / self.sorted.len() as f64
    }
}

fn check_percentile(percentile: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&percentile) {
        return Err(ClickHistError::config(format!(
            "percentile {} outside [0, 100]",
            percentile
        )));
    }
    Ok(())
}

/// Quantile values for each requested percentile, in request order
pub fn compute_quantiles(values: &[f64], percentiles: &[f64]) -> Result<Vec<Quantile>> {
    profiling::scope!("compute_quantiles");
    SortedSample::new(values).quantiles(percentiles)
}

impl SortedSample {
    pub fn quantiles(&self, percentiles: &[f64]) -> Result<Vec<Quantile>> {
        percentiles
            .iter()
            .map(|&percentile| {
                Ok(Quantile {
                    percentile,
                    value: self.quantile(percentile)?,
                })
            })
            .collect()
    }
}
