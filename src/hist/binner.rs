//! 2D histogram over fixed, caller-supplied bin edges
//!
//! Bins are left-closed/right-open, `[e_i, e_{i+1})`, except the last bin
//! which is also closed at the top edge. The outer bins are open-ended:
//! values below the first edge land in bin 0 and values above the last edge
//! land in bin `K-1`. NaN samples are never binned.

use crate::error::{ClickHistError, Result};

/// Strictly increasing bin boundaries for one axis
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Validate and wrap a list of edges (at least two, finite, strictly increasing)
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(ClickHistError::config(format!(
                "bin edges need at least 2 entries, got {}",
                edges.len()
            )));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(ClickHistError::config(format!(
                "bin edges must be finite, got {}",
                bad
            )));
        }
        if let Some(pos) = edges.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ClickHistError::config(format!(
                "bin edges must be strictly increasing ({} then {})",
                edges[pos],
                edges[pos + 1]
            )));
        }
        Ok(Self { edges })
    }

    /// Number of bins, one fewer than the number of edges
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.edges
    }

    pub fn first(&self) -> f64 {
        self.edges[0]
    }

    pub fn last(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Lower and upper edge of bin `i`
    pub fn bounds(&self, i: usize) -> Option<(f64, f64)> {
        Some((*self.edges.get(i)?, *self.edges.get(i + 1)?))
    }

    /// Bin index for a value, clamping out-of-range values into the outer bins
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let last_bin = self.bin_count() - 1;
        if value < self.first() {
            return Some(0);
        }
        if value >= self.last() {
            return Some(last_bin);
        }
        // Number of edges <= value is at least 1 here
        let upto = self.edges.partition_point(|&e| e <= value);
        Some((upto - 1).min(last_bin))
    }
}

/// Counts plus member sample indices for every (x-bin, y-bin) cell
#[derive(Debug, Clone)]
pub struct Histogram2D {
    x_edges: BinEdges,
    y_edges: BinEdges,
    /// Flat sample indices per cell, cell `(ix, iy)` at `ix * ny + iy`
    members: Vec<Vec<usize>>,
    /// Samples skipped because x or y was NaN
    skipped: usize,
}

impl Histogram2D {
    fn cell(&self, ix: usize, iy: usize) -> usize {
        ix * self.y_edges.bin_count() + iy
    }

    pub fn x_edges(&self) -> &BinEdges {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &BinEdges {
        &self.y_edges
    }

    /// `(K_x, K_y)`
    pub fn shape(&self) -> (usize, usize) {
        (self.x_edges.bin_count(), self.y_edges.bin_count())
    }

    /// Sample count in a cell, zero for cells outside the grid
    pub fn count(&self, ix: usize, iy: usize) -> usize {
        self.members(ix, iy).len()
    }

    /// Flat sample indices in a cell, ascending
    pub fn members(&self, ix: usize, iy: usize) -> &[usize] {
        let (nx, ny) = self.shape();
        if ix >= nx || iy >= ny {
            return &[];
        }
        &self.members[self.cell(ix, iy)]
    }

    /// Total number of binned samples
    pub fn total(&self) -> usize {
        self.members.iter().map(Vec::len).sum()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn max_count(&self) -> usize {
        self.members.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Occupied cells in row-major (x-bin, y-bin) order
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &[usize])> + '_ {
        let ny = self.y_edges.bin_count();
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_empty())
            .map(move |(cell, m)| (cell / ny, cell % ny, m.as_slice()))
    }

    pub fn occupied_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_empty()).count()
    }
}

/// Bin two parallel sample arrays into a 2D histogram
pub fn compute_histogram(
    x_values: &[f64],
    y_values: &[f64],
    x_edges: &BinEdges,
    y_edges: &BinEdges,
) -> Result<Histogram2D> {
    profiling::scope!("compute_histogram");

    if x_values.len() != y_values.len() {
        return Err(ClickHistError::config(format!(
            "x and y sample arrays differ in length ({} vs {})",
            x_values.len(),
            y_values.len()
        )));
    }

    let nx = x_edges.bin_count();
    let ny = y_edges.bin_count();
    let mut members = vec![Vec::new(); nx * ny];
    let mut skipped = 0;

    for (flat, (&x, &y)) in x_values.iter().zip(y_values).enumerate() {
        match (x_edges.bin_index(x), y_edges.bin_index(y)) {
            (Some(ix), Some(iy)) => members[ix * ny + iy].push(flat),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("{} samples with NaN values left out of the histogram", skipped);
    }

    Ok(Histogram2D {
        x_edges: x_edges.clone(),
        y_edges: y_edges.clone(),
        members,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(v: &[f64]) -> BinEdges {
        BinEdges::new(v.to_vec()).unwrap()
    }

    #[test]
    fn test_bin_index_with_clamping() {
        let e = edges(&[0.0, 10.0, 20.0, 100.0]);
        assert_eq!(e.bin_index(5.0), Some(0));
        assert_eq!(e.bin_index(15.0), Some(1));
        assert_eq!(e.bin_index(150.0), Some(2));
        assert_eq!(e.bin_index(-5.0), Some(0));
        assert_eq!(e.bin_index(f64::NAN), None);
    }

    #[test]
    fn test_bin_index_on_edges() {
        let e = edges(&[0.0, 10.0, 20.0, 100.0]);
        // Left-closed: an interior edge belongs to the bin above it
        assert_eq!(e.bin_index(0.0), Some(0));
        assert_eq!(e.bin_index(10.0), Some(1));
        assert_eq!(e.bin_index(20.0), Some(2));
        // Top edge closes the last bin
        assert_eq!(e.bin_index(100.0), Some(2));
        assert_eq!(e.bin_index(f64::INFINITY), Some(2));
        assert_eq!(e.bin_index(f64::NEG_INFINITY), Some(0));
    }

    #[test]
    fn test_invalid_edges() {
        assert!(BinEdges::new(vec![1.0]).is_err());
        assert!(BinEdges::new(vec![0.0, 1.0, 1.0]).is_err());
        assert!(BinEdges::new(vec![0.0, 2.0, 1.0]).is_err());
        assert!(BinEdges::new(vec![0.0, f64::NAN]).is_err());
        assert!(matches!(
            BinEdges::new(vec![3.0, 2.0]),
            Err(ClickHistError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_counts_sum_to_sample_count() {
        let xe = edges(&[0.0, 1.0, 11.0, 21.0, 250.0]);
        let ye = edges(&[-0.5, -0.1, 0.0, 0.1, 0.5]);
        let x: Vec<f64> = (0..500).map(|i| (i as f64 * 7.3) % 300.0 - 20.0).collect();
        let y: Vec<f64> = (0..500).map(|i| ((i as f64) * 0.37).sin() * 0.8).collect();

        let hist = compute_histogram(&x, &y, &xe, &ye).unwrap();
        assert_eq!(hist.shape(), (4, 4));
        assert_eq!(hist.total(), 500);
        assert_eq!(hist.skipped(), 0);

        // Every sample appears in exactly one cell
        let mut seen = vec![0u32; 500];
        for (_, _, members) in hist.occupied() {
            for &m in members {
                seen[m] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_members_match_bin_index() {
        let xe = edges(&[0.0, 10.0, 20.0, 100.0]);
        let ye = edges(&[0.0, 1.0, 2.0]);
        let x = [5.0, 15.0, 150.0, -5.0, 10.0];
        let y = [0.5, 1.5, 0.5, 3.0, 1.0];

        let hist = compute_histogram(&x, &y, &xe, &ye).unwrap();
        assert_eq!(hist.members(0, 0), &[0]);
        assert_eq!(hist.members(1, 1), &[1, 4]);
        assert_eq!(hist.members(2, 0), &[2]);
        assert_eq!(hist.members(0, 1), &[3]);
        assert_eq!(hist.count(1, 0), 0);
        assert_eq!(hist.count(9, 9), 0);
        assert_eq!(hist.max_count(), 2);
        assert_eq!(hist.occupied_count(), 4);
    }

    #[test]
    fn test_nan_samples_skipped() {
        let xe = edges(&[0.0, 1.0]);
        let ye = edges(&[0.0, 1.0]);
        let hist = compute_histogram(&[0.5, f64::NAN, 0.2], &[0.5, 0.5, f64::NAN], &xe, &ye).unwrap();
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.skipped(), 2);
    }

    #[test]
    fn test_length_mismatch() {
        let e = edges(&[0.0, 1.0]);
        let err = compute_histogram(&[1.0, 2.0], &[1.0], &e, &e).unwrap_err();
        assert!(matches!(err, ClickHistError::InvalidConfiguration(_)));
    }
}
