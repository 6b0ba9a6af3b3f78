//! Per-bin subsampling of plotted markers
//!
//! Dense bins would otherwise put millions of markers on screen and make
//! every click scan all of them. Each occupied bin keeps at most
//! `max_plotted_in_bin` of its samples, drawn uniformly without replacement
//! from a seeded RNG so the same seed always plots the same points.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::binner::Histogram2D;
use crate::error::{ClickHistError, Result};

/// Identifier of a plotted marker: its position in the [`PlottedPointSet`]
pub type PointId = usize;

/// One plotted marker and the sample it stands for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlottedPoint {
    pub x: f64,
    pub y: f64,
    /// Index of the sample in the flattened (time, lat, lon) grid
    pub flat_index: usize,
    /// (x-bin, y-bin) the sample was drawn from
    pub bin: (usize, usize),
}

/// The markers shown on the scatter overlay, in stable order
#[derive(Debug, Clone, Default)]
pub struct PlottedPointSet {
    points: Vec<PlottedPoint>,
}

impl PlottedPointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointId) -> Option<&PlottedPoint> {
        self.points.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointId, &PlottedPoint)> {
        self.points.iter().enumerate()
    }

    pub fn as_slice(&self) -> &[PlottedPoint] {
        &self.points
    }

    /// Number of markers drawn from one bin
    pub fn count_in_bin(&self, ix: usize, iy: usize) -> usize {
        self.points.iter().filter(|p| p.bin == (ix, iy)).count()
    }

    /// `[x, y]` pairs for handing to a plotting surface
    pub fn xy(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }
}

impl FromIterator<PlottedPoint> for PlottedPointSet {
    fn from_iter<I: IntoIterator<Item = PlottedPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Pick the plotted markers for every occupied bin
///
/// Bins are visited in row-major (x-bin, y-bin) order. Within a bin the kept
/// samples are listed in ascending flat-index order.
pub fn select_plotted_points(
    histogram: &Histogram2D,
    x_values: &[f64],
    y_values: &[f64],
    max_plotted_in_bin: i64,
    rng_seed: u64,
) -> Result<PlottedPointSet> {
    profiling::scope!("select_plotted_points");

    if max_plotted_in_bin <= 0 {
        return Err(ClickHistError::config(format!(
            "max_plotted_in_bin must be positive, got {}",
            max_plotted_in_bin
        )));
    }
    if x_values.len() != y_values.len() {
        return Err(ClickHistError::config(format!(
            "x and y sample arrays differ in length ({} vs {})",
            x_values.len(),
            y_values.len()
        )));
    }
    let cap = usize::try_from(max_plotted_in_bin).unwrap_or(usize::MAX);
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let mut points = Vec::new();

    for (ix, iy, members) in histogram.occupied() {
        let kept: Vec<usize> = if members.len() <= cap {
            members.to_vec()
        } else {
            let mut picks = rand::seq::index::sample(&mut rng, members.len(), cap).into_vec();
            picks.sort_unstable();
            picks.into_iter().map(|i| members[i]).collect()
        };

        for flat_index in kept {
            let (Some(&x), Some(&y)) = (x_values.get(flat_index), y_values.get(flat_index)) else {
                return Err(ClickHistError::IndexOutOfRange {
                    index: flat_index as i64,
                    len: x_values.len(),
                });
            };
            points.push(PlottedPoint {
                x,
                y,
                flat_index,
                bin: (ix, iy),
            });
        }
    }

    log::debug!(
        "kept {} of {} samples as plotted points (cap {} per bin)",
        points.len(),
        histogram.total(),
        cap
    );

    Ok(PlottedPointSet { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hist::binner::{BinEdges, compute_histogram};
    use std::collections::HashSet;

    fn setup() -> (Histogram2D, Vec<f64>, Vec<f64>) {
        // 5 samples in bin (0, 0), 1 in (1, 1), 3 in (1, 0)
        let x = vec![0.1, 0.2, 0.3, 0.4, 0.5, 1.5, 1.1, 1.2, 1.3];
        let y = vec![0.1, 0.2, 0.3, 0.4, 0.5, 1.5, 0.1, 0.2, 0.3];
        let xe = BinEdges::new(vec![0.0, 1.0, 2.0]).unwrap();
        let ye = BinEdges::new(vec![0.0, 1.0, 2.0]).unwrap();
        let hist = compute_histogram(&x, &y, &xe, &ye).unwrap();
        (hist, x, y)
    }

    #[test]
    fn test_cap_respected_per_bin() {
        let (hist, x, y) = setup();
        let set = select_plotted_points(&hist, &x, &y, 2, 7).unwrap();

        let (nx, ny) = hist.shape();
        for ix in 0..nx {
            for iy in 0..ny {
                assert_eq!(set.count_in_bin(ix, iy), hist.count(ix, iy).min(2));
            }
        }
    }

    #[test]
    fn test_oversized_bin_draws_distinct_members() {
        let (hist, x, y) = setup();
        let set = select_plotted_points(&hist, &x, &y, 2, 42).unwrap();

        let from_big_bin: Vec<usize> = set
            .iter()
            .filter(|(_, p)| p.bin == (0, 0))
            .map(|(_, p)| p.flat_index)
            .collect();
        assert_eq!(from_big_bin.len(), 2);
        let unique: HashSet<_> = from_big_bin.iter().collect();
        assert_eq!(unique.len(), 2);
        assert!(from_big_bin.iter().all(|i| hist.members(0, 0).contains(i)));
    }

    #[test]
    fn test_plotted_values_match_samples() {
        let (hist, x, y) = setup();
        // cap 1000 keeps everything; caps 2 and 1 draw the (0, 0) and (1, 0) bins down
        for (cap, seed, expected) in [(1000, 0, 9), (2, 5, 5), (2, 11, 5), (1, 3, 3)] {
            let set = select_plotted_points(&hist, &x, &y, cap, seed).unwrap();
            assert_eq!(set.len(), expected);
            for (_, p) in set.iter() {
                assert_eq!(x[p.flat_index], p.x);
                assert_eq!(y[p.flat_index], p.y);
                assert!(hist.members(p.bin.0, p.bin.1).contains(&p.flat_index));
            }
        }
    }

    #[test]
    fn test_same_seed_same_selection() {
        let (hist, x, y) = setup();
        let a = select_plotted_points(&hist, &x, &y, 2, 99).unwrap();
        let b = select_plotted_points(&hist, &x, &y, 2, 99).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_non_positive_cap_rejected() {
        let (hist, x, y) = setup();
        for cap in [0, -3] {
            let err = select_plotted_points(&hist, &x, &y, cap, 0).unwrap_err();
            assert!(matches!(err, ClickHistError::InvalidConfiguration(_)));
        }
    }
}
