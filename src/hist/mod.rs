//! Binning, quantiles and marker subsampling
//!
//! Everything here runs once at startup over the full sample set.

pub mod binner;
pub mod quantile;
pub mod subsample;

pub use binner::{BinEdges, Histogram2D, compute_histogram};
pub use quantile::{Quantile, SortedSample, compute_quantiles};
pub use subsample::{PlottedPoint, PlottedPointSet, PointId, select_plotted_points};
