//! Nearest plotted point under on-screen distance
//!
//! Distances are measured after pushing both the click and each candidate
//! through the axis scale function (identity or log10) and multiplying by
//! the axis's current pixels-per-unit factor, so a log axis or a squashed
//! axis does not distort which marker looks closest to the user.

use crate::constants::pick::DISTANCE_TOLERANCE;
use crate::error::{ClickHistError, Result};
use crate::hist::{PlottedPointSet, PointId};

/// Linear or logarithmic axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisKind {
    #[default]
    Linear,
    Log,
}

impl AxisKind {
    /// Map a data value into plotted coordinates
    pub fn forward(self, value: f64) -> f64 {
        match self {
            AxisKind::Linear => value,
            AxisKind::Log => value.log10(),
        }
    }

    /// Map a plotted coordinate back into data space
    pub fn inverse(self, plotted: f64) -> f64 {
        match self {
            AxisKind::Linear => plotted,
            AxisKind::Log => 10f64.powf(plotted),
        }
    }
}

/// Scale state of one displayed axis at the moment of a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub kind: AxisKind,
    /// Screen pixels per plotted unit; the sign encodes axis direction
    pub pixels_per_unit: f64,
}

impl AxisScale {
    pub fn linear(pixels_per_unit: f64) -> Self {
        Self {
            kind: AxisKind::Linear,
            pixels_per_unit,
        }
    }

    pub fn log(pixels_per_unit: f64) -> Self {
        Self {
            kind: AxisKind::Log,
            pixels_per_unit,
        }
    }

    /// Screen-space coordinate of a data value along this axis
    pub fn to_screen(&self, value: f64) -> f64 {
        self.kind.forward(value) * self.pixels_per_unit
    }
}

/// Both axes of the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScales {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl Default for AxisScales {
    fn default() -> Self {
        Self {
            x: AxisScale::linear(1.0),
            y: AxisScale::linear(1.0),
        }
    }
}

/// A click position in data space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPoint {
    pub x: f64,
    pub y: f64,
}

impl ClickPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Find the plotted point closest to `click` on screen
///
/// Ties within floating-point tolerance go to the point met first in
/// iteration order. Points that cannot be placed on the axes (for example
/// non-positive values on a log axis) are not pickable.
pub fn find_nearest(
    click: ClickPoint,
    points: &PlottedPointSet,
    scales: &AxisScales,
) -> Result<PointId> {
    profiling::scope!("find_nearest");

    if points.is_empty() {
        return Err(ClickHistError::EmptyPointSet);
    }

    let cx = scales.x.to_screen(click.x);
    let cy = scales.y.to_screen(click.y);

    let mut best: Option<(PointId, f64)> = None;
    for (id, point) in points.iter() {
        let dx = scales.x.to_screen(point.x) - cx;
        let dy = scales.y.to_screen(point.y) - cy;
        let dist = (dx * dx + dy * dy).sqrt();
        if !dist.is_finite() {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist - DISTANCE_TOLERANCE => {}
            _ => best = Some((id, dist)),
        }
    }

    best.map(|(id, _)| id).ok_or(ClickHistError::EmptyPointSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hist::PlottedPoint;

    fn set(xy: &[(f64, f64)]) -> PlottedPointSet {
        xy.iter()
            .enumerate()
            .map(|(i, &(x, y))| PlottedPoint {
                x,
                y,
                flat_index: i * 10,
                bin: (0, 0),
            })
            .collect()
    }

    #[test]
    fn test_empty_point_set() {
        let err = find_nearest(ClickPoint::new(0.0, 0.0), &set(&[]), &AxisScales::default());
        assert!(matches!(err, Err(ClickHistError::EmptyPointSet)));
    }

    #[test]
    fn test_pixel_scaling_changes_nearest() {
        let points = set(&[(1.0, 0.0), (0.0, 2.0)]);
        let click = ClickPoint::new(0.0, 0.0);

        // Equal scaling: (1, 0) is closer
        assert_eq!(find_nearest(click, &points, &AxisScales::default()).unwrap(), 0);

        // x axis stretched 10x on screen: (0, 2) is now closer
        let stretched = AxisScales {
            x: AxisScale::linear(10.0),
            y: AxisScale::linear(1.0),
        };
        assert_eq!(find_nearest(click, &points, &stretched).unwrap(), 1);
    }

    #[test]
    fn test_axis_direction_does_not_matter() {
        let points = set(&[(1.0, 3.0), (2.0, 1.0), (5.0, 5.0)]);
        let click = ClickPoint::new(1.9, 1.2);
        let up = AxisScales {
            x: AxisScale::linear(40.0),
            y: AxisScale::linear(25.0),
        };
        let flipped = AxisScales {
            x: AxisScale::linear(-40.0),
            y: AxisScale::linear(-25.0),
        };
        assert_eq!(find_nearest(click, &points, &up).unwrap(), 1);
        assert_eq!(find_nearest(click, &points, &flipped).unwrap(), 1);
    }

    #[test]
    fn test_log_axis_uses_log_distance() {
        let points = set(&[(1.0, 0.0), (200.0, 0.0)]);
        let click = ClickPoint::new(12.0, 0.0);
        assert_eq!(find_nearest(click, &points, &AxisScales::default()).unwrap(), 0);

        let log_x = AxisScales {
            x: AxisScale::log(100.0),
            y: AxisScale::linear(1.0),
        };
        // log10(12) = 1.079 vs 0 and 2.301: point 0 is 1.079 away, point 1 is 1.222 away
        assert_eq!(find_nearest(click, &points, &log_x).unwrap(), 0);

        let click = ClickPoint::new(20.0, 0.0);
        // linear: 19 vs 180 -> point 0; log: 1.301 vs 1.0 -> point 1
        assert_eq!(find_nearest(click, &points, &AxisScales::default()).unwrap(), 0);
        assert_eq!(find_nearest(click, &points, &log_x).unwrap(), 1);
    }

    #[test]
    fn test_tie_prefers_first() {
        let points = set(&[(-1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let click = ClickPoint::new(0.0, 0.0);
        assert_eq!(find_nearest(click, &points, &AxisScales::default()).unwrap(), 0);
    }

    #[test]
    fn test_unplaceable_points_skipped() {
        let points = set(&[(-5.0, 0.0), (100.0, 0.0)]);
        let log_x = AxisScales {
            x: AxisScale::log(1.0),
            y: AxisScale::linear(1.0),
        };
        assert_eq!(find_nearest(ClickPoint::new(1.0, 0.0), &points, &log_x).unwrap(), 1);

        let only_negative = set(&[(-5.0, 0.0)]);
        assert!(matches!(
            find_nearest(ClickPoint::new(1.0, 0.0), &only_negative, &log_x),
            Err(ClickHistError::EmptyPointSet)
        ));
    }

    #[test]
    fn test_axis_kind_round_trip() {
        assert_eq!(AxisKind::Linear.inverse(AxisKind::Linear.forward(3.5)), 3.5);
        let v = AxisKind::Log.inverse(AxisKind::Log.forward(250.0));
        assert!((v - 250.0).abs() < 1e-9);
    }
}
