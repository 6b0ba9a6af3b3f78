//! Off-screen PNG of the density histogram with one point highlighted

use std::path::Path;

use image::{Rgb, RgbImage};

use super::quicklook::draw_marker;
use crate::constants::plot::{SNAPSHOT_HEIGHT, SNAPSHOT_WIDTH};
use crate::error::Result;
use crate::heat::{heat_rgb, normalized_count};
use crate::hist::{BinEdges, Histogram2D, PlottedPointSet};
use crate::pick::AxisKind;

const MARGIN: u32 = 24;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const POINT_COLOR: Rgb<u8> = Rgb([40, 40, 40]);
const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

/// Maps one data axis onto a pixel range
struct PixelAxis {
    kind: AxisKind,
    lo: f64,
    hi: f64,
    start: f64,
    len: f64,
}

impl PixelAxis {
    fn new(edges: &BinEdges, kind: AxisKind, start: u32, len: u32) -> Self {
        Self {
            kind,
            lo: kind.forward(edges.first()),
            hi: kind.forward(edges.last()),
            start: start as f64,
            len: len as f64,
        }
    }

    fn to_pixel(&self, value: f64) -> Option<f64> {
        let v = self.kind.forward(value);
        if !v.is_finite() || v < self.lo || v > self.hi {
            return None;
        }
        Some(self.start + (v - self.lo) / (self.hi - self.lo) * self.len)
    }
}

/// Render the histogram, plotted points and an optional highlighted sample
pub fn render(
    histogram: &Histogram2D,
    points: &PlottedPointSet,
    kinds: (AxisKind, AxisKind),
    highlight: Option<(f64, f64)>,
) -> RgbImage {
    profiling::scope!("snapshot::render");
    let (w, h) = (SNAPSHOT_WIDTH, SNAPSHOT_HEIGHT);
    let mut img = RgbImage::from_pixel(w, h, BACKGROUND);
    let plot_w = w - 2 * MARGIN;
    let plot_h = h - 2 * MARGIN;
    let xa = PixelAxis::new(histogram.x_edges(), kinds.0, MARGIN, plot_w);
    // image rows grow downward, so the y axis runs from the bottom margin up
    let ya = PixelAxis::new(histogram.y_edges(), kinds.1, MARGIN, plot_h);
    let row = |py: f64| (h - MARGIN) as f64 - (py - MARGIN as f64);

    let max = histogram.max_count();
    for (ix, iy, members) in histogram.occupied() {
        let (Some((x0, x1)), Some((y0, y1))) =
            (histogram.x_edges().bounds(ix), histogram.y_edges().bounds(iy))
        else {
            continue;
        };
        let (Some(px0), Some(px1), Some(py0), Some(py1)) =
            (xa.to_pixel(x0), xa.to_pixel(x1), ya.to_pixel(y0), ya.to_pixel(y1))
        else {
            continue;
        };
        let color = Rgb(heat_rgb(normalized_count(members.len(), max)));
        let (top, bottom) = (row(py1), row(py0));
        for x in px0.floor() as u32..(px1.ceil() as u32).min(w) {
            for y in top.floor() as u32..(bottom.ceil() as u32).min(h) {
                img.put_pixel(x, y, color);
            }
        }
    }

    for (_, p) in points.iter() {
        if let (Some(px), Some(py)) = (xa.to_pixel(p.x), ya.to_pixel(p.y)) {
            let (x, y) = (px as u32, row(py) as u32);
            if x < w && y < h {
                img.put_pixel(x, y, POINT_COLOR);
            }
        }
    }

    if let Some((hx, hy)) = highlight {
        if let (Some(px), Some(py)) = (xa.to_pixel(hx), ya.to_pixel(hy)) {
            draw_marker(&mut img, px as i64, row(py) as i64, HIGHLIGHT_COLOR);
        }
    }
    img
}

/// Render and save as PNG
pub fn save(
    path: &Path,
    histogram: &Histogram2D,
    points: &PlottedPointSet,
    kinds: (AxisKind, AxisKind),
    highlight: Option<(f64, f64)>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    render(histogram, points, kinds, highlight).save(path)?;
    log::debug!("saved histogram snapshot {}", path.display());
    Ok(())
}
