//! A loaded ClickHist session
//!
//! Binning, quantiles and marker subsampling all run once in
//! [`Session::build`]; afterwards the session is read-only and every click is
//! answered from it.

use std::path::Path;

use crate::config::{AxisConfig, ClickHistConfig};
use crate::data::GridDataset;
use crate::error::{ClickHistError, Result};
use crate::grid::GridLocation;
use crate::hist::{
    BinEdges, Histogram2D, PlottedPointSet, PointId, Quantile, SortedSample, compute_histogram,
    select_plotted_points,
};
use crate::pick::{
    AxisKind, ClickEvent, ClickState, DispatchContext, DispatchInstruction, Transition,
    handle_click,
};

/// Everything known about one histogram axis after startup
#[derive(Debug, Clone)]
pub struct AxisData {
    pub config: AxisConfig,
    pub edges: BinEdges,
    pub sample: SortedSample,
    pub quantiles: Vec<Quantile>,
}

impl AxisData {
    fn build(config: &AxisConfig, values: &[f64], percentiles: &[f64]) -> Result<Self> {
        let edges = config.bin_edges()?;
        let sample = SortedSample::new(values);
        let quantiles = if sample.is_empty() {
            Vec::new()
        } else {
            sample.quantiles(percentiles)?
        };
        Ok(Self {
            config: config.clone(),
            edges,
            sample,
            quantiles,
        })
    }

    pub fn kind(&self) -> AxisKind {
        if self.config.log_scale {
            AxisKind::Log
        } else {
            AxisKind::Linear
        }
    }

    /// `name: value units`
    pub fn describe(&self, value: f64) -> String {
        let mut s = format!("{}: {}", self.config.name, self.config.format.format(value));
        if !self.config.units.is_empty() {
            s.push(' ');
            s.push_str(&self.config.units);
        }
        s
    }
}

/// What the info panel and the case action learn about one sample
#[derive(Debug, Clone, PartialEq)]
pub struct PointSummary {
    /// Marker the sample was picked through; `None` for direct lookups
    pub point_id: Option<PointId>,
    pub flat_index: usize,
    pub x: f64,
    pub y: f64,
    pub x_percentile: f64,
    pub y_percentile: f64,
    pub location: GridLocation,
    /// Formatted x and y values with units
    pub values: String,
}

impl PointSummary {
    /// e.g. `200 E -20 N`
    pub fn location_string(&self) -> String {
        format!("{:3.0} E {:2.0} N", self.location.lon, self.location.lat)
    }

    pub fn percentile_string(&self) -> String {
        format!("x%: {:2.3} y%: {:2.3}", self.x_percentile, self.y_percentile)
    }
}

/// Result of one click
#[derive(Debug)]
pub enum ClickResponse {
    Preview(PointSummary),
    Commit {
        summary: PointSummary,
        instruction: DispatchInstruction,
    },
}

pub struct Session {
    config: ClickHistConfig,
    dataset: GridDataset,
    histogram: Histogram2D,
    points: PlottedPointSet,
    x: AxisData,
    y: AxisData,
}

impl Session {
    pub fn build(config: ClickHistConfig, dataset: GridDataset) -> Result<Self> {
        profiling::scope!("Session::build");
        config.validate()?;

        let percentiles = config.quantile_percentiles();
        let x = AxisData::build(&config.x, dataset.x(), percentiles)?;
        let y = AxisData::build(&config.y, dataset.y(), percentiles)?;

        let histogram = compute_histogram(dataset.x(), dataset.y(), &x.edges, &y.edges)?;
        let points = select_plotted_points(
            &histogram,
            dataset.x(),
            dataset.y(),
            config.max_plotted_in_bin,
            config.rng_seed,
        )?;

        log::info!(
            "{} samples on a {}x{}x{} grid: {} binned, {} skipped, {} of {} bins occupied, {} plotted points",
            dataset.len(),
            dataset.dims().lon_len(),
            dataset.dims().lat_len(),
            dataset.dims().time_len(),
            histogram.total(),
            histogram.skipped(),
            histogram.occupied_count(),
            x.edges.bin_count() * y.edges.bin_count(),
            points.len()
        );

        Ok(Self {
            config,
            dataset,
            histogram,
            points,
            x,
            y,
        })
    }

    /// Read a config file, load its data section and build the session
    ///
    /// `data_override` replaces the configured data path; column names and
    /// the rest of the data section still come from the config.
    pub fn open(config_path: &Path, data_override: Option<&Path>) -> Result<Self> {
        let config = ClickHistConfig::from_file(config_path)?;
        let mut data = config
            .data
            .clone()
            .ok_or_else(|| ClickHistError::config("config has no data section"))?;
        if let Some(path) = data_override {
            log::info!("data path overridden with {}", path.display());
            data.path = path.to_path_buf();
        }
        let dataset = GridDataset::load(&data)?;
        Self::build(config, dataset)
    }

    pub fn config(&self) -> &ClickHistConfig {
        &self.config
    }

    pub fn dataset(&self) -> &GridDataset {
        &self.dataset
    }

    pub fn histogram(&self) -> &Histogram2D {
        &self.histogram
    }

    pub fn points(&self) -> &PlottedPointSet {
        &self.points
    }

    pub fn x_axis(&self) -> &AxisData {
        &self.x
    }

    pub fn y_axis(&self) -> &AxisData {
        &self.y
    }

    /// Describe the sample at a flat grid index
    pub fn summarize_flat(&self, flat_index: usize, point_id: Option<PointId>) -> Result<PointSummary> {
        let location = self.dataset.dims().locate(flat_index)?;
        let x = self.dataset.x()[flat_index];
        let y = self.dataset.y()[flat_index];
        Ok(PointSummary {
            point_id,
            flat_index,
            x,
            y,
            x_percentile: self.x.sample.percentile_rank(x),
            y_percentile: self.y.sample.percentile_rank(y),
            location,
            values: format!("{}, {}", self.x.describe(x), self.y.describe(y)),
        })
    }

    /// Describe a plotted marker
    pub fn summarize(&self, point_id: PointId) -> Result<PointSummary> {
        let point = self
            .points
            .get(point_id)
            .ok_or(ClickHistError::IndexOutOfRange {
                index: point_id as i64,
                len: self.points.len(),
            })?;
        self.summarize_flat(point.flat_index, Some(point_id))
    }

    /// Dispatch instruction carrying this session's context
    pub fn instruction(&self, summary: &PointSummary) -> DispatchInstruction {
        DispatchInstruction {
            point_id: summary.point_id,
            flat_index: summary.flat_index,
            context: DispatchContext {
                metadata: self.config.metadata.clone(),
                x_percentile: summary.x_percentile,
                y_percentile: summary.y_percentile,
                values: summary.values.clone(),
            },
        }
    }

    /// Resolve a click and advance the preview/commit protocol
    ///
    /// The returned state is already advanced; a commit's instruction still
    /// has to be handed to the dispatcher.
    pub fn click(&self, event: &ClickEvent, state: ClickState) -> Result<(ClickState, ClickResponse)> {
        let (next, transition) = handle_click(event, state, &self.points)?;
        let response = match transition {
            Transition::Preview(id) => {
                let summary = self.summarize(id)?;
                log::info!(
                    "preview point {} (flat index {}): {}",
                    id,
                    summary.flat_index,
                    summary.values
                );
                ClickResponse::Preview(summary)
            }
            Transition::Commit(id) => {
                let summary = self.summarize(id)?;
                log::info!("commit point {} (flat index {})", id, summary.flat_index);
                let instruction = self.instruction(&summary);
                ClickResponse::Commit {
                    summary,
                    instruction,
                }
            }
        };
        Ok((next, response))
    }
}
