use polars::prelude::*;
use std::path::Path;

use crate::error::{ClickHistError, Result};

/// DataSource wraps a materialized Polars DataFrame read from CSV or Parquet
pub struct DataSource {
    materialized: DataFrame,
}

impl DataSource {
    /// Load data from a file (CSV or Parquet)
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_filtered(path, None)
    }

    /// Load data, applying `filter` lazily before materializing
    pub fn load_filtered(path: &Path, filter: Option<Expr>) -> Result<Self> {
        profiling::scope!("DataSource::load");
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ClickHistError::config(format!("{} has no file extension", path.display())))?;

        let mut df = match extension.to_lowercase().as_str() {
            "parquet" => LazyFrame::scan_parquet(path, Default::default())?,
            "csv" => LazyCsvReader::new(path)
                .with_has_header(true)
                .with_infer_schema_length(Some(100))
                .finish()?,
            ext => {
                return Err(ClickHistError::config(format!(
                    "unsupported data format '{}' (expected csv or parquet)",
                    ext
                )));
            }
        };
        if let Some(filter) = filter {
            df = df.filter(filter);
        }

        let materialized = df.collect()?;
        log::debug!(
            "loaded {} rows x {} columns from {}",
            materialized.height(),
            materialized.width(),
            path.display()
        );

        Ok(Self { materialized })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.materialized
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.materialized.height()
    }

    /// Get a column's values as Vec<f64>, nulls become NaN
    pub fn column_as_f64(&self, col: &str) -> Result<Vec<f64>> {
        let series = self
            .materialized
            .column(col)
            .map(|c| c.as_materialized_series().clone())
            .map_err(|_| ClickHistError::ColumnNotFound {
                column: col.to_string(),
            })?;

        let cast = series.cast(&DataType::Float64)?;
        Ok(cast
            .f64()?
            .into_iter()
            .map(|opt| opt.unwrap_or(f64::NAN))
            .collect())
    }
}

/// Keep rows whose `column` lies in the closed range `[lo, hi]`
pub fn range_filter(column: &str, [lo, hi]: [f64; 2]) -> Expr {
    col(column).gt_eq(lit(lo)).and(col(column).lt_eq(lit(hi)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_loading() {
        let file = csv(&["x,y,z", "1,2,3", "4,5.5,6", "7,,9"]);
        let ds = DataSource::load(file.path()).unwrap();

        assert_eq!(ds.height(), 3);
        assert_eq!(ds.column_names(), vec!["x", "y", "z"]);
        assert_eq!(ds.column_as_f64("x").unwrap(), vec![1.0, 4.0, 7.0]);

        let y = ds.column_as_f64("y").unwrap();
        assert_eq!(&y[..2], &[2.0, 5.5]);
        assert!(y[2].is_nan());
    }

    #[test]
    fn test_missing_column() {
        let file = csv(&["a,b", "1,2"]);
        let ds = DataSource::load(file.path()).unwrap();
        assert!(matches!(
            ds.column_as_f64("PREC"),
            Err(ClickHistError::ColumnNotFound { column }) if column == "PREC"
        ));
    }

    #[test]
    fn test_filtered_load() {
        let file = csv(&["lon,v", "190,1", "200,2", "210,3", "250,4"]);
        let ds = DataSource::load_filtered(file.path(), Some(range_filter("lon", [195.0, 240.0]))).unwrap();
        assert_eq!(ds.column_as_f64("v").unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".nc").tempfile().unwrap();
        assert!(matches!(
            DataSource::load(file.path()),
            Err(ClickHistError::InvalidConfiguration(_))
        ));
    }
}
