pub mod dataset;
pub mod source;

pub use dataset::GridDataset;
pub use source::DataSource;
