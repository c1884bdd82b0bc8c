pub mod loader;
pub mod row;
pub mod store;

use std::path::PathBuf;
use thiserror::Error;

pub use loader::{load_sales_records, resolve_data_file, LoadReport};
pub use store::{LoadedSales, SalesStore};

/// Errors of locating and reading the sales file
#[derive(Debug, Error)]
pub enum SalesSourceError {
    #[error("Sales data file {file_name} not found in {data_dir} or {project_dir}")]
    NotFound {
        file_name: String,
        data_dir: PathBuf,
        project_dir: PathBuf,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook {0} has no sheets")]
    EmptyWorkbook(PathBuf),

    #[error("Unsupported sales file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Loader task failed: {0}")]
    Task(String),
}
