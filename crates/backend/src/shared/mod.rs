pub mod config;
pub mod format;
pub mod sales_source;
