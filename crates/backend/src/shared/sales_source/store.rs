use contracts::dashboards::d402_sales_analytics::{DashboardData, SalesRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use super::loader::{load_sales_records, resolve_data_file};
use super::SalesSourceError;
use crate::dashboards::d402_sales_analytics::aggregator::calculate_dashboard_data;
use crate::shared::config::SalesDataConfig;

/// Immutable snapshot of one version of the sales file
#[derive(Debug)]
pub struct LoadedSales {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub records: Vec<SalesRecord>,
    pub skipped: usize,
    pub dashboard: DashboardData,
}

impl LoadedSales {
    fn load(path: PathBuf, modified: Option<SystemTime>) -> Result<Self, SalesSourceError> {
        let report = load_sales_records(&path)?;
        let dashboard = calculate_dashboard_data(&report.records);
        Ok(Self {
            path,
            modified,
            records: report.records,
            skipped: report.skipped,
            dashboard,
        })
    }

    fn is_current(&self, path: &Path, modified: Option<SystemTime>) -> bool {
        modified.is_some() && self.path.as_path() == path && self.modified == modified
    }
}

/// Shared, lazily loaded sales dataset.
///
/// The snapshot is reused until the file's modification time changes.
pub struct SalesStore {
    source: Source,
    current: RwLock<Option<Arc<LoadedSales>>>,
}

#[derive(Clone)]
enum Source {
    Config(SalesDataConfig),
    File(PathBuf),
}

impl Source {
    /// Resolve the file and read its modification time. Blocking.
    fn locate(&self) -> Result<(PathBuf, Option<SystemTime>), SalesSourceError> {
        let path = match self {
            Source::Config(config) => resolve_data_file(config)?,
            Source::File(path) => path.clone(),
        };
        let modified = std::fs::metadata(&path)?.modified().ok();
        Ok((path, modified))
    }
}

impl SalesStore {
    pub fn new(config: SalesDataConfig) -> Self {
        Self {
            source: Source::Config(config),
            current: RwLock::new(None),
        }
    }

    /// Store reading a fixed file, skipping data directory resolution
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
            current: RwLock::new(None),
        }
    }

    /// Current snapshot, reloading when the file changed
    pub async fn snapshot(&self) -> Result<Arc<LoadedSales>, SalesSourceError> {
        // Resolution may copy the file into the data directory
        let source = self.source.clone();
        let (path, modified) = tokio::task::spawn_blocking(move || source.locate())
            .await
            .map_err(|e| SalesSourceError::Task(e.to_string()))??;

        {
            let current = self.current.read().await;
            if let Some(loaded) = current.as_ref() {
                if loaded.is_current(&path, modified) {
                    return Ok(loaded.clone());
                }
            }
        }

        let mut current = self.current.write().await;
        // Another request may have reloaded while we waited for the lock
        if let Some(loaded) = current.as_ref() {
            if loaded.is_current(&path, modified) {
                return Ok(loaded.clone());
            }
        }

        tracing::info!("Loading sales data from {}", path.display());
        let loaded = tokio::task::spawn_blocking(move || LoadedSales::load(path, modified))
            .await
            .map_err(|e| SalesSourceError::Task(e.to_string()))??;
        let loaded = Arc::new(loaded);
        *current = Some(loaded.clone());
        Ok(loaded)
    }
}
