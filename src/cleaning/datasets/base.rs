use metrics::counter;
use tracing::{debug, warn};

use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Base trait for dataset-specific cleaners
pub trait DatasetCleaner: Send + Sync {
    /// Clean a raw table of this dataset
    fn clean(&self, table: Table) -> Result<Table>;

    /// The dataset this cleaner handles
    fn dataset(&self) -> Dataset;

    /// Get a human-readable name for this cleaner
    fn name(&self) -> &str;
}

/// A wrapper that adds row accounting to any cleaner implementation
pub struct MetricsCleaner<C: DatasetCleaner> {
    inner: C,
}

impl<C: DatasetCleaner> MetricsCleaner<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: DatasetCleaner> DatasetCleaner for MetricsCleaner<C> {
    fn clean(&self, table: Table) -> Result<Table> {
        let dataset = self.inner.dataset().name();
        let rows_in = table.row_count();

        match self.inner.clean(table) {
            Ok(cleaned) => {
                let dropped = rows_in.saturating_sub(cleaned.row_count());
                counter!("etl_rows_dropped_total", "dataset" => dataset).increment(dropped as u64);
                debug!(
                    "{}: {} rows in, {} rows out, {} columns",
                    self.inner.name(),
                    rows_in,
                    cleaned.row_count(),
                    cleaned.column_count()
                );
                Ok(cleaned)
            }
            Err(e) => {
                counter!("etl_cleaning_errors_total", "dataset" => dataset).increment(1);
                warn!("{} failed: {}", self.inner.name(), e);
                Err(e)
            }
        }
    }

    fn dataset(&self) -> Dataset {
        self.inner.dataset()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
