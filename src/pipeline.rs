use crate::cleaning::CleanerRegistry;
use crate::error::Result;
use crate::types::{Dataset, TableSink, TableSource};
use metrics::{counter, histogram};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument};

/// Result of one extract, clean and load pass
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub dataset: Dataset,
    pub rows_read: usize,
    pub rows_written: usize,
    pub columns_written: usize,
    pub destination: String,
}

impl PipelineResult {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_written)
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Extract `dataset` from `source`, clean it, and hand it to `sink`
    #[instrument(skip(source, registry, sink), fields(source = %source.describe(), sink = %sink.describe()))]
    pub async fn run_for_dataset(
        dataset: Dataset,
        source: &dyn TableSource,
        registry: &CleanerRegistry,
        sink: &dyn TableSink,
    ) -> Result<PipelineResult> {
        let name = dataset.name();
        info!("🚀 Starting pipeline for {}", name);
        counter!("etl_pipeline_runs_total", "dataset" => name).increment(1);
        let started = Instant::now();

        // Step 1: Extract
        let raw = source.fetch().await?;
        let rows_read = raw.row_count();
        counter!("etl_rows_read_total", "dataset" => name).increment(rows_read as u64);
        info!("📡 Read {} rows, {} columns", rows_read, raw.column_count());

        // Step 2: Clean
        let cleaned = registry.clean(dataset, raw)?;
        info!(
            "🔧 Cleaned {}: {} rows kept, {} dropped",
            name,
            cleaned.row_count(),
            rows_read.saturating_sub(cleaned.row_count())
        );

        // Step 3: Load
        let destination = sink.write(&cleaned).await?;
        counter!("etl_rows_written_total", "dataset" => name).increment(cleaned.row_count() as u64);
        info!("💾 Saved {} to {}", name, destination);

        histogram!("etl_pipeline_duration_seconds", "dataset" => name)
            .record(started.elapsed().as_secs_f64());

        Ok(PipelineResult {
            dataset,
            rows_read,
            rows_written: cleaned.row_count(),
            columns_written: cleaned.column_count(),
            destination,
        })
    }
}
