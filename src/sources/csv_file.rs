use crate::error::Result;
use crate::sources::formats::parse_csv;
use crate::table::Table;
use crate::types::TableSource;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Reads a local CSV export, used to clean a dataset without touching the
/// network.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl TableSource for CsvFileSource {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Table> {
        let bytes = tokio::fs::read(&self.path).await?;
        let table = parse_csv(&bytes)?;
        info!("Loaded {} rows from {}", table.row_count(), self.path.display());
        Ok(table)
    }
}
