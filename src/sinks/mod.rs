pub mod csv_file;
pub mod database;

pub use csv_file::CsvFileSink;
pub use database::DatabaseTableSink;

use crate::config::Config;
use crate::types::{Dataset, TableSink};

/// Where cleaned tables go
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SinkKind {
    /// The target PostgreSQL database
    Db,
    /// One CSV per dataset under the output directory
    Csv,
}

pub fn sink_for(kind: SinkKind, dataset: Dataset, config: &Config) -> Box<dyn TableSink> {
    match kind {
        SinkKind::Db => Box::new(DatabaseTableSink::new(
            config.target_db.clone(),
            dataset.target_table(),
        )),
        SinkKind::Csv => Box::new(CsvFileSink::new(
            config.output.dir.join(format!("{}.csv", dataset.target_table())),
        )),
    }
}
