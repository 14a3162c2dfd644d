pub mod csv_file;
pub mod database;
pub mod formats;
pub mod object_storage;
pub mod pdf;
pub mod store_api;

pub use csv_file::CsvFileSource;
pub use database::DatabaseTableSource;
pub use object_storage::ObjectStorageSource;
pub use pdf::PdfTableSource;
pub use store_api::StoreApiSource;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Dataset, TableSource};
use std::time::Duration;

/// Build the reader for where `dataset` lives in production
pub fn source_for(dataset: Dataset, config: &Config) -> Result<Box<dyn TableSource>> {
    let source: Box<dyn TableSource> = match dataset {
        Dataset::Users => Box::new(DatabaseTableSource::new(
            config.source_db.clone(),
            &config.sources.users_table,
        )),
        Dataset::Orders => Box::new(DatabaseTableSource::new(
            config.source_db.clone(),
            &config.sources.orders_table,
        )),
        Dataset::Cards => Box::new(PdfTableSource::new(
            &config.sources.card_details_pdf,
            Duration::from_secs(config.store_api.timeout_seconds),
        )?),
        Dataset::Stores => Box::new(StoreApiSource::new(&config.store_api)?),
        Dataset::Products => Box::new(ObjectStorageSource::new(
            &config.object_storage,
            &config.sources.products_object,
        )?),
        Dataset::DateEvents => Box::new(ObjectStorageSource::new(
            &config.object_storage,
            &config.sources.date_events_object,
        )?),
    };
    Ok(source)
}
