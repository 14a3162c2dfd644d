use super::base::DatasetCleaner;
use crate::cleaning::rules::{filter_nulls_and_placeholders, scrub};
use crate::constants::{STORE_COLUMN_ORDER, STORE_DUPLICATE_LATITUDE};
use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Cleaner for the store listings pulled from the store API
pub struct StoresCleaner;

impl StoresCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoresCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for StoresCleaner {
    fn clean(&self, table: Table) -> Result<Table> {
        // The duplicate latitude is almost entirely null, so it has to go
        // before rows with nulls are dropped.
        let table = table
            .drop_columns(&[STORE_DUPLICATE_LATITUDE])?
            .select_columns(&STORE_COLUMN_ORDER)?;
        let table = filter_nulls_and_placeholders(table);
        let table = scrub::scrub_continents(table, "continent")?;
        scrub::strip_non_digits(table, "staff_numbers")
    }

    fn dataset(&self) -> Dataset {
        Dataset::Stores
    }

    fn name(&self) -> &str {
        "Store Details Cleaner"
    }
}
