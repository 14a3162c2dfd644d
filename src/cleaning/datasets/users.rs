use super::base::DatasetCleaner;
use crate::cleaning::rules::{filter_nulls_and_placeholders, normalize_date_column, normalize_phone_column, scrub};
use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Cleaner for the legacy user records table
pub struct UsersCleaner;

impl UsersCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UsersCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for UsersCleaner {
    fn clean(&self, table: Table) -> Result<Table> {
        let table = filter_nulls_and_placeholders(table);
        let table = normalize_date_column(table, "date_of_birth")?;
        let table = normalize_date_column(table, "join_date")?;
        let table = scrub::first_line(table, "address")?;
        normalize_phone_column(table, "phone_number", "country_code")
    }

    fn dataset(&self) -> Dataset {
        Dataset::Users
    }

    fn name(&self) -> &str {
        "Users Cleaner"
    }
}
