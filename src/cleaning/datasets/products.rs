use super::base::DatasetCleaner;
use crate::cleaning::rules::null_filter::drop_rows_with_nulls;
use crate::cleaning::rules::{convert_weight_column, drop_placeholder_blocks, normalize_date_column, strip_nulls};
use crate::constants::PLACEHOLDER_BLOCK_WINDOW;
use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Cleaner for the product catalog held in object storage
pub struct ProductsCleaner;

impl ProductsCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProductsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for ProductsCleaner {
    fn clean(&self, table: Table) -> Result<Table> {
        let table = strip_nulls(table);
        let table = drop_placeholder_blocks(table, PLACEHOLDER_BLOCK_WINDOW);
        // Weights with no number and unit come back null
        let table = drop_rows_with_nulls(convert_weight_column(table, "weight")?);
        let mut table = normalize_date_column(table, "date_added")?;
        if table.column_count() > 0 {
            table.rename_column(0, "index")?;
        }
        Ok(table)
    }

    fn dataset(&self) -> Dataset {
        Dataset::Products
    }

    fn name(&self) -> &str {
        "Products Cleaner"
    }
}
