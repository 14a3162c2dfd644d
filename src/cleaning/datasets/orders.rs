use super::base::DatasetCleaner;
use crate::constants::ORDER_PRUNED_COLUMNS;
use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Cleaner for the orders table. Orders are the source of truth, so the
/// only change is pruning redundant columns.
pub struct OrdersCleaner;

impl OrdersCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrdersCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for OrdersCleaner {
    fn clean(&self, table: Table) -> Result<Table> {
        table.drop_columns(&ORDER_PRUNED_COLUMNS)
    }

    fn dataset(&self) -> Dataset {
        Dataset::Orders
    }

    fn name(&self) -> &str {
        "Orders Cleaner"
    }
}
