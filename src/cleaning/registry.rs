use std::collections::HashMap;

use super::datasets::{
    CardsCleaner, DatasetCleaner, DateEventsCleaner, MetricsCleaner, OrdersCleaner, ProductsCleaner,
    StoresCleaner, UsersCleaner,
};
use crate::error::{EtlError, Result};
use crate::table::Table;
use crate::types::Dataset;

/// Registry of dataset-specific cleaning routines
pub struct CleanerRegistry {
    cleaners: HashMap<Dataset, Box<dyn DatasetCleaner>>,
}

impl CleanerRegistry {
    /// Create a new registry with every built-in cleaner
    pub fn new() -> Self {
        let mut registry = Self {
            cleaners: HashMap::new(),
        };

        registry.register(Box::new(MetricsCleaner::new(UsersCleaner::new())));
        registry.register(Box::new(MetricsCleaner::new(CardsCleaner::new())));
        registry.register(Box::new(MetricsCleaner::new(StoresCleaner::new())));
        registry.register(Box::new(MetricsCleaner::new(ProductsCleaner::new())));
        registry.register(Box::new(MetricsCleaner::new(OrdersCleaner::new())));
        registry.register(Box::new(MetricsCleaner::new(DateEventsCleaner::new())));

        registry
    }

    /// Register a cleaner, replacing any existing one for its dataset
    pub fn register(&mut self, cleaner: Box<dyn DatasetCleaner>) {
        self.cleaners.insert(cleaner.dataset(), cleaner);
    }

    pub fn get_cleaner(&self, dataset: Dataset) -> Option<&dyn DatasetCleaner> {
        self.cleaners.get(&dataset).map(|c| c.as_ref())
    }

    /// Clean a table with the cleaner registered for `dataset`
    pub fn clean(&self, dataset: Dataset, table: Table) -> Result<Table> {
        match self.get_cleaner(dataset) {
            Some(cleaner) => cleaner.clean(table),
            None => Err(EtlError::UnknownDataset(dataset.to_string())),
        }
    }

    /// List all registered datasets
    pub fn list_datasets(&self) -> Vec<Dataset> {
        let mut datasets: Vec<Dataset> = self.cleaners.keys().copied().collect();
        datasets.sort_by_key(|d| Dataset::ALL.iter().position(|a| a == d));
        datasets
    }
}

impl Default for CleanerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_has_built_in_cleaners() {
        let registry = CleanerRegistry::new();
        assert_eq!(registry.list_datasets(), Dataset::ALL.to_vec());
    }

    #[test]
    fn test_registry_dispatches_by_dataset() {
        let registry = CleanerRegistry::new();
        let orders = Table::from_rows(
            vec!["first_name".into(), "last_name".into(), "1".into(), "card_number".into()],
            vec![vec![json!("a"), json!("b"), json!(1), json!(42)]],
        );
        let cleaned = registry.clean(Dataset::Orders, orders).unwrap();
        assert_eq!(cleaned.columns(), &["card_number"]);
    }

    #[test]
    fn test_registry_without_cleaner_reports_unknown_dataset() {
        let registry = CleanerRegistry {
            cleaners: HashMap::new(),
        };
        let err = registry.clean(Dataset::Users, Table::default()).unwrap_err();
        assert!(matches!(err, EtlError::UnknownDataset(_)));
    }
}
