use crate::constants;
use crate::error::{EtlError, Result};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The datasets this tool knows how to clean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Users,
    Cards,
    Stores,
    Products,
    Orders,
    DateEvents,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::Users,
        Dataset::Cards,
        Dataset::Stores,
        Dataset::Products,
        Dataset::Orders,
        Dataset::DateEvents,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Users => constants::USERS_DATASET,
            Dataset::Cards => constants::CARDS_DATASET,
            Dataset::Stores => constants::STORES_DATASET,
            Dataset::Products => constants::PRODUCTS_DATASET,
            Dataset::Orders => constants::ORDERS_DATASET,
            Dataset::DateEvents => constants::DATE_EVENTS_DATASET,
        }
    }

    /// Table the cleaned dataset is loaded into
    pub fn target_table(&self) -> &'static str {
        match self {
            Dataset::Users => constants::USERS_TARGET_TABLE,
            Dataset::Cards => constants::CARDS_TARGET_TABLE,
            Dataset::Stores => constants::STORES_TARGET_TABLE,
            Dataset::Products => constants::PRODUCTS_TARGET_TABLE,
            Dataset::Orders => constants::ORDERS_TARGET_TABLE,
            Dataset::DateEvents => constants::DATE_EVENTS_TARGET_TABLE,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Dataset::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| EtlError::UnknownDataset(s.to_string()))
    }
}

/// Core trait that every raw data source implements
#[async_trait::async_trait]
pub trait TableSource: Send + Sync {
    /// Human-readable description used in logs
    fn describe(&self) -> String;

    /// Fetch the whole source as one table
    async fn fetch(&self) -> Result<Table>;
}

/// Destination for a cleaned table
#[async_trait::async_trait]
pub trait TableSink: Send + Sync {
    fn describe(&self) -> String;

    /// Persist the table, replacing whatever the destination held before.
    /// Returns a reference to where the data went (a path or a table name).
    async fn write(&self, table: &Table) -> Result<String>;
}
