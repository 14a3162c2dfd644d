use super::base::DatasetCleaner;
use crate::cleaning::rules::filter_nulls_and_placeholders;
use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Cleaner for the sale date/time events JSON
pub struct DateEventsCleaner;

impl DateEventsCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateEventsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for DateEventsCleaner {
    fn clean(&self, table: Table) -> Result<Table> {
        Ok(filter_nulls_and_placeholders(table))
    }

    fn dataset(&self) -> Dataset {
        Dataset::DateEvents
    }

    fn name(&self) -> &str {
        "Date Events Cleaner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_placeholder_events_dropped() {
        let raw = Table::from_rows(
            vec!["timestamp".into(), "month".into(), "year".into(), "time_period".into()],
            vec![
                vec![json!("22:00:06"), json!("9"), json!("2012"), json!("Evening")],
                vec![json!("NULL"), json!("NULL"), json!("NULL"), json!("NULL")],
                vec![json!("DXBU6GX1VC"), json!("OEOXBP8X6G"), json!("1YMRDJNU2T"), json!("1PZDMCME1C")],
            ],
        );
        let cleaned = DateEventsCleaner::new().clean(raw).unwrap();
        assert_eq!(cleaned.row_count(), 1);
    }
}
