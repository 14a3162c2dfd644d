use super::base::DatasetCleaner;
use crate::cleaning::rules::{filter_nulls_and_placeholders, normalize_date_column, scrub};
use crate::error::Result;
use crate::table::Table;
use crate::types::Dataset;

/// Cleaner for the card details extracted from the PDF
pub struct CardsCleaner;

impl CardsCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CardsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for CardsCleaner {
    fn clean(&self, table: Table) -> Result<Table> {
        let table = filter_nulls_and_placeholders(table);
        let table = normalize_date_column(table, "date_payment_confirmed")?;
        scrub::scrub_card_numbers(table, "card_number")
    }

    fn dataset(&self) -> Dataset {
        Dataset::Cards
    }

    fn name(&self) -> &str {
        "Card Details Cleaner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_clean_cards() {
        let raw = Table::from_rows(
            vec!["card_number".into(), "expiry_date".into(), "card_provider".into(), "date_payment_confirmed".into()],
            vec![
                vec![json!("???4971858637664481"), json!("09/26"), json!("VISA 16 digit"), json!("2015-11-25")],
                vec![json!("NULL"), json!("NULL"), json!("NULL"), json!("NULL")],
                vec![json!("NB71VBAHJE"), json!("WJVMUO4QX6"), json!("JRPRLPIBZ2"), json!("TS8A81WFXV")],
                vec![json!(3554954842403828u64), json!("09/23"), json!("JCB 16 digit"), json!("December 2021 17")],
                vec![json!(180036921556789u64), json!("04/26"), json!("JCB 15 digit"), json!("garbage")],
            ],
        );

        let cleaned = CardsCleaner::new().clean(raw).unwrap();
        let numbers: Vec<&Value> = cleaned.column_values("card_number").unwrap();
        assert_eq!(numbers, vec![&json!("4971858637664481"), &json!("3554954842403828")]);
        assert_eq!(cleaned.get(1, "date_payment_confirmed"), Some(&json!("2021-12-17")));
    }
}
