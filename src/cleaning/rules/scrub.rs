use serde_json::Value;

use crate::error::Result;
use crate::table::{cell_to_string, Table};

/// Remove every occurrence of `contaminant` from a text column. Numeric
/// cells are stringified first when `stringify` is set, otherwise left alone.
pub fn remove_substring(table: Table, column: &str, contaminant: &str, stringify: bool) -> Result<Table> {
    table.map_column(column, |cell| match cell {
        Value::String(s) => Value::String(s.replace(contaminant, "")),
        Value::Null => Value::Null,
        other if stringify => Value::String(cell_to_string(other).replace(contaminant, "")),
        other => other.clone(),
    })
}

/// Card numbers from the PDF carry stray question marks.
pub fn scrub_card_numbers(table: Table, column: &str) -> Result<Table> {
    remove_substring(table, column, "?", true)
}

/// Continent names arrive as "eeEurope" / "eeAmerica".
pub fn scrub_continents(table: Table, column: &str) -> Result<Table> {
    remove_substring(table, column, "ee", false)
}

/// Keep only the digits of a text column.
pub fn strip_non_digits(table: Table, column: &str) -> Result<Table> {
    table.map_column(column, |cell| match cell {
        Value::String(s) => Value::String(s.chars().filter(char::is_ascii_digit).collect()),
        other => other.clone(),
    })
}

/// Keep the first line of a multi-line text column.
pub fn first_line(table: Table, column: &str) -> Result<Table> {
    table.map_column(column, |cell| match cell {
        Value::String(s) => Value::String(s.split('\n').next().unwrap_or_default().to_string()),
        other => other.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn single(column: &str, values: Vec<Value>) -> Table {
        Table::from_rows(vec![column.into()], values.into_iter().map(|v| vec![v]).collect())
    }

    #[test]
    fn test_card_numbers_lose_question_marks() {
        let table = scrub_card_numbers(
            single("card_number", vec![json!("??4971858637664481"), json!(4971858637664481u64)]),
            "card_number",
        )
        .unwrap();
        assert_eq!(table.get(0, "card_number"), Some(&json!("4971858637664481")));
        assert_eq!(table.get(1, "card_number"), Some(&json!("4971858637664481")));
    }

    #[test]
    fn test_continent_prefix_removed() {
        let table = scrub_continents(
            single("continent", vec![json!("eeEurope"), json!("America")]),
            "continent",
        )
        .unwrap();
        assert_eq!(table.get(0, "continent"), Some(&json!("Europe")));
        assert_eq!(table.get(1, "continent"), Some(&json!("America")));
    }

    #[test]
    fn test_staff_numbers_keep_digits_only() {
        let table = strip_non_digits(
            single("staff_numbers", vec![json!("J78"), json!("3n9"), json!(12)]),
            "staff_numbers",
        )
        .unwrap();
        assert_eq!(table.get(0, "staff_numbers"), Some(&json!("78")));
        assert_eq!(table.get(1, "staff_numbers"), Some(&json!("39")));
        assert_eq!(table.get(2, "staff_numbers"), Some(&json!(12)));
    }

    #[test]
    fn test_first_line_of_address() {
        let table = first_line(
            single("address", vec![json!("Flat 72W\nSally isle\nEast Deantown")]),
            "address",
        )
        .unwrap();
        assert_eq!(table.get(0, "address"), Some(&json!("Flat 72W")));
    }
}
