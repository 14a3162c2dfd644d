//! Parsers that turn downloaded bytes into tables.

use serde_json::Value;

use crate::error::{EtlError, Result};
use crate::table::{Cell, Table};

/// Parse CSV with a header row. Cells stay text exactly as written so codes
/// and long card numbers survive untouched; empty cells become nulls. Short
/// records are padded with nulls, a record longer than the header is an error.
pub fn parse_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(EtlError::RaggedRow {
                row: i + 1,
                fields: record.len(),
                columns: columns.len(),
            });
        }
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok(Table::from_rows(columns, rows))
}

fn text_cell(field: &str) -> Cell {
    if field.is_empty() {
        Value::Null
    } else {
        Value::String(field.to_string())
    }
}

/// Parse a JSON document into a table. Accepts an array of records, or the
/// column-oriented layout `{"column": {"row": value, ...}, ...}`.
pub fn parse_json_table(bytes: &[u8]) -> Result<Table> {
    let document: Value = serde_json::from_slice(bytes)?;
    match document {
        Value::Array(records) => Ok(Table::from_records(&records)),
        Value::Object(columns) if columns.values().all(Value::is_object) => {
            let mut row_keys: Vec<String> = Vec::new();
            for column in columns.values() {
                if let Some(cells) = column.as_object() {
                    for key in cells.keys() {
                        if !row_keys.contains(key) {
                            row_keys.push(key.clone());
                        }
                    }
                }
            }

            let names: Vec<String> = columns.keys().cloned().collect();
            let rows = row_keys
                .iter()
                .map(|key| {
                    columns
                        .values()
                        .map(|column| column.get(key).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            Ok(Table::from_rows(names, rows))
        }
        _ => Err(EtlError::Api {
            message: "JSON document is neither a list of records nor column-oriented".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_cells_keep_their_text() {
        let csv = b"index,card_number,product_code,weight\n0,0004971858637664,0123,1.6kg\n1,9876543210987654321,,NULL\n";
        let table = parse_csv(csv).unwrap();

        assert_eq!(table.columns(), &["index", "card_number", "product_code", "weight"]);
        assert_eq!(table.get(0, "index"), Some(&json!("0")));
        assert_eq!(table.get(0, "card_number"), Some(&json!("0004971858637664")));
        assert_eq!(table.get(1, "card_number"), Some(&json!("9876543210987654321")));
        assert_eq!(table.get(0, "product_code"), Some(&json!("0123")));
        assert_eq!(table.get(1, "product_code"), Some(&Value::Null));
        assert_eq!(table.get(1, "weight"), Some(&json!("NULL")));
    }

    #[test]
    fn test_csv_short_records_are_padded() {
        let table = parse_csv(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.get(0, "c"), Some(&Value::Null));
    }

    #[test]
    fn test_csv_long_records_are_rejected() {
        let result = parse_csv(b"a,b\n1,2\n1,2,3\n");
        assert!(matches!(
            result,
            Err(EtlError::RaggedRow { row: 2, fields: 3, columns: 2 })
        ));
    }

    #[test]
    fn test_csv_quoted_multiline_fields() {
        let csv = b"address,n\n\"Flat 1\nSome Town\",3\n";
        let table = parse_csv(csv).unwrap();
        assert_eq!(table.get(0, "address"), Some(&json!("Flat 1\nSome Town")));
    }

    #[test]
    fn test_json_records() {
        let table = parse_json_table(br#"[{"a": 1, "b": "x"}, {"a": 2}]"#).unwrap();
        assert_eq!(table.columns(), &["a", "b"]);
        assert_eq!(table.get(1, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_json_column_oriented() {
        let doc = br#"{
            "timestamp": {"0": "22:00:06", "1": "22:44:06"},
            "month": {"0": "9", "1": "2"},
            "year": {"0": "2012", "1": "1997"}
        }"#;
        let table = parse_json_table(doc).unwrap();

        assert_eq!(table.columns(), &["timestamp", "month", "year"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, "year"), Some(&json!("1997")));
    }

    #[test]
    fn test_json_scalar_rejected() {
        assert!(parse_json_table(b"42").is_err());
    }
}
