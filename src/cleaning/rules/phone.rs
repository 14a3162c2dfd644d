use phonenumber::country;
use phonenumber::Mode;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::table::{cell_to_string, Table};

/// E.164 form of `phone_number` when it is a valid number for `country_code`
/// (ISO 3166 alpha-2). Unknown countries, unparseable input and numbers that
/// are invalid for the country all yield `None`.
pub fn normalize_phone_number(phone_number: &str, country_code: &str) -> Option<String> {
    let country: country::Id = country_code.trim().parse().ok()?;
    let number = phonenumber::parse(Some(country), phone_number).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }
    Some(number.format().mode(Mode::E164).to_string())
}

/// Rewrite `phone_column` to E.164 using the country in `country_column`,
/// dropping rows whose number cannot be normalized.
pub fn normalize_phone_column(table: Table, phone_column: &str, country_column: &str) -> Result<Table> {
    let phone_index = table.column_index(phone_column)?;
    let country_index = table.column_index(country_column)?;
    let before = table.row_count();

    let (columns, rows) = table.into_parts();
    let rows = rows
        .into_iter()
        .filter_map(|mut row| {
            let country = row[country_index].as_str()?.to_string();
            let phone = match &row[phone_index] {
                Value::Null => return None,
                cell => cell_to_string(cell),
            };
            let normalized = normalize_phone_number(&phone, &country)?;
            row[phone_index] = Value::String(normalized);
            Some(row)
        })
        .collect();
    let table = Table::from_rows(columns, rows);

    debug!(
        "Phone column '{}': dropped {} invalid numbers",
        phone_column,
        before - table.row_count()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_us_number_formats_to_e164() {
        let normalized = normalize_phone_number("(650) 253-0000", "US").unwrap();
        assert!(normalized.starts_with("+1"));
        assert_eq!(normalized, "+16502530000");
    }

    #[test]
    fn test_gb_number_with_national_prefix() {
        assert_eq!(
            normalize_phone_number("020 7031 3000", "GB").as_deref(),
            Some("+442070313000")
        );
        assert_eq!(
            normalize_phone_number("+44 20 7031 3000", "GB").as_deref(),
            Some("+442070313000")
        );
    }

    #[test]
    fn test_invalid_numbers_yield_none() {
        assert_eq!(normalize_phone_number("12", "US"), None);
        assert_eq!(normalize_phone_number("not a phone", "GB"), None);
        assert_eq!(normalize_phone_number("(650) 253-0000", "ZZZ"), None);
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let table = Table::from_rows(
            vec!["phone_number".into(), "country_code".into()],
            vec![
                vec![json!("(650) 253-0000"), json!("US")],
                vec![json!("12"), json!("US")],
            ],
        );
        let table = normalize_phone_column(table, "phone_number", "country_code").unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get(0, "phone_number"), Some(&json!("+16502530000")));
    }
}
