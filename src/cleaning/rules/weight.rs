use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::table::{cell_to_string, Table};

static QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)(\D+)").expect("quantity pattern is valid"));

/// Reduce a free-text weight to a single `<number><unit>` string.
///
/// `"3 x 132g"` multiplies out to `"396.0g"`; anything else keeps its first
/// number and unit verbatim. Text without a number followed by a unit
/// yields `None`.
pub fn parse_weight_expression(text: &str) -> Option<String> {
    let quantities: Vec<(&str, &str)> = QUANTITY
        .captures_iter(text)
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect();

    match quantities.as_slice() {
        [(count, _), (each, unit), ..] if text.contains('x') => {
            let count: f64 = count.parse().ok()?;
            let each: f64 = each.parse().ok()?;
            Some(format!("{}{}", format_decimal(count * each), unit))
        }
        [(value, unit), ..] => Some(format!("{value}{unit}")),
        [] => None,
    }
}

/// Express a `<number><unit>` weight in kilograms. Grams and millilitres are
/// divided by 1000; kilograms and unknown units are returned unchanged.
pub fn convert_to_kg(weight: &str) -> String {
    let scaled = if weight.ends_with("kg") {
        None
    } else if let Some(grams) = weight.strip_suffix('g') {
        grams.trim().parse::<f64>().ok()
    } else if let Some(millilitres) = weight.strip_suffix("ml") {
        millilitres.trim().parse::<f64>().ok()
    } else {
        None
    };

    match scaled {
        Some(value) => format!("{}kg", format_decimal(value / 1000.0)),
        None => weight.to_string(),
    }
}

/// Parse and convert every cell of a weight column; unreadable weights
/// become null.
pub fn convert_weight_column(table: Table, column: &str) -> Result<Table> {
    table.map_column(column, |cell| {
        if cell.is_null() {
            return Value::Null;
        }
        parse_weight_expression(&cell_to_string(cell))
            .map(|w| Value::String(convert_to_kg(&w)))
            .unwrap_or(Value::Null)
    })
}

/// Render a float as a decimal: always with a fractional part, switching to
/// exponent notation for very large or very small magnitudes.
fn format_decimal(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && (magnitude >= 1e16 || magnitude < 1e-4) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }

    let formatted = value.to_string();
    if formatted.contains('.') || !value.is_finite() {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clean(text: &str) -> Option<String> {
        parse_weight_expression(text).map(|w| convert_to_kg(&w))
    }

    #[test]
    fn test_multipack_weights() {
        assert_eq!(parse_weight_expression("3 x 132g").as_deref(), Some("396.0g"));
        assert_eq!(clean("3 x 132g").as_deref(), Some("0.396kg"));
        assert_eq!(clean("12 x 100g").as_deref(), Some("1.2kg"));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(clean("100g").as_deref(), Some("0.1kg"));
        assert_eq!(clean("250ml").as_deref(), Some("0.25kg"));
        assert_eq!(clean("1.5kg").as_deref(), Some("1.5kg"));
    }

    #[test]
    fn test_kilograms_never_rescaled() {
        assert_eq!(clean("5kg").as_deref(), Some("5kg"));
        assert_eq!(convert_to_kg("5kg"), "5kg");
        assert_eq!(convert_to_kg(&convert_to_kg("100g")), "0.1kg");
    }

    #[test]
    fn test_unknown_units_pass_through() {
        assert_eq!(clean("16oz").as_deref(), Some("16oz"));
        assert_eq!(clean("77g .").as_deref(), Some("77g ."));
    }

    #[test]
    fn test_unparseable_weights() {
        assert_eq!(clean("NULL"), None);
        assert_eq!(clean("heavy"), None);
        assert_eq!(clean("500"), None);
    }

    #[test]
    fn test_tiny_values_use_exponent() {
        assert_eq!(clean("0.01g").as_deref(), Some("1e-05kg"));
    }

    #[test]
    fn test_convert_weight_column() {
        let table = Table::from_rows(
            vec!["weight".into()],
            vec![vec![json!("3 x 132g")], vec![json!("junk")], vec![Value::Null]],
        );
        let table = convert_weight_column(table, "weight").unwrap();
        let values: Vec<&Value> = table.column_values("weight").unwrap();
        assert_eq!(values, vec![&json!("0.396kg"), &Value::Null, &Value::Null]);
    }
}
