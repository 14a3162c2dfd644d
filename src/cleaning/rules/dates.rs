use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::table::Table;

/// Output format for every normalized date cell
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?").expect("clock time pattern is valid")
});
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+|[A-Za-z]+").expect("date token pattern is valid"));

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

fn month_number(word: &str) -> Option<u32> {
    let word = word.to_ascii_lowercase();
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| *m == word || (word.len() == 3 && m.starts_with(&word)) || (word == "sept" && *m == "september"))
        .map(|i| i as u32 + 1)
}

/// Parse a date out of free text, ignoring words and punctuation that are not
/// part of the date.
///
/// Accepted shapes: `YYYY-MM-DD` (any separator), `YYYYMMDD`, month names in
/// any position with a day and a four-digit year, and `MM/DD/YYYY` (read as
/// `DD/MM/YYYY` when the first field cannot be a month). A clock time is
/// ignored.
pub fn parse_fuzzy_date(text: &str) -> Option<NaiveDate> {
    let without_time = CLOCK_TIME.replace_all(text, " ");

    let mut numbers: Vec<&str> = Vec::new();
    let mut month: Option<u32> = None;
    for token in TOKEN.find_iter(&without_time) {
        let token = token.as_str();
        if token.as_bytes()[0].is_ascii_digit() {
            numbers.push(token);
        } else if let Some(m) = month_number(token) {
            if month.replace(m).is_some() {
                return None;
            }
        }
    }

    match (month, numbers.as_slice()) {
        (Some(month), [a, b]) => {
            let (year, day) = match (a.len(), b.len()) {
                (4, l) if l <= 2 => (a, b),
                (l, 4) if l <= 2 => (b, a),
                _ => return None,
            };
            NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
        }
        (None, [compact]) if compact.len() == 8 => NaiveDate::parse_from_str(compact, "%Y%m%d").ok(),
        (None, [a, b, c]) => {
            if a.len() == 4 && b.len() <= 2 && c.len() <= 2 {
                NaiveDate::from_ymd_opt(a.parse().ok()?, b.parse().ok()?, c.parse().ok()?)
            } else if c.len() == 4 && a.len() <= 2 && b.len() <= 2 {
                let (first, second): (u32, u32) = (a.parse().ok()?, b.parse().ok()?);
                let (month, day) = if first > 12 { (second, first) } else { (first, second) };
                NaiveDate::from_ymd_opt(c.parse().ok()?, month, day)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Rewrite a date column to `YYYY-MM-DD` and drop rows whose date cannot be
/// read. Numeric cells are left untouched; null cells count as unreadable.
pub fn normalize_date_column(table: Table, column: &str) -> Result<Table> {
    let before = table.row_count();
    let table = table.map_column(column, |cell| match cell {
        Value::String(s) => parse_fuzzy_date(s)
            .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
            .unwrap_or(Value::Null),
        other => other.clone(),
    })?;
    let index = table.column_index(column)?;
    let table = table.retain_rows(|row| !row[index].is_null());

    debug!(
        "Date column '{}': dropped {} unreadable rows",
        column,
        before - table.row_count()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_and_slashed_dates() {
        assert_eq!(parse_fuzzy_date("1968-10-16"), ymd(1968, 10, 16));
        assert_eq!(parse_fuzzy_date("2005/01/27"), ymd(2005, 1, 27));
        assert_eq!(parse_fuzzy_date("19681016"), ymd(1968, 10, 16));
    }

    #[test]
    fn test_month_name_orders() {
        assert_eq!(parse_fuzzy_date("1968 October 16"), ymd(1968, 10, 16));
        assert_eq!(parse_fuzzy_date("January 1951 27"), ymd(1951, 1, 27));
        assert_eq!(parse_fuzzy_date("March 5, 2001"), ymd(2001, 3, 5));
        assert_eq!(parse_fuzzy_date("16 Oct 1968"), ymd(1968, 10, 16));
    }

    #[test]
    fn test_surrounding_text_and_time_ignored() {
        assert_eq!(parse_fuzzy_date("joined on 2019-05-03 at 10:15:00"), ymd(2019, 5, 3));
        assert_eq!(parse_fuzzy_date("Tuesday, 4th of July 1995"), ymd(1995, 7, 4));
    }

    #[test]
    fn test_month_first_unless_impossible() {
        assert_eq!(parse_fuzzy_date("04/07/1995"), ymd(1995, 4, 7));
        assert_eq!(parse_fuzzy_date("25/12/1995"), ymd(1995, 12, 25));
    }

    #[test]
    fn test_unreadable_dates() {
        assert_eq!(parse_fuzzy_date("GB"), None);
        assert_eq!(parse_fuzzy_date("7ZRSZMFFFR"), None);
        assert_eq!(parse_fuzzy_date("2019-13-40"), None);
        assert_eq!(parse_fuzzy_date(""), None);
    }

    #[test]
    fn test_normalize_date_column_drops_bad_rows() {
        let table = Table::from_rows(
            vec!["id".into(), "join_date".into()],
            vec![
                vec![json!(1), json!("2009 May 21")],
                vec![json!(2), json!("not a date")],
                vec![json!(3), json!(20090521)],
            ],
        );
        let table = normalize_date_column(table, "join_date").unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "join_date"), Some(&json!("2009-05-21")));
        assert_eq!(table.get(1, "join_date"), Some(&json!(20090521)));
    }

    #[test]
    fn test_missing_date_column_is_fatal() {
        let table = Table::new(vec!["id".into()]);
        assert!(normalize_date_column(table, "date_added").is_err());
    }
}
