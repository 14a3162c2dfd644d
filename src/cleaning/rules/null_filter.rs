use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::constants::{NULL_SENTINEL, PLACEHOLDER_PATTERN};
use crate::table::{Cell, Table};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"));

/// True when a text cell looks like a generated placeholder token.
pub fn is_placeholder(cell: &Cell) -> bool {
    cell.as_str().is_some_and(|s| PLACEHOLDER.is_match(s))
}

/// A row is placeholder-like when it has text cells and every one of them
/// matches the placeholder pattern. Non-text cells (numeric indices and the
/// like) are not considered.
pub fn is_placeholder_row(row: &[Cell]) -> bool {
    let mut text_cells = row.iter().filter(|c| c.is_string()).peekable();
    text_cells.peek().is_some() && text_cells.all(is_placeholder)
}

/// Turn every sentinel "NULL" string into a real null.
pub fn replace_sentinel_nulls(table: Table) -> Table {
    table.map_cells(|cell| match cell {
        Value::String(ref s) if s == NULL_SENTINEL => Value::Null,
        other => other,
    })
}

pub fn drop_rows_with_nulls(table: Table) -> Table {
    table.retain_rows(|row| !row.iter().any(Value::is_null))
}

pub fn drop_columns_with_nulls(table: Table) -> Table {
    table.retain_columns(|_, cells| !cells.iter().any(|c| c.is_null()))
}

pub fn drop_placeholder_rows(table: Table) -> Table {
    table.retain_rows(|row| !is_placeholder_row(row))
}

/// Sentinel replacement followed by row-wise then column-wise null removal.
pub fn strip_nulls(table: Table) -> Table {
    let table = replace_sentinel_nulls(table);
    let table = drop_rows_with_nulls(table);
    drop_columns_with_nulls(table)
}

/// The standard opening step of a cleaning routine: strip nulls, then drop
/// every placeholder row.
pub fn filter_nulls_and_placeholders(table: Table) -> Table {
    let before = table.row_count();
    let table = drop_placeholder_rows(strip_nulls(table));
    debug!(
        "Null/placeholder filter kept {} of {} rows",
        table.row_count(),
        before
    );
    table
}
