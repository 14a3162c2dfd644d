use tracing::debug;

use super::null_filter::is_placeholder_row;
use crate::table::Table;

/// Drop every row that sits inside a window of `window` consecutive
/// placeholder rows. Shorter runs of placeholder rows are kept.
///
/// Used for the products export. Unlike
/// [`super::null_filter::drop_placeholder_rows`], a lone placeholder row
/// survives.
pub fn drop_placeholder_blocks(table: Table, window: usize) -> Table {
    let flags: Vec<bool> = table.rows().iter().map(|r| is_placeholder_row(r)).collect();
    let keep = block_mask(&flags, window);
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        debug!("Dropped {} rows in placeholder blocks of {} or more", dropped, window);
    }
    table.retain_rows_by_mask(&keep)
}

/// For each position, false when it belongs to a full window of flagged rows.
fn block_mask(flags: &[bool], window: usize) -> Vec<bool> {
    let mut keep = vec![true; flags.len()];
    if window == 0 || flags.len() < window {
        return keep;
    }
    for start in 0..=flags.len() - window {
        if flags[start..start + window].iter().all(|f| *f) {
            for k in &mut keep[start..start + window] {
                *k = false;
            }
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(pattern: &[bool]) -> Table {
        let rows = pattern
            .iter()
            .enumerate()
            .map(|(i, corrupt)| {
                let name = if *corrupt { json!("K3P9ZQ1X7M") } else { json!(format!("Product {i}")) };
                vec![json!(i), name]
            })
            .collect::<Vec<Vec<Value>>>();
        Table::from_rows(vec!["index".into(), "product_name".into()], rows)
    }

    #[test]
    fn test_three_consecutive_placeholder_rows_dropped_as_block() {
        let table = drop_placeholder_blocks(rows(&[false, true, true, true, false]), 3);
        let kept: Vec<&Value> = table.column_values("index").unwrap();
        assert_eq!(kept, vec![&json!(0), &json!(4)]);
    }

    #[test]
    fn test_two_placeholder_rows_followed_by_normal_row_are_kept() {
        let table = drop_placeholder_blocks(rows(&[true, true, false]), 3);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_longer_runs_dropped_entirely() {
        let table = drop_placeholder_blocks(rows(&[true, true, true, true, false, true]), 3);
        let kept: Vec<&Value> = table.column_values("index").unwrap();
        assert_eq!(kept, vec![&json!(4), &json!(5)]);
    }

    #[test]
    fn test_table_shorter_than_window() {
        assert_eq!(drop_placeholder_blocks(rows(&[true, true]), 3).row_count(), 2);
        assert!(drop_placeholder_blocks(rows(&[]), 3).is_empty());
    }
}
