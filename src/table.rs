use crate::error::{EtlError, Result};
use serde_json::Value;
use tracing::warn;

/// A single table cell. Sources hand over text, numbers, booleans or null.
pub type Cell = Value;

/// An in-memory table: ordered column names and ordered rows of cells.
///
/// Every row has exactly one cell per column. Cleaning rules take a table by
/// value and hand back a new one, so a caller never observes a half-cleaned
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from column names and rows. See [`Table::push_row`] for
    /// rows of the wrong length.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Build a table from JSON objects. The column set is the union of the
    /// records' keys in first-seen order; absent keys become nulls.
    pub fn from_records(records: &[Value]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            if let Some(object) = record.as_object() {
                for key in object.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        let rows = records
            .iter()
            .filter_map(|record| record.as_object())
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Append a row, padding a short one with nulls. Extra cells on a long
    /// row are discarded with a warning.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() > self.columns.len() {
            warn!(
                "Discarding {} cells beyond the {} columns of row {}",
                row.len() - self.columns.len(),
                self.columns.len(),
                self.rows.len()
            );
        }
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column, or a schema mismatch error.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| EtlError::SchemaMismatch {
                column: name.to_string(),
            })
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All cells of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }

    /// Keep exactly the named columns, in the given order.
    pub fn select_columns(self, names: &[&str]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Self {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        })
    }

    /// Remove the named columns. Every name must exist.
    pub fn drop_columns(self, names: &[&str]) -> Result<Self> {
        for name in names {
            self.column_index(name)?;
        }
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.contains(&c.as_str()))
            .collect();
        Ok(self.retain_columns_by_mask(&keep))
    }

    /// Remove every column for which `predicate` on its cells returns false.
    pub fn retain_columns<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&str, &[&Cell]) -> bool,
    {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|i| {
                let cells: Vec<&Cell> = self.rows.iter().map(|row| &row[i]).collect();
                predicate(&self.columns[i], &cells)
            })
            .collect();
        self.retain_columns_by_mask(&keep)
    }

    fn retain_columns_by_mask(self, keep: &[bool]) -> Self {
        let columns = self
            .columns
            .into_iter()
            .zip(keep)
            .filter_map(|(c, &k)| k.then_some(c))
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(keep)
                    .filter_map(|(cell, &k)| k.then_some(cell))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn rename_column(&mut self, index: usize, new_name: &str) -> Result<()> {
        let column = self
            .columns
            .get_mut(index)
            .ok_or_else(|| EtlError::SchemaMismatch {
                column: format!("#{index}"),
            })?;
        *column = new_name.to_string();
        Ok(())
    }

    pub fn retain_rows<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| predicate(row));
        self
    }

    /// Keep rows by position; `keep` must be as long as the table.
    pub fn retain_rows_by_mask(mut self, keep: &[bool]) -> Self {
        let mut flags = keep.iter();
        self.rows.retain(|_| *flags.next().unwrap_or(&true));
        self
    }

    /// Rewrite every cell of one column.
    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Result<Self>
    where
        F: FnMut(&Cell) -> Cell,
    {
        let index = self.column_index(name)?;
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
        Ok(self)
    }

    /// Rewrite every cell of the table.
    pub fn map_cells<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(Cell) -> Cell,
    {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(std::mem::take(cell));
            }
        }
        self
    }
}

/// Render a cell the way it is written to flat files: nulls are empty.
pub fn cell_to_string(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
