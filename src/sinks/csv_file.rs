use crate::error::Result;
use crate::table::{cell_to_string, Table};
use crate::types::TableSink;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Writes a table as CSV with a header row and no index column
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(cell_to_string))?;
        }
        writer.into_inner().map_err(|e| e.into_error().into())
    }
}

#[async_trait::async_trait]
impl TableSink for CsvFileSink {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    #[instrument(skip(self, table), fields(path = %self.path.display()))]
    async fn write(&self, table: &Table) -> Result<String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = Self::to_csv_bytes(table)?;
        tokio::fs::write(&self.path, bytes).await?;

        info!("Wrote {} rows to {}", table.row_count(), self.path.display());
        Ok(self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample() -> Table {
        Table::from_rows(
            vec!["index".into(), "address".into(), "weight".into()],
            vec![
                vec![json!(0), json!("1 High St, Leeds"), json!("0.1kg")],
                vec![json!(1), Value::Null, json!(1.5)],
            ],
        )
    }

    #[test]
    fn test_csv_layout() {
        let bytes = CsvFileSink::to_csv_bytes(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "index,address,weight\n0,\"1 High St, Leeds\",0.1kg\n1,,1.5\n"
        );
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dim_products.csv");

        let written = CsvFileSink::new(&path).write(&sample()).await.unwrap();

        assert_eq!(written, path.display().to_string());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("index,address,weight\n"));
        assert_eq!(contents.lines().count(), 3);
    }
}
