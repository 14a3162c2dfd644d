use crate::config::DatabaseConfig;
use crate::db::DatabaseConnector;
use crate::error::Result;
use crate::table::Table;
use crate::types::TableSink;
use tracing::instrument;

/// Replaces one table of the target PostgreSQL database
pub struct DatabaseTableSink {
    config: DatabaseConfig,
    table_name: String,
}

impl DatabaseTableSink {
    pub fn new(config: DatabaseConfig, table_name: impl Into<String>) -> Self {
        Self {
            config,
            table_name: table_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl TableSink for DatabaseTableSink {
    fn describe(&self) -> String {
        format!("table {} on {}", self.table_name, self.config.host)
    }

    #[instrument(skip(self, table), fields(table_name = %self.table_name))]
    async fn write(&self, table: &Table) -> Result<String> {
        let connector = DatabaseConnector::connect(&self.config).await?;
        let result = connector.replace_table(&self.table_name, table).await;
        connector.close().await;
        result?;
        Ok(format!("{}.{}", self.config.database, self.table_name))
    }
}
