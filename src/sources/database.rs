use crate::config::DatabaseConfig;
use crate::db::DatabaseConnector;
use crate::error::Result;
use crate::table::Table;
use crate::types::TableSource;
use tracing::instrument;

/// One table of the source PostgreSQL database
pub struct DatabaseTableSource {
    config: DatabaseConfig,
    table_name: String,
}

impl DatabaseTableSource {
    pub fn new(config: DatabaseConfig, table_name: impl Into<String>) -> Self {
        Self {
            config,
            table_name: table_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl TableSource for DatabaseTableSource {
    fn describe(&self) -> String {
        format!("table {} on {}", self.table_name, self.config.host)
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn fetch(&self) -> Result<Table> {
        let connector = DatabaseConnector::connect(&self.config).await?;
        let result = connector.read_table(&self.table_name).await;
        connector.close().await;
        result
    }
}
