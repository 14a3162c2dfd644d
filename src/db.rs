use crate::config::DatabaseConfig;
use crate::error::{EtlError, Result};
use crate::table::{cell_to_string, Cell, Table};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Column, Row, TypeInfo};
use tracing::{debug, info};

/// Postgres caps a statement at 65535 bind parameters
const MAX_BIND_PARAMETERS: usize = 65_535;
const MAX_ROWS_PER_INSERT: usize = 1_000;

/// SQL type chosen for a column when a table is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "TEXT",
        }
    }
}

/// A connection to one PostgreSQL database. Acquire with [`DatabaseConnector::connect`]
/// and release with [`DatabaseConnector::close`].
pub struct DatabaseConnector {
    pool: PgPool,
    database: String,
}

impl DatabaseConnector {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to PostgreSQL at {}:{}/{}",
            config.host, config.port, config.database
        );

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            database: config.database.clone(),
        })
    }

    pub async fn close(self) {
        debug!("Closing connection to {}", self.database);
        self.pool.close().await;
    }

    /// Names of the tables in the public schema
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT table_name::text AS table_name FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            names.push(row.try_get::<String, _>("table_name")?);
        }
        Ok(names)
    }

    /// Read a whole table into memory
    pub async fn read_table(&self, table_name: &str) -> Result<Table> {
        let sql = format!("SELECT * FROM {}", quote_identifier(table_name));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let columns = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => self.column_names(table_name).await?,
        };

        let mut table = Table::new(columns);
        for row in &rows {
            let cells = (0..row.columns().len())
                .map(|i| extract_column_value(row, i))
                .collect::<Result<Vec<_>>>()?;
            table.push_row(cells);
        }

        info!("Read {} rows from {}.{}", table.row_count(), self.database, table_name);
        Ok(table)
    }

    async fn column_names(&self, table_name: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT column_name::text AS column_name FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 ORDER BY ordinal_position",
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            names.push(row.try_get::<String, _>("column_name")?);
        }
        Ok(names)
    }

    /// Drop and recreate `table_name`, then load every row of `table` into it
    /// inside one transaction.
    pub async fn replace_table(&self, table_name: &str, table: &Table) -> Result<u64> {
        let column_types = infer_column_types(table);
        let quoted_table = quote_identifier(table_name);

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {quoted_table}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&create_table_sql(&quoted_table, table.columns(), &column_types))
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0u64;
        if table.column_count() > 0 {
            let batch_size = (MAX_BIND_PARAMETERS / table.column_count()).clamp(1, MAX_ROWS_PER_INSERT);
            for batch in table.rows().chunks(batch_size) {
                let sql = insert_sql(&quoted_table, table.columns(), batch.len());
                let mut query = sqlx::query(&sql);
                for row in batch {
                    for (cell, column_type) in row.iter().zip(&column_types) {
                        query = bind_cell(query, cell, *column_type);
                    }
                }
                inserted += query.execute(&mut *tx).await?.rows_affected();
            }
        }

        tx.commit().await?;
        info!("Wrote {} rows to {}.{}", inserted, self.database, table_name);
        Ok(inserted)
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Pick the narrowest SQL type that holds every non-null cell of each column
pub fn infer_column_types(table: &Table) -> Vec<ColumnType> {
    (0..table.column_count())
        .map(|i| {
            let mut cells = table.rows().iter().map(|row| &row[i]).filter(|c| !c.is_null()).peekable();
            if cells.peek().is_none() {
                return ColumnType::Text;
            }
            let cells: Vec<&Cell> = cells.collect();
            if cells.iter().all(|c| c.as_i64().is_some()) {
                ColumnType::BigInt
            } else if cells.iter().all(|c| c.is_number()) {
                ColumnType::Double
            } else if cells.iter().all(|c| c.is_boolean()) {
                ColumnType::Boolean
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

fn create_table_sql(quoted_table: &str, columns: &[String], column_types: &[ColumnType]) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .zip(column_types)
        .map(|(name, ty)| format!("{} {}", quote_identifier(name), ty.sql_name()))
        .collect();
    format!("CREATE TABLE {} ({})", quoted_table, definitions.join(", "))
}

fn insert_sql(quoted_table: &str, columns: &[String], row_count: usize) -> String {
    let column_list: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    let width = columns.len();
    let tuples: Vec<String> = (0..row_count)
        .map(|r| {
            let placeholders: Vec<String> = (1..=width).map(|c| format!("${}", r * width + c)).collect();
            format!("({})", placeholders.join(", "))
        })
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        quoted_table,
        column_list.join(", "),
        tuples.join(", ")
    )
}

fn bind_cell<'q>(
    query: Query<'q, Postgres, PgArguments>,
    cell: &Cell,
    column_type: ColumnType,
) -> Query<'q, Postgres, PgArguments> {
    match column_type {
        ColumnType::BigInt => query.bind(cell.as_i64()),
        ColumnType::Double => query.bind(cell.as_f64()),
        ColumnType::Boolean => query.bind(cell.as_bool()),
        ColumnType::Text => query.bind(match cell {
            Value::Null => None,
            other => Some(cell_to_string(other)),
        }),
    }
}

/// Extract a column value from a row as a table cell. Types without a
/// mapping are an error rather than a null.
fn extract_column_value(row: &PgRow, index: usize) -> Result<Cell> {
    // Try different types in order of likelihood
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map(Value::String).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Ok(v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
        return Ok(v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return Ok(v
            .and_then(|n| serde_json::Number::from_f64(n as f64))
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map(Value::Bool).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<uuid::Uuid>, _>(index) {
        return Ok(v.map(|u| Value::String(u.to_string())).unwrap_or(Value::Null));
    }
    // NUMERIC keeps its exact digits as text
    if let Ok(v) = row.try_get::<Option<bigdecimal::BigDecimal>, _>(index) {
        return Ok(v.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return Ok(v
            .map(|dt| Value::String(dt.to_rfc3339()))
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return Ok(v
            .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return Ok(v
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null));
    }

    let column = &row.columns()[index];
    Err(unsupported_column_type(column.name(), column.type_info().name()))
}

fn unsupported_column_type(column: &str, type_name: &str) -> EtlError {
    EtlError::UnsupportedColumnType {
        column: column.to_string(),
        type_name: type_name.to_string(),
    }
}
