use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Object storage error: {message}")]
    ObjectStorage { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Expected column '{column}' not found in table")]
    SchemaMismatch { column: String },

    #[error("Row {row} has {fields} fields but the table has {columns} columns")]
    RaggedRow {
        row: usize,
        fields: usize,
        columns: usize,
    },

    #[error("Column '{column}' has unsupported database type {type_name}")]
    UnsupportedColumnType { column: String, type_name: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error(
        "Unknown dataset '{0}', expected one of: {supported}",
        supported = crate::constants::get_supported_datasets().join(", ")
    )]
    UnknownDataset(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
