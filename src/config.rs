use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source_db: DatabaseConfig,
    pub target_db: DatabaseConfig,
    pub store_api: StoreApiConfig,
    pub object_storage: ObjectStorageConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Connection parameters for a PostgreSQL database
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreApiConfig {
    #[serde(default)]
    pub api_key: String,
    pub number_of_stores_endpoint: String,
    pub store_endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStorageConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    /// CSV with a header row and `key_id,secret` on the second row; used
    /// when the keys are not given directly
    pub credentials_file: Option<PathBuf>,
}

/// Where each raw dataset lives
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_users_table")]
    pub users_table: String,
    #[serde(default = "default_orders_table")]
    pub orders_table: String,
    pub card_details_pdf: String,
    pub products_object: String,
    pub date_events_object: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_db_port() -> u16 {
    5432
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

fn default_users_table() -> String {
    "legacy_users".to_string()
}

fn default_orders_table() -> String {
    "orders_table".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Config {
    /// Load the TOML file at `path`, then apply secrets from the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let mut config = Self::from_toml_str(&config_content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Replace secrets with values from `lookup` (the environment in
    /// practice). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ETL_SOURCE_DB_PASSWORD") {
            self.source_db.password = v;
        }
        if let Some(v) = get("ETL_TARGET_DB_PASSWORD") {
            self.target_db.password = v;
        }
        if let Some(v) = get("ETL_API_KEY") {
            self.store_api.api_key = v;
        }
        if let Some(v) = get("ETL_AWS_ACCESS_KEY_ID") {
            self.object_storage.access_key_id = v;
        }
        if let Some(v) = get("ETL_AWS_SECRET_ACCESS_KEY") {
            self.object_storage.secret_access_key = v;
        }
    }
}
