//! Objects in S3-compatible storage, addressed as `s3://bucket/key` or by
//! their virtual-hosted `https://bucket.s3.<region>.amazonaws.com/key` URL.

use crate::config::ObjectStorageConfig;
use crate::error::{EtlError, Result};
use crate::sources::formats::{parse_csv, parse_json_table};
use crate::table::Table;
use crate::types::TableSource;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || EtlError::Config(format!("not an object storage reference: {reference}"));

        let (bucket, key) = if let Some(rest) = reference.strip_prefix("s3://") {
            rest.split_once('/').ok_or_else(invalid)?
        } else if let Some(rest) = reference.strip_prefix("https://") {
            let (host, key) = rest.split_once('/').ok_or_else(invalid)?;
            let bucket = host
                .find(".s3.")
                .or_else(|| host.find(".s3-"))
                .map(|end| &host[..end])
                .ok_or_else(invalid)?;
            (bucket, key)
        } else {
            return Err(invalid());
        };

        if bucket.is_empty() || key.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    fn is_csv(&self) -> bool {
        self.key.to_lowercase().ends_with(".csv")
    }
}

/// Access key pair for object storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeys {
    pub key_id: String,
    pub secret: String,
}

/// Read an `access_keys.csv` export: a header row, then `key_id,secret`
pub fn read_access_keys(path: &Path) -> Result<AccessKeys> {
    let mut reader = csv::Reader::from_path(path)?;
    let record = reader
        .records()
        .next()
        .transpose()?
        .ok_or_else(|| EtlError::Config(format!("{} holds no access keys", path.display())))?;

    match (record.get(0), record.get(1)) {
        (Some(key_id), Some(secret)) if !key_id.trim().is_empty() => Ok(AccessKeys {
            key_id: key_id.trim().to_string(),
            secret: secret.trim().to_string(),
        }),
        _ => Err(EtlError::Config(format!(
            "{} does not have a key id and secret on its second row",
            path.display()
        ))),
    }
}

/// Keys from the configuration when present, otherwise from the credentials file
pub fn resolve_access_keys(config: &ObjectStorageConfig) -> Result<AccessKeys> {
    if !config.access_key_id.is_empty() {
        return Ok(AccessKeys {
            key_id: config.access_key_id.clone(),
            secret: config.secret_access_key.clone(),
        });
    }
    match &config.credentials_file {
        Some(path) => read_access_keys(path),
        None => Err(EtlError::Config(
            "object storage needs access_key_id or credentials_file".to_string(),
        )),
    }
}

pub struct ObjectStorageSource {
    client: aws_sdk_s3::Client,
    location: S3Location,
}

impl ObjectStorageSource {
    pub fn new(config: &ObjectStorageConfig, reference: &str) -> Result<Self> {
        let location = S3Location::parse(reference)?;
        let keys = resolve_access_keys(config)?;

        let credentials = Credentials::new(keys.key_id, keys.secret, None, None, "sales_etl");
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            location,
        })
    }

    async fn download(&self) -> Result<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(&self.location.bucket)
            .key(&self.location.key)
            .send()
            .await
            .map_err(|e| EtlError::ObjectStorage {
                message: format!(
                    "GET s3://{}/{}: {}",
                    self.location.bucket,
                    self.location.key,
                    DisplayErrorContext(&e)
                ),
            })?;

        let body = object.body.collect().await.map_err(|e| EtlError::ObjectStorage {
            message: format!("reading s3://{}/{}: {}", self.location.bucket, self.location.key, e),
        })?;
        Ok(body.into_bytes().to_vec())
    }
}

#[async_trait::async_trait]
impl TableSource for ObjectStorageSource {
    fn describe(&self) -> String {
        format!("s3://{}/{}", self.location.bucket, self.location.key)
    }

    #[instrument(skip(self), fields(bucket = %self.location.bucket, key = %self.location.key))]
    async fn fetch(&self) -> Result<Table> {
        let bytes = self.download().await?;
        debug!("Downloaded {} bytes", bytes.len());

        let table = if self.location.is_csv() {
            parse_csv(&bytes)?
        } else {
            parse_json_table(&bytes)?
        };
        info!("Loaded {} rows from {}", table.row_count(), self.describe());
        Ok(table)
    }
}
