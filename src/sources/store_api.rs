use crate::config::StoreApiConfig;
use crate::constants::{API_KEY_HEADER, NUMBER_OF_STORES_FIELD};
use crate::error::{EtlError, Result};
use crate::table::Table;
use crate::types::TableSource;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Store listings served one record per ID by an authenticated HTTP API
pub struct StoreApiSource {
    client: reqwest::Client,
    number_of_stores_endpoint: String,
    store_endpoint: String,
}

impl StoreApiSource {
    pub fn new(config: &StoreApiConfig) -> Result<Self> {
        let client = client_builder(config)?.build()?;
        Ok(Self::with_client(client, config))
    }

    fn with_client(client: reqwest::Client, config: &StoreApiConfig) -> Self {
        Self {
            client,
            number_of_stores_endpoint: config.number_of_stores_endpoint.clone(),
            store_endpoint: config.store_endpoint.clone(),
        }
    }

    /// Ask the API how many stores there are
    #[instrument(skip(self))]
    pub async fn number_of_stores(&self) -> Result<u64> {
        let response = self.client.get(&self.number_of_stores_endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::Api {
                message: format!("store count endpoint returned {status}"),
            });
        }

        let body: Value = response.json().await?;
        parse_store_count(&body)
    }

    /// Fetch a single store. `None` when the API refuses or the request fails.
    async fn retrieve_store(&self, store_number: u64) -> Option<Value> {
        let url = store_url(&self.store_endpoint, store_number);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Request for store {} failed: {}", store_number, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Store {} returned {}, skipping", store_number, status);
            return None;
        }

        match response.json::<Value>().await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Store {} returned an unreadable body: {}", store_number, e);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl TableSource for StoreApiSource {
    fn describe(&self) -> String {
        format!("store api {}", self.store_endpoint)
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Table> {
        let count = self.number_of_stores().await?;
        info!("API reports {} stores", count);

        let mut records = Vec::new();
        for store_number in 1..=count {
            if let Some(record) = self.retrieve_store(store_number).await {
                debug!("Retrieved store {}", store_number);
                records.push(record);
            }
        }

        if (records.len() as u64) < count {
            warn!("Retrieved {} of {} stores", records.len(), count);
        }
        Ok(Table::from_records(&records))
    }
}

/// Client settings shared by every request: the API key header and timeout
fn client_builder(config: &StoreApiConfig) -> Result<reqwest::ClientBuilder> {
    let mut headers = HeaderMap::new();
    let api_key = HeaderValue::from_str(&config.api_key).map_err(|e| {
        EtlError::Config(format!("API key is not a valid header value: {e}"))
    })?;
    headers.insert(API_KEY_HEADER, api_key);

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_seconds)))
}

pub fn store_url(store_endpoint: &str, store_number: u64) -> String {
    format!("{}/{}", store_endpoint.trim_end_matches('/'), store_number)
}

fn parse_store_count(body: &Value) -> Result<u64> {
    body[NUMBER_OF_STORES_FIELD]
        .as_u64()
        .ok_or_else(|| EtlError::MissingField(NUMBER_OF_STORES_FIELD.to_string()))
}
