//! Card details published as a multi-page PDF table.

use crate::error::{EtlError, Result};
use crate::table::{Cell, Table};
use crate::types::TableSource;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Columns on a text line are separated by a tab or a run of two or more spaces
static COLUMN_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+|\s{2,}").expect("column gap pattern is valid"));

pub struct PdfTableSource {
    client: reqwest::Client,
    url: String,
}

impl PdfTableSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn download(&self) -> Result<Vec<u8>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::Api {
                message: format!("GET {} returned {}", self.url, status),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl TableSource for PdfTableSource {
    fn describe(&self) -> String {
        format!("pdf {}", self.url)
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Table> {
        let bytes = self.download().await?;
        debug!("Downloaded {} bytes", bytes.len());

        let pages = extract_page_text(&bytes)?;
        let table = table_from_pages(&pages);
        info!(
            "Extracted {} rows from {} pages of {}",
            table.row_count(),
            pages.len(),
            self.url
        );
        Ok(table)
    }
}

/// Text of every page, in page order
pub fn extract_page_text(bytes: &[u8]) -> Result<Vec<String>> {
    let document = lopdf::Document::load_mem(bytes)?;
    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        pages.push(document.extract_text(&[*page_number])?);
    }
    Ok(pages)
}

/// Stack the tables found on each page into one. The first non-empty line
/// of the document is the header; a page that repeats it skips it.
pub fn table_from_pages(pages: &[String]) -> Table {
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for page in pages {
        for line in page.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let fields: Vec<String> = COLUMN_GAP.split(line).map(|f| f.trim().to_string()).collect();
            match &header {
                None => header = Some(fields),
                Some(h) if *h == fields => {}
                Some(_) => rows.push(fields.into_iter().map(Value::String).collect()),
            }
        }
    }

    Table::from_rows(header.unwrap_or_default(), rows)
}
