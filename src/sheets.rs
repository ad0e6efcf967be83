//! # Spreadsheet Module
//!
//! The spreadsheet is the single source of truth for the plan catalog and the
//! destination of click logs. This module defines the collaborator traits the
//! rest of the crate depends on and their Google Sheets API v4 implementation.
//!
//! Worksheets are read like a table: the first row holds the column headers
//! and every following row becomes a record keyed by those headers.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::{Catalog, Plan};
use crate::click_log::{ClickEntry, ClickRecord};
use crate::config::{SheetsAuth, SheetsConfig};

/// Loads the plan catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog>;
}

/// Appends click-log rows
#[async_trait]
pub trait ClickSink: Send + Sync {
    async fn append_click(&self, entry: &ClickEntry) -> Result<()>;
}

/// Reads back the click log
#[async_trait]
pub trait ClickSource: Send + Sync {
    async fn fetch_clicks(&self) -> Result<Vec<ClickRecord>>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Convert a header row plus data rows into typed records
///
/// Short rows are padded with empty cells, non-string cells are converted to
/// their text form, and rows with only blank cells are skipped.
pub fn records_from_values<T: DeserializeOwned>(values: Vec<Vec<Value>>) -> Result<Vec<T>> {
    let mut rows = values.into_iter();
    let header: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell_text(cell).trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let cells: Vec<String> = (0..header.len())
            .map(|i| row.get(i).map(cell_text).unwrap_or_default())
            .collect();
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let record: Map<String, Value> = header
            .iter()
            .zip(cells)
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.clone(), Value::String(cell)))
            .collect();

        let parsed = serde_json::from_value(Value::Object(record))
            .with_context(|| format!("Failed to parse sheet row {}", index + 2))?;
        records.push(parsed);
    }

    Ok(records)
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Quote a worksheet name for A1 notation
fn sheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// Google Sheets API v4 client
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.recovery.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn values_url(&self, worksheet: &str, suffix: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.api_base)
            .with_context(|| format!("Invalid Sheets API base: {}", self.config.api_base))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets API base cannot hold a path: {}", self.config.api_base))?
            .pop_if_empty()
            .extend(["spreadsheets", self.config.spreadsheet_id.as_str(), "values"])
            .push(&format!("{}{}", sheet_range(worksheet), suffix));

        if let SheetsAuth::ApiKey(key) = &self.config.auth {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth {
            SheetsAuth::BearerToken(token) => request.bearer_auth(token),
            SheetsAuth::ApiKey(_) => request,
        }
    }

    async fn read_records<T: DeserializeOwned>(&self, worksheet: &str) -> Result<Vec<T>> {
        let url = self.values_url(worksheet, "")?;
        debug!(worksheet, "Fetching worksheet values");

        let response = self
            .authorize(self.http.get(url))
            .send()
            .await
            .with_context(|| format!("Failed to fetch worksheet {worksheet}"))?
            .error_for_status()
            .with_context(|| format!("Sheets API rejected read of {worksheet}"))?;

        let range: ValueRange = response
            .json()
            .await
            .with_context(|| format!("Invalid response for worksheet {worksheet}"))?;

        records_from_values(range.values)
    }
}

#[async_trait]
impl CatalogSource for SheetsClient {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        let plans: Vec<Plan> = self.read_records(&self.config.catalog_worksheet).await?;
        let catalog = Catalog::new(plans);
        info!(
            worksheet = %self.config.catalog_worksheet,
            plans = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}

#[async_trait]
impl ClickSource for SheetsClient {
    async fn fetch_clicks(&self) -> Result<Vec<ClickRecord>> {
        self.read_records(&self.config.click_log_worksheet).await
    }
}

#[async_trait]
impl ClickSink for SheetsClient {
    async fn append_click(&self, entry: &ClickEntry) -> Result<()> {
        if !matches!(self.config.auth, SheetsAuth::BearerToken(_)) {
            bail!("Appending click logs requires GOOGLE_ACCESS_TOKEN");
        }

        let mut url = self.values_url(&self.config.click_log_worksheet, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = json!({ "values": [entry.to_row()] });

        self.authorize(self.http.post(url))
            .json(&body)
            .send()
            .await
            .context("Failed to append click log row")?
            .error_for_status()
            .context("Sheets API rejected click log append")?;

        Ok(())
    }
}
