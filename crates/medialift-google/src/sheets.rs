//! Sheets-style audit sink adapter
//!
//! Implements [`IAuditSink`] against a Sheets-v4-shaped API: tab discovery
//! through the spreadsheet resource, tab creation via `batchUpdate`, and
//! row appends through the `values:append` endpoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use medialift_core::ports::audit_sink::IAuditSink;

use crate::client::ApiClient;

/// Base URL for the Sheets v4 API.
pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

// ============================================================================
// Sheets API response types
// ============================================================================

/// Response from `GET /spreadsheets/{id}`.
#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

// ============================================================================
// SheetAudit
// ============================================================================

/// [`IAuditSink`] implementation over a Sheets-shaped API.
pub struct SheetAudit {
    client: Arc<ApiClient>,
    base_url: String,
    spreadsheet_id: String,
}

impl SheetAudit {
    /// Creates a sink adapter against the production endpoint.
    pub fn new(client: Arc<ApiClient>, spreadsheet_id: impl Into<String>) -> Self {
        Self::with_base_url(client, SHEETS_BASE_URL, spreadsheet_id)
    }

    /// Creates a sink adapter with a custom base URL (useful for testing).
    pub fn with_base_url(
        client: Arc<ApiClient>,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }
}

#[async_trait::async_trait]
impl IAuditSink for SheetAudit {
    async fn list_tabs(&self) -> Result<Vec<String>> {
        let url = format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id);
        let spreadsheet: SpreadsheetResponse = self
            .client
            .request(Method::GET, &url)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await
            .context("Failed to fetch spreadsheet")?
            .error_for_status()
            .context("Spreadsheet fetch returned error status")?
            .json()
            .await
            .context("Failed to parse spreadsheet response")?;

        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    async fn create_tab(&self, name: &str, columns: u32) -> Result<()> {
        let url = format!(
            "{}/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let body = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": name,
                        "gridProperties": {"rowCount": 1, "columnCount": columns},
                    }
                }
            }]
        });

        debug!(tab = name, "creating audit tab");
        self.client
            .request(Method::POST, &url)
            .json(&body)
            .send()
            .await
            .context("Failed to send tab creation request")?
            .error_for_status()
            .context("Tab creation returned error status")?;
        Ok(())
    }

    async fn append_row(&self, tab: &str, row: &[String]) -> Result<()> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}!A1:append",
            self.base_url, self.spreadsheet_id, tab
        );
        let body = serde_json::json!({ "values": [row] });

        self.client
            .request(Method::POST, &url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await
            .context("Failed to send row append request")?
            .error_for_status()
            .context("Row append returned error status")?;
        Ok(())
    }
}
