//! Drive-style store adapter
//!
//! Implements [`IStoreProvider`] against a Drive-v3-shaped HTTP API:
//! folder listings with page tokens, `Range`-based chunked media
//! downloads, metadata patches for rename/move, and the published-label
//! catalog for tag resolution.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{header, Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use medialift_core::ports::store_provider::{
    IMediaDownload, IStoreProvider, MetadataPatch, NodePage, StoreNode,
};
use medialift_core::ports::transfer::{ChunkError, ChunkRead};

use crate::client::{chunk_error_from_reqwest, ApiClient};

/// Base URL for the Drive v3 API.
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for the Drive Labels v2 API.
pub const LABELS_BASE_URL: &str = "https://drivelabels.googleapis.com/v2";

/// MIME type marking a node as a folder.
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Fields requested for every listed file.
const LIST_FIELDS: &str =
    "nextPageToken, files(id, name, mimeType, size, description, properties, labelInfo)";

/// Download chunk size: 10 MiB.
const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

// ============================================================================
// Drive API response types
// ============================================================================

/// Response from `GET /files`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// A file resource from the Drive API.
///
/// `size` is a decimal string on the wire, not a number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    size: Option<String>,
    description: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    label_info: Option<DriveLabelInfo>,
}

#[derive(Debug, Deserialize)]
struct DriveLabelInfo {
    #[serde(default)]
    labels: Vec<DriveLabelRef>,
}

#[derive(Debug, Deserialize)]
struct DriveLabelRef {
    id: String,
}

/// Response from `GET /files/{id}?fields=parents`.
#[derive(Debug, Deserialize)]
struct DriveParents {
    #[serde(default)]
    parents: Vec<String>,
}

/// Response from `POST /files` (container creation).
#[derive(Debug, Deserialize)]
struct DriveCreated {
    id: String,
}

/// Response from the labels listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelList {
    #[serde(default)]
    labels: Vec<DriveLabel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveLabel {
    id: String,
    properties: Option<LabelProperties>,
}

#[derive(Debug, Deserialize)]
struct LabelProperties {
    title: Option<String>,
}

/// Maps a Drive file resource to the port-level node DTO.
fn file_to_node(file: DriveFile) -> StoreNode {
    let is_container = file.mime_type == FOLDER_MIME;
    let size = file.size.as_deref().and_then(|s| s.parse().ok());
    let label_refs = file
        .label_info
        .map(|info| info.labels.into_iter().map(|l| l.id).collect())
        .unwrap_or_default();

    StoreNode {
        id: file.id,
        name: file.name,
        mime_kind: file.mime_type,
        is_container,
        size,
        description: file.description,
        properties: file.properties,
        label_refs,
    }
}

// ============================================================================
// DriveStore
// ============================================================================

/// [`IStoreProvider`] implementation over a Drive-shaped API.
pub struct DriveStore {
    client: Arc<ApiClient>,
    base_url: String,
    labels_base_url: String,
    chunk_size: u64,
}

impl DriveStore {
    /// Creates a store adapter against the production endpoints.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_base_urls(client, DRIVE_BASE_URL, LABELS_BASE_URL)
    }

    /// Creates a store adapter with custom base URLs (useful for testing).
    pub fn with_base_urls(
        client: Arc<ApiClient>,
        base_url: impl Into<String>,
        labels_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            labels_base_url: labels_base_url.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Overrides the download chunk size.
    pub fn with_chunk_size(mut self, bytes: u64) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Fetches the current parent ids of a node (needed to relocate it).
    async fn get_parents(&self, id: &str) -> Result<Vec<String>> {
        let url = format!("{}/files/{}", self.base_url, id);
        let parents: DriveParents = self
            .client
            .request(Method::GET, &url)
            .query(&[("fields", "parents")])
            .send()
            .await
            .context("Failed to fetch node parents")?
            .error_for_status()
            .context("Parent lookup returned error status")?
            .json()
            .await
            .context("Failed to parse parent lookup response")?;
        Ok(parents.parents)
    }
}

#[async_trait::async_trait]
impl IStoreProvider for DriveStore {
    async fn list_children(
        &self,
        container_id: &str,
        cursor: Option<&str>,
    ) -> Result<NodePage> {
        let url = format!("{}/files", self.base_url);
        let query = format!("'{container_id}' in parents and trashed=false");
        debug!(container = container_id, page = cursor.is_some(), "listing children");

        let mut request = self.client.request(Method::GET, &url).query(&[
            ("q", query.as_str()),
            ("fields", LIST_FIELDS),
            ("pageSize", "100"),
        ]);
        if let Some(cursor) = cursor {
            request = request.query(&[("pageToken", cursor)]);
        }

        let list: DriveFileList = request
            .send()
            .await
            .context("Failed to send folder listing request")?
            .error_for_status()
            .context("Folder listing returned error status")?
            .json()
            .await
            .context("Failed to parse folder listing response")?;

        Ok(NodePage {
            nodes: list.files.into_iter().map(file_to_node).collect(),
            next_cursor: list.next_page_token,
        })
    }

    async fn open_download(&self, id: &str) -> Result<Box<dyn IMediaDownload>> {
        let url = format!("{}/files/{}?alt=media", self.base_url, id);
        debug!(id, "opening chunked download");
        Ok(Box::new(DriveDownload {
            http: self.client.http().clone(),
            access_token: self.client.access_token().to_string(),
            url,
            offset: 0,
            total: None,
            chunk_size: self.chunk_size,
            done: false,
        }))
    }

    async fn update_metadata(&self, id: &str, patch: &MetadataPatch) -> Result<()> {
        let url = format!("{}/files/{}", self.base_url, id);
        let mut request = self.client.request(Method::PATCH, &url);

        if let Some(parent) = &patch.parent_id {
            let previous = self.get_parents(id).await?;
            request = request.query(&[
                ("addParents", parent.as_str()),
                ("removeParents", previous.join(",").as_str()),
            ]);
        }

        let body = match &patch.name {
            Some(name) => serde_json::json!({ "name": name }),
            None => serde_json::json!({}),
        };

        request
            .json(&body)
            .send()
            .await
            .context("Failed to send metadata patch")?
            .error_for_status()
            .context("Metadata patch returned error status")?;
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<()> {
        let url = format!("{}/files/{}", self.base_url, id);
        self.client
            .request(Method::DELETE, &url)
            .send()
            .await
            .context("Failed to send delete request")?
            .error_for_status()
            .context("Delete returned error status")?;
        Ok(())
    }

    async fn create_container(&self, name: &str, parent_id: &str) -> Result<String> {
        let url = format!("{}/files", self.base_url);
        let body = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [parent_id],
        });

        let created: DriveCreated = self
            .client
            .request(Method::POST, &url)
            .json(&body)
            .send()
            .await
            .context("Failed to send container creation request")?
            .error_for_status()
            .context("Container creation returned error status")?
            .json()
            .await
            .context("Failed to parse container creation response")?;
        Ok(created.id)
    }

    async fn list_labels(&self) -> Result<BTreeMap<String, String>> {
        let url = format!("{}/labels", self.labels_base_url);
        let mut map = BTreeMap::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self.client.request(Method::GET, &url).query(&[
                ("publishedOnly", "true"),
                ("pageSize", "100"),
            ]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("pageToken", cursor.as_str())]);
            }

            let list: LabelList = request
                .send()
                .await
                .context("Failed to send label listing request")?
                .error_for_status()
                .context("Label listing returned error status")?
                .json()
                .await
                .context("Failed to parse label listing response")?;

            for label in list.labels {
                if let Some(title) = label.properties.and_then(|p| p.title) {
                    map.insert(label.id, title);
                }
            }

            match list.next_page_token {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(map)
    }
}

// ============================================================================
// DriveDownload - Range-based chunked download
// ============================================================================

/// Chunked download over HTTP range requests.
///
/// Each `next_chunk` call requests `bytes=offset-(offset+chunk-1)`; a 206
/// response advances the confirmed offset by exactly the bytes received,
/// so a retried call after a failure continues where the last confirmed
/// byte left off. The total size comes from the first `Content-Range`
/// header.
struct DriveDownload {
    http: reqwest::Client,
    access_token: String,
    url: String,
    offset: u64,
    total: Option<u64>,
    chunk_size: u64,
    done: bool,
}

/// Extracts the total size from a `Content-Range: bytes a-b/total` header.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

#[async_trait::async_trait]
impl IMediaDownload for DriveDownload {
    async fn next_chunk(&mut self) -> Result<ChunkRead, ChunkError> {
        if self.done {
            return Ok(ChunkRead {
                data: Vec::new(),
                bytes_confirmed: self.offset,
                total: self.total,
                done: true,
            });
        }

        let end = self.offset + self.chunk_size - 1;
        let response = self
            .http
            .get(&self.url)
            .bearer_auth(&self.access_token)
            .header(header::RANGE, format!("bytes={}-{}", self.offset, end))
            .send()
            .await
            .map_err(chunk_error_from_reqwest)?;

        let status = response.status();
        if status == StatusCode::PARTIAL_CONTENT {
            if self.total.is_none() {
                self.total = response
                    .headers()
                    .get(header::CONTENT_RANGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_content_range_total);
            }
            let data = response
                .bytes()
                .await
                .map_err(chunk_error_from_reqwest)?
                .to_vec();
            self.offset += data.len() as u64;
            self.done = match self.total {
                Some(total) => self.offset >= total,
                // no Content-Range: a short read is the only end marker
                None => (data.len() as u64) < self.chunk_size,
            };
            Ok(ChunkRead {
                data,
                bytes_confirmed: self.offset,
                total: self.total,
                done: self.done,
            })
        } else if status.is_success() {
            // range request ignored: the whole body arrived at once
            let data = response
                .bytes()
                .await
                .map_err(chunk_error_from_reqwest)?
                .to_vec();
            self.offset += data.len() as u64;
            self.total = Some(self.offset);
            self.done = true;
            Ok(ChunkRead {
                data,
                bytes_confirmed: self.offset,
                total: self.total,
                done: true,
            })
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            Err(ChunkError::http(status.as_u16(), message))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
