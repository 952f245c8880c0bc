//! YouTube-style publish adapter
//!
//! Implements [`IPublishProvider`]: catalog enumeration through the
//! channel's uploads playlist, and the resumable upload protocol
//! (initiation via `uploadType=resumable`, chunk PUTs with
//! `Content-Range`, `308` progress responses whose `Range` header
//! acknowledges stored bytes, and a terminal JSON body on `200`/`201`).

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use reqwest::{header, Method};
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info};

use medialift_core::domain::source_item::PublishedItem;
use medialift_core::ports::publish_provider::{
    CatalogPage, IPublishProvider, IUploadSession, UploadMetadata,
};
use medialift_core::ports::transfer::{ChunkError, ChunkStatus};

use crate::client::{chunk_error_from_reqwest, ApiClient};

/// Base URL for the YouTube Data v3 API.
pub const YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Base URL for the resumable upload endpoint.
pub const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/youtube/v3";

/// Public watch URL prefix.
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Upload chunk size: 10 MiB.
const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Page size for catalog listings.
const PAGE_SIZE: &str = "50";

// ============================================================================
// YouTube API response types
// ============================================================================

/// Response from `GET /channels?part=contentDetails`.
#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Channel {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

/// Response from `GET /playlistItems?part=snippet`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

// ============================================================================
// TubePublisher
// ============================================================================

/// [`IPublishProvider`] implementation over a YouTube-shaped API.
pub struct TubePublisher {
    client: Arc<ApiClient>,
    base_url: String,
    upload_base_url: String,
    chunk_size: u64,
    /// Resolved once per batch; the catalog pages all come from the same
    /// uploads playlist.
    uploads_playlist: OnceLock<String>,
}

impl TubePublisher {
    /// Creates a publisher against the production endpoints.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_base_urls(client, YOUTUBE_BASE_URL, UPLOAD_BASE_URL)
    }

    /// Creates a publisher with custom base URLs (useful for testing).
    pub fn with_base_urls(
        client: Arc<ApiClient>,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            upload_base_url: upload_base_url.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            uploads_playlist: OnceLock::new(),
        }
    }

    /// Overrides the upload chunk size.
    pub fn with_chunk_size(mut self, bytes: u64) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Resolves the uploads playlist of the channel (or of the
    /// authenticated user when no channel id is given).
    async fn resolve_uploads_playlist(&self, channel_id: Option<&str>) -> Result<String> {
        if let Some(playlist) = self.uploads_playlist.get() {
            return Ok(playlist.clone());
        }

        let url = format!("{}/channels", self.base_url);
        let mut request = self
            .client
            .request(Method::GET, &url)
            .query(&[("part", "contentDetails")]);
        request = match channel_id {
            Some(id) => request.query(&[("id", id)]),
            None => request.query(&[("mine", "true")]),
        };

        let channels: ChannelListResponse = request
            .send()
            .await
            .context("Failed to send channel lookup request")?
            .error_for_status()
            .context("Channel lookup returned error status")?
            .json()
            .await
            .context("Failed to parse channel lookup response")?;

        let playlist = channels
            .items
            .into_iter()
            .next()
            .context("No channel found for the given criteria")?
            .content_details
            .related_playlists
            .uploads;

        debug!(playlist = %playlist, "resolved uploads playlist");
        let _ = self.uploads_playlist.set(playlist.clone());
        Ok(playlist)
    }
}

#[async_trait::async_trait]
impl IPublishProvider for TubePublisher {
    async fn list_catalog(
        &self,
        channel_id: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<CatalogPage> {
        let playlist = self.resolve_uploads_playlist(channel_id).await?;

        let url = format!("{}/playlistItems", self.base_url);
        let mut request = self.client.request(Method::GET, &url).query(&[
            ("part", "snippet"),
            ("playlistId", playlist.as_str()),
            ("maxResults", PAGE_SIZE),
        ]);
        if let Some(cursor) = cursor {
            request = request.query(&[("pageToken", cursor)]);
        }

        let page: PlaylistItemsResponse = request
            .send()
            .await
            .context("Failed to send catalog listing request")?
            .error_for_status()
            .context("Catalog listing returned error status")?
            .json()
            .await
            .context("Failed to parse catalog listing response")?;

        let items = page
            .items
            .into_iter()
            .map(|item| PublishedItem {
                publish_id: item.snippet.resource_id.video_id,
                title: item.snippet.title,
            })
            .collect();

        Ok(CatalogPage {
            items,
            next_cursor: page.next_page_token,
        })
    }

    async fn begin_upload(
        &self,
        local_path: &Path,
        metadata: &UploadMetadata,
    ) -> Result<Box<dyn IUploadSession>> {
        let total = tokio::fs::metadata(local_path)
            .await
            .with_context(|| format!("failed to stat {}", local_path.display()))?
            .len();
        anyhow::ensure!(
            total > 0,
            "refusing to upload empty file {}",
            local_path.display()
        );

        let body = serde_json::json!({
            "snippet": {
                "title": metadata.title,
                "description": metadata.description,
                "tags": metadata.tags,
            },
            "status": {
                "privacyStatus": "unlisted",
                "selfDeclaredMadeForKids": metadata.made_for_kids,
            },
        });

        let url = format!("{}/videos", self.upload_base_url);
        let response = self
            .client
            .request(Method::POST, &url)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .header("X-Upload-Content-Type", "application/octet-stream")
            .header("X-Upload-Content-Length", total.to_string())
            .json(&body)
            .send()
            .await
            .context("Failed to initiate upload session")?
            .error_for_status()
            .context("Upload session initiation returned error status")?;

        let session_url = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .context("Upload session response carried no Location header")?;

        info!(title = %metadata.title, bytes = total, "upload session created");
        Ok(Box::new(TubeUploadSession {
            http: self.client.http().clone(),
            access_token: self.client.access_token().to_string(),
            session_url,
            path: local_path.to_path_buf(),
            total,
            confirmed: 0,
            chunk_size: self.chunk_size,
        }))
    }

    fn watch_url(&self, publish_id: &str) -> String {
        format!("{WATCH_URL_PREFIX}{publish_id}")
    }
}

// ============================================================================
// TubeUploadSession
// ============================================================================

/// One resumable upload transaction.
///
/// `confirmed` tracks the last byte offset the remote end acknowledged
/// through a `308` `Range` header. Every chunk is read from the local file
/// at that offset, so a retried call after a transient failure re-sends
/// only unacknowledged bytes.
#[derive(Debug)]
struct TubeUploadSession {
    http: reqwest::Client,
    access_token: String,
    session_url: String,
    path: PathBuf,
    total: u64,
    confirmed: u64,
    chunk_size: u64,
}

/// Extracts the last acknowledged byte offset from a `Range: bytes=0-N`
/// header value.
fn parse_range_end(value: &str) -> Option<u64> {
    value.rsplit('-').next()?.trim().parse().ok()
}

/// Reads `length` bytes of a file starting at `offset`.
async fn read_file_range(path: &Path, offset: u64, length: u64) -> std::io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    file.seek(std::io::SeekFrom::Start(offset)).await?;
    let mut buffer = Vec::with_capacity(length as usize);
    file.take(length).read_to_end(&mut buffer).await?;
    Ok(buffer)
}

#[async_trait::async_trait]
impl IUploadSession for TubeUploadSession {
    async fn send_chunk(&mut self) -> Result<ChunkStatus, ChunkError> {
        let end = (self.confirmed + self.chunk_size).min(self.total);
        let data = read_file_range(&self.path, self.confirmed, end - self.confirmed)
            .await
            .map_err(|err| ChunkError::other(format!("failed to read chunk: {err}")))?;

        let content_range = format!("bytes {}-{}/{}", self.confirmed, end - 1, self.total);
        debug!(range = %content_range, "sending chunk");

        let response = self
            .http
            .put(&self.session_url)
            .bearer_auth(&self.access_token)
            .header(header::CONTENT_LENGTH, data.len())
            .header(header::CONTENT_RANGE, &content_range)
            .body(data)
            .send()
            .await
            .map_err(chunk_error_from_reqwest)?;

        let status = response.status();
        // 308 here is the resumable protocol's "Resume Incomplete", not a
        // redirect: the Range header acknowledges the bytes stored so far.
        if status.as_u16() == 308 {
            self.confirmed = response
                .headers()
                .get(header::RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_range_end)
                .map(|last| last + 1)
                .unwrap_or(self.confirmed);
            Ok(ChunkStatus::Progress(
                self.confirmed as f64 / self.total as f64,
            ))
        } else if status.is_success() {
            self.confirmed = self.total;
            let body = response
                .json()
                .await
                .map_err(|err| ChunkError::other(format!("unreadable terminal response: {err}")))?;
            Ok(ChunkStatus::Complete(body))
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
