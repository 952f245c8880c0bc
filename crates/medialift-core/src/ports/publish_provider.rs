//! Publish target port (driven/secondary port)
//!
//! Interface for the platform items are uploaded to: catalog enumeration
//! for reconciliation, and resumable upload sessions for the transfer
//! engine.

use std::path::Path;

use crate::domain::source_item::PublishedItem;
use crate::ports::transfer::{ChunkError, ChunkStatus};

/// Metadata attached to an upload when the session is initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub made_for_kids: bool,
}

/// One page of the publish target's catalog.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub items: Vec<PublishedItem>,
    /// Cursor for the next page; `None` when the catalog is exhausted
    pub next_cursor: Option<String>,
}

/// An open resumable upload session.
///
/// The session tracks the last byte offset acknowledged by the remote end
/// and every [`send_chunk`](IUploadSession::send_chunk) call continues from
/// there, so a retried call never re-sends confirmed bytes. Owned
/// exclusively by one transfer; dropped when the transfer ends.
#[async_trait::async_trait]
pub trait IUploadSession: Send + std::fmt::Debug {
    /// Sends the next chunk and reports progress or the terminal response.
    async fn send_chunk(&mut self) -> Result<ChunkStatus, ChunkError>;
}

/// Port trait for the publish target.
#[async_trait::async_trait]
pub trait IPublishProvider: Send + Sync {
    /// Lists one page of the already-published catalog.
    ///
    /// # Arguments
    /// * `channel_id` - Channel to enumerate; `None` means the channel of
    ///   the authenticated user
    /// * `cursor` - Page cursor from the previous call, or `None` for the
    ///   first page
    async fn list_catalog(
        &self,
        channel_id: Option<&str>,
        cursor: Option<&str>,
    ) -> anyhow::Result<CatalogPage>;

    /// Initiates a resumable upload of a local file.
    async fn begin_upload(
        &self,
        local_path: &Path,
        metadata: &UploadMetadata,
    ) -> anyhow::Result<Box<dyn IUploadSession>>;

    /// Public URL of a published item.
    fn watch_url(&self, publish_id: &str) -> String;
}
