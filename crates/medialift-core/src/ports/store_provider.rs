//! Source store port (driven/secondary port)
//!
//! Interface for the hierarchical remote file store being scanned. The
//! primary implementation targets a Drive-style HTTP API, but the trait is
//! provider-agnostic.
//!
//! ## Design Notes
//!
//! - `StoreNode` is a port-level DTO, not a domain entity; the reconciler
//!   maps recognized media nodes to `SourceItem`.
//! - Listing is paged: callers pass the cursor from the previous
//!   [`NodePage`] until it comes back `None`.
//! - Rename and move are both metadata patches, mirroring how file stores
//!   actually expose them.

use std::collections::BTreeMap;

use crate::ports::transfer::{ChunkError, ChunkRead};

/// A node returned by a folder listing: file or sub-container.
#[derive(Debug, Clone)]
pub struct StoreNode {
    /// Store-assigned identifier
    pub id: String,
    /// Display name (extension included for files)
    pub name: String,
    /// MIME kind reported by the store
    pub mime_kind: String,
    /// True for folder/container nodes
    pub is_container: bool,
    /// Size in bytes when the store reports one
    pub size: Option<u64>,
    /// Free-text description, if any
    pub description: Option<String>,
    /// File-level key/value properties
    pub properties: BTreeMap<String, String>,
    /// Ids of taxonomy labels attached to the node
    pub label_refs: Vec<String>,
}

/// One page of a folder listing.
#[derive(Debug, Clone)]
pub struct NodePage {
    pub nodes: Vec<StoreNode>,
    /// Cursor for the next page; `None` when the listing is exhausted
    pub next_cursor: Option<String>,
}

/// A partial metadata update. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MetadataPatch {
    /// New display name
    pub name: Option<String>,
    /// New parent container (relocates the node)
    pub parent_id: Option<String>,
}

impl MetadataPatch {
    /// A patch that only renames the node.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parent_id: None,
        }
    }

    /// A patch that only relocates the node.
    pub fn move_to(parent_id: impl Into<String>) -> Self {
        Self {
            name: None,
            parent_id: Some(parent_id.into()),
        }
    }
}

/// An open chunked download of one media file.
///
/// Owned exclusively by one transfer; dropped when the transfer ends.
#[async_trait::async_trait]
pub trait IMediaDownload: Send {
    /// Fetches the next chunk, continuing from the last confirmed offset.
    async fn next_chunk(&mut self) -> Result<ChunkRead, ChunkError>;
}

/// Port trait for the source file store.
#[async_trait::async_trait]
pub trait IStoreProvider: Send + Sync {
    /// Lists one page of a container's direct children.
    ///
    /// # Arguments
    /// * `container_id` - The container to list
    /// * `cursor` - Page cursor from the previous call, or `None` for the
    ///   first page
    async fn list_children(
        &self,
        container_id: &str,
        cursor: Option<&str>,
    ) -> anyhow::Result<NodePage>;

    /// Opens a chunked download of a file's content.
    async fn open_download(&self, id: &str) -> anyhow::Result<Box<dyn IMediaDownload>>;

    /// Applies a partial metadata update (rename and/or relocate).
    async fn update_metadata(&self, id: &str, patch: &MetadataPatch) -> anyhow::Result<()>;

    /// Permanently removes a node.
    async fn delete_node(&self, id: &str) -> anyhow::Result<()>;

    /// Creates a container and returns its id.
    async fn create_container(&self, name: &str, parent_id: &str) -> anyhow::Result<String>;

    /// Returns the published taxonomy labels as an id → title map.
    async fn list_labels(&self) -> anyhow::Result<BTreeMap<String, String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_patch_sets_only_the_name() {
        let patch = MetadataPatch::rename("xyz.mp4");
        assert_eq!(patch.name.as_deref(), Some("xyz.mp4"));
        assert!(patch.parent_id.is_none());
    }

    #[test]
    fn move_patch_sets_only_the_parent() {
        let patch = MetadataPatch::move_to("folder-done");
        assert!(patch.name.is_none());
        assert_eq!(patch.parent_id.as_deref(), Some("folder-done"));
    }

    #[test]
    fn default_patch_is_a_no_op() {
        let patch = MetadataPatch::default();
        assert!(patch.name.is_none() && patch.parent_id.is_none());
    }
}
