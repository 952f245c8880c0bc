//! Store/catalog reconciliation
//!
//! Produces the batch work list: every media file in the source tree whose
//! stripped display name is not yet a publish identifier in the catalog.
//! The catalog snapshot is taken once, up front; the work set is never
//! re-checked mid-batch, so a duplicate upload across overlapping runs is
//! an accepted risk rather than something this module tries to solve.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use medialift_core::domain::source_item::{is_media_kind, PublishedItem, SourceItem};
use medialift_core::ports::publish_provider::IPublishProvider;
use medialift_core::ports::store_provider::{IStoreProvider, StoreNode};

/// Computes the set of source items that still need publishing.
pub struct Reconciler {
    store: Arc<dyn IStoreProvider>,
    publish: Arc<dyn IPublishProvider>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn IStoreProvider>, publish: Arc<dyn IPublishProvider>) -> Self {
        Self { store, publish }
    }

    /// Walks the store tree depth-first from `root_id` and collects every
    /// recognized media file.
    ///
    /// Containers that cannot be listed (permissions, transient API
    /// failures) are skipped with a warning; the walk continues. Nodes
    /// that are neither containers nor recognized media are ignored.
    pub async fn scan_store(&self, root_id: &str) -> Result<Vec<SourceItem>> {
        let mut pending = vec![root_id.to_string()];
        let mut items = Vec::new();

        while let Some(container_id) = pending.pop() {
            let mut cursor: Option<String> = None;
            loop {
                let page = match self
                    .store
                    .list_children(&container_id, cursor.as_deref())
                    .await
                {
                    Ok(page) => page,
                    Err(err) => {
                        warn!(
                            container = %container_id,
                            error = %format!("{err:#}"),
                            "skipping unreadable container"
                        );
                        break;
                    }
                };

                for node in page.nodes {
                    if node.is_container {
                        pending.push(node.id);
                    } else if is_media_kind(&node.mime_kind) {
                        items.push(node_to_item(node, &container_id));
                    }
                }

                match page.next_cursor {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }
        }

        info!(count = items.len(), "store scan complete");
        Ok(items)
    }

    /// Enumerates the full publish catalog, following the page cursor
    /// until it is exhausted.
    pub async fn snapshot_catalog(&self, channel_id: Option<&str>) -> Result<Vec<PublishedItem>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .publish
                .list_catalog(channel_id, cursor.as_deref())
                .await
                .context("failed to enumerate publish catalog")?;
            items.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(count = items.len(), "catalog snapshot complete");
        Ok(items)
    }

    /// Returns the items whose publish key is absent from the catalog,
    /// preserving enumeration order.
    ///
    /// The key is the display name with its extension stripped, which this
    /// system stamps as the publish identifier at upload time. Matching is
    /// best-effort: a catalog item published by someone else, or renamed
    /// after the fact, will not match and the file uploads again. An empty
    /// catalog yields the entire store as new work (cold start).
    pub fn diff(scanned: &[SourceItem], catalog: &[PublishedItem]) -> Vec<SourceItem> {
        let published: HashSet<&str> = catalog.iter().map(|c| c.publish_id.as_str()).collect();
        scanned
            .iter()
            .filter(|item| !published.contains(item.publish_key()))
            .cloned()
            .collect()
    }
}

/// Maps a listed store node to a domain item.
///
/// The `madeForKids` file property drives the audience declaration;
/// absence means false.
fn node_to_item(node: StoreNode, parent_id: &str) -> SourceItem {
    let made_for_kids = node
        .properties
        .get("madeForKids")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    SourceItem {
        remote_id: node.id,
        display_name: node.name,
        mime_kind: node.mime_kind,
        size_hint: node.size,
        description: node.description,
        properties: node.properties,
        label_refs: node.label_refs,
        parent_folder_id: parent_id.to_string(),
        made_for_kids,
    }
}

// ============================================================================
// Tests
// ============================================================================
