//! Post-upload disposition of source files
//!
//! After a successful upload the source file receives exactly one
//! configured disposition. The executor makes a single attempt per item
//! and never raises: every branch converts its own failure into the
//! outcome's `info` text, so a botched rename or an unset destination
//! folder cannot abort the batch or un-upload the item.

use std::sync::Arc;

use tracing::{error, info, warn};

use medialift_core::domain::outcome::{
    ActionKind, ActionOutcome, PostAction, PostActionSetting,
};
use medialift_core::domain::source_item::SourceItem;
use medialift_core::ports::store_provider::{IStoreProvider, MetadataPatch};

/// Applies the configured post-upload action to source files.
pub struct ActionExecutor {
    store: Arc<dyn IStoreProvider>,
}

impl ActionExecutor {
    pub fn new(store: Arc<dyn IStoreProvider>) -> Self {
        Self { store }
    }

    /// Dispatches the configured disposition. Always returns an outcome.
    pub async fn apply(
        &self,
        item: &SourceItem,
        publish_id: &str,
        setting: &PostActionSetting,
        completed_folder_id: Option<&str>,
    ) -> ActionOutcome {
        match setting {
            PostActionSetting::Known(PostAction::Rename) => self.rename(item, publish_id).await,
            PostActionSetting::Known(PostAction::Delete) => self.delete(item).await,
            PostActionSetting::Known(PostAction::Move) => {
                self.relocate(item, completed_folder_id).await
            }
            PostActionSetting::Unknown(raw) => {
                warn!(action = %raw, item = %item.display_name, "unknown post-upload action, nothing done");
                ActionOutcome::new(ActionKind::Unknown, format!("Unknown action '{raw}'"))
            }
        }
    }

    /// Renames the source to `<publish_id><original extension>` so the
    /// next reconciliation run matches it against the catalog.
    async fn rename(&self, item: &SourceItem, publish_id: &str) -> ActionOutcome {
        let new_name = format!("{publish_id}{}", item.extension());
        match self
            .store
            .update_metadata(&item.remote_id, &MetadataPatch::rename(&new_name))
            .await
        {
            Ok(()) => {
                info!(item = %item.remote_id, new_name = %new_name, "renamed source file");
                ActionOutcome::new(ActionKind::Rename, format!("Renamed to {new_name}"))
            }
            Err(err) => {
                error!(item = %item.remote_id, error = %format!("{err:#}"), "rename failed");
                ActionOutcome::new(ActionKind::Rename, format!("Rename failed: {err:#}"))
            }
        }
    }

    async fn delete(&self, item: &SourceItem) -> ActionOutcome {
        match self.store.delete_node(&item.remote_id).await {
            Ok(()) => {
                info!(item = %item.remote_id, "deleted source file");
                ActionOutcome::new(ActionKind::Delete, "File deleted")
            }
            Err(err) => {
                error!(item = %item.remote_id, error = %format!("{err:#}"), "delete failed");
                ActionOutcome::new(ActionKind::Delete, format!("Delete failed: {err:#}"))
            }
        }
    }

    /// Moves the source into the completed folder. An unset folder is a
    /// configuration problem reported through the outcome, not an error.
    async fn relocate(&self, item: &SourceItem, completed_folder_id: Option<&str>) -> ActionOutcome {
        let Some(folder_id) = completed_folder_id else {
            let message =
                "Post-upload action is 'move' but no completed folder is configured".to_string();
            error!(item = %item.remote_id, "{message}");
            return ActionOutcome::new(ActionKind::Move, message);
        };

        match self
            .store
            .update_metadata(&item.remote_id, &MetadataPatch::move_to(folder_id))
            .await
        {
            Ok(()) => {
                info!(item = %item.remote_id, folder = %folder_id, "moved source file");
                ActionOutcome::new(ActionKind::Move, format!("Moved to folder {folder_id}"))
            }
            Err(err) => {
                error!(item = %item.remote_id, error = %format!("{err:#}"), "move failed");
                ActionOutcome::new(ActionKind::Move, format!("Move failed: {err:#}"))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
