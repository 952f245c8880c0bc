//! Per-item pipeline stages
//!
//! Each batch item moves through a strictly sequential pipeline; a failure
//! is reported against the stage it happened in and abandons the item
//! without touching the rest of the batch.

use serde::{Deserialize, Serialize};

/// Pipeline position of a single batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pending,
    Downloading,
    MetadataResolved,
    Uploading,
    Uploaded,
    PostActionApplied,
    Logged,
    Done,
}

impl Stage {
    /// The stage that follows this one, or `None` from `Done`.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Pending => Some(Stage::Downloading),
            Stage::Downloading => Some(Stage::MetadataResolved),
            Stage::MetadataResolved => Some(Stage::Uploading),
            Stage::Uploading => Some(Stage::Uploaded),
            Stage::Uploaded => Some(Stage::PostActionApplied),
            Stage::PostActionApplied => Some(Stage::Logged),
            Stage::Logged => Some(Stage::Done),
            Stage::Done => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Pending => "pending",
            Stage::Downloading => "downloading",
            Stage::MetadataResolved => "metadata_resolved",
            Stage::Uploading => "uploading",
            Stage::Uploaded => "uploaded",
            Stage::PostActionApplied => "post_action_applied",
            Stage::Logged => "logged",
            Stage::Done => "done",
        };
        write!(f, "{s}")
    }
}
