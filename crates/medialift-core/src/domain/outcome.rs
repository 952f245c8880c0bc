//! Post-upload dispositions and batch results
//!
//! After a successful upload the source file receives exactly one
//! disposition: rename to the publish id, delete, or move to a completed
//! folder. The configured value is kept verbatim when unrecognized so the
//! executor can report it instead of failing.

use serde::{Deserialize, Serialize};

use super::source_item::{PublishedItem, SourceItem};

/// The three dispositions the executor knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostAction {
    /// Rename the source to `<publish_id><original extension>`
    Rename,
    /// Remove the source file entirely
    Delete,
    /// Relocate the source into the configured completed folder
    Move,
}

/// A configured post-upload action, parsed leniently.
///
/// Unrecognized values are not a configuration error; they degrade to a
/// logged `unknown` outcome at execution time, so the raw string is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostActionSetting {
    Known(PostAction),
    Unknown(String),
}

impl PostActionSetting {
    /// Parses a configured value, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rename" => Self::Known(PostAction::Rename),
            "delete" => Self::Known(PostAction::Delete),
            "move" => Self::Known(PostAction::Move),
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// What actually happened to the source file, as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Rename,
    Delete,
    Move,
    Unknown,
}

impl From<PostAction> for ActionKind {
    fn from(action: PostAction) -> Self {
        match action {
            PostAction::Rename => ActionKind::Rename,
            PostAction::Delete => ActionKind::Delete,
            PostAction::Move => ActionKind::Move,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionKind::Rename => "rename",
            ActionKind::Delete => "delete",
            ActionKind::Move => "move",
            ActionKind::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Outcome of applying the configured disposition to one item.
///
/// One per processed item, appended to the audit log and never mutated.
/// A failed disposition is still an outcome: the failure is described in
/// `info`, it does not un-upload the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub info: String,
}

impl ActionOutcome {
    pub fn new(kind: ActionKind, info: impl Into<String>) -> Self {
        Self {
            kind,
            info: info.into(),
        }
    }
}

/// Result of a completed resumable upload.
///
/// Only produced on success; a failed upload surfaces as a typed error,
/// never as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Identifier assigned by the publish target
    pub publish_id: String,
    /// Title under which the item was published
    pub title: String,
}

/// Overall status of one batch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// The reconciler found nothing new to upload
    #[serde(rename = "no-new-videos")]
    NoNewItems,
    /// The work list was processed (individual items may still have failed)
    #[serde(rename = "processed")]
    Processed,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::NoNewItems => write!(f, "no-new-videos"),
            BatchStatus::Processed => write!(f, "processed"),
        }
    }
}

/// Structured summary returned by every batch run.
///
/// Always reported as a success to the caller; per-item failures are
/// visible only through logs and the audit trail, which keeps re-invocation
/// idempotent (failed items were never logged as uploaded and stay "new").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub status: BatchStatus,
    /// Items uploaded during this run, in enumeration order
    pub uploaded: Vec<SourceItem>,
    /// Snapshot of the publish catalog taken before any work started
    pub catalog: Vec<PublishedItem>,
    /// Every media item found during the store walk
    pub scanned: Vec<SourceItem>,
}
