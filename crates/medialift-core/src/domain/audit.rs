//! Audit trail records
//!
//! One [`AuditRecord`] is appended per successfully uploaded item. The row
//! layout is fixed at seven columns; the header is written once by the
//! audit writer when it creates the log tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ActionKind;

/// Column headers of the audit log, in row order.
pub const COLUMNS: [&str; 7] = [
    "Timestamp",
    "Original Filename",
    "Source File ID",
    "Video ID",
    "Video Link",
    "Action",
    "Additional Info",
];

/// A single append-only audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the item finished processing
    pub timestamp: DateTime<Utc>,
    /// Display name the file had in the store at upload time
    pub source_name: String,
    /// Store identifier of the file
    pub remote_id: String,
    /// Identifier assigned by the publish target
    pub publish_id: String,
    /// Public URL of the published item
    pub publish_url: String,
    /// Disposition applied to the source file
    pub action: ActionKind,
    /// Free-text detail (rename target, failure description, ...)
    pub info: String,
}

impl AuditRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        source_name: impl Into<String>,
        remote_id: impl Into<String>,
        publish_id: impl Into<String>,
        publish_url: impl Into<String>,
        action: ActionKind,
        info: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            source_name: source_name.into(),
            remote_id: remote_id.into(),
            publish_id: publish_id.into(),
            publish_url: publish_url.into(),
            action,
            info: info.into(),
        }
    }

    /// Renders the record as one spreadsheet row matching [`COLUMNS`].
    pub fn into_row(self) -> Vec<String> {
        vec![
            self.timestamp.to_rfc3339(),
            self.source_name,
            self.remote_id,
            self.publish_id,
            self.publish_url,
            self.action.to_string(),
            self.info,
        ]
    }
}
