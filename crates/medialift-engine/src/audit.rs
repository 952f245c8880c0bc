//! Best-effort audit trail writer
//!
//! Wraps an [`IAuditSink`] with the two operations the batch needs:
//! creating the log tab with its header when absent, and appending one row
//! per processed item. All failures are logged via `tracing::warn!` and
//! swallowed; losing an audit row must not fail an otherwise-successful
//! upload.

use std::sync::Arc;

use tracing::{info, warn};

use medialift_core::domain::audit::{AuditRecord, COLUMNS};
use medialift_core::ports::audit_sink::IAuditSink;

/// Append-only writer for the audit trail.
///
/// Appends are serialized through an internal mutex so concurrent batch
/// workers never interleave writes to the sink.
pub struct AuditWriter {
    sink: Arc<dyn IAuditSink>,
    tab: String,
    append_guard: tokio::sync::Mutex<()>,
}

impl AuditWriter {
    pub fn new(sink: Arc<dyn IAuditSink>, tab: impl Into<String>) -> Self {
        Self {
            sink,
            tab: tab.into(),
            append_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Creates the log tab with its fixed header if and only if it is
    /// absent. Idempotent; failures are logged and swallowed.
    pub async fn ensure_schema(&self) {
        let tabs = match self.sink.list_tabs().await {
            Ok(tabs) => tabs,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "could not inspect audit sink schema");
                return;
            }
        };

        if tabs.iter().any(|t| t == &self.tab) {
            return;
        }

        info!(tab = %self.tab, "creating audit log tab");
        if let Err(err) = self.sink.create_tab(&self.tab, COLUMNS.len() as u32).await {
            warn!(error = %format!("{err:#}"), "failed to create audit log tab");
            return;
        }

        let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        if let Err(err) = self.sink.append_row(&self.tab, &header).await {
            warn!(error = %format!("{err:#}"), "failed to write audit log header");
        }
    }

    /// Appends one record. Failures are logged and swallowed.
    pub async fn append(&self, record: AuditRecord) {
        let _guard = self.append_guard.lock().await;
        if let Err(err) = self.sink.append_row(&self.tab, &record.into_row()).await {
            warn!(error = %format!("{err:#}"), "failed to append audit entry");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
