//! Audit sink port (driven/secondary port)
//!
//! A spreadsheet-shaped surface for the append-only audit trail: named
//! tabs, a creatable schema, and row appends. The audit writer in the
//! engine treats every call as best-effort.

#[async_trait::async_trait]
pub trait IAuditSink: Send + Sync {
    /// Names of the tabs currently present in the sink.
    async fn list_tabs(&self) -> anyhow::Result<Vec<String>>;

    /// Creates a tab with the given column count.
    async fn create_tab(&self, name: &str, columns: u32) -> anyhow::Result<()>;

    /// Appends one row to a tab.
    async fn append_row(&self, tab: &str, row: &[String]) -> anyhow::Result<()>;
}
