//! Run command - execute a full publish batch
//!
//! Wires the Google adapters into the batch runner, installs a Ctrl-C
//! handler that cancels the batch at item granularity, and renders the
//! summary.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use medialift_core::config::Config;
use medialift_core::ports::audit_sink::IAuditSink;
use medialift_engine::batch::BatchRunner;
use medialift_google::drive::DriveStore;
use medialift_google::sheets::SheetAudit;
use medialift_google::youtube::TubePublisher;

use crate::output::{render_summary, OutputFormat};

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Override the configured post-upload action (rename, delete, move)
    #[arg(long)]
    pub action: Option<String>,
}

impl RunCommand {
    pub async fn execute(&self, format: OutputFormat, mut config: Config) -> Result<()> {
        if let Some(action) = &self.action {
            config.publish.post_upload_action = action.clone();
        }

        let client = super::api_client_from_env()?;
        let chunk_bytes = config.transfer.chunk_size_mb * 1024 * 1024;

        let store = Arc::new(DriveStore::new(client.clone()).with_chunk_size(chunk_bytes));
        let publish = Arc::new(TubePublisher::new(client.clone()).with_chunk_size(chunk_bytes));
        let sink = config
            .audit
            .spreadsheet_id
            .clone()
            .map(|id| Arc::new(SheetAudit::new(client, id)) as Arc<dyn IAuditSink>);

        let cancel = CancellationToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("cancellation requested, finishing the current chunk");
                    cancel.cancel();
                }
            });
        }

        let runner = BatchRunner::new(store, publish, sink, config, cancel);
        let summary = runner.run().await?;

        render_summary(format, &summary)
    }
}
