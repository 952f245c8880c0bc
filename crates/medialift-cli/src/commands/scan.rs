//! Scan command - preview the work list
//!
//! Runs the reconciler only: catalog snapshot, store walk, diff. Nothing
//! is downloaded, uploaded or mutated.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use medialift_core::config::Config;
use medialift_engine::reconcile::Reconciler;
use medialift_google::drive::DriveStore;
use medialift_google::youtube::TubePublisher;

use crate::output::{render_work_list, OutputFormat};

#[derive(Debug, Args)]
pub struct ScanCommand {}

impl ScanCommand {
    pub async fn execute(&self, format: OutputFormat, config: Config) -> Result<()> {
        let root = config.require_root_folder()?.to_string();

        let client = super::api_client_from_env()?;
        let store = Arc::new(DriveStore::new(client.clone()));
        let publish = Arc::new(TubePublisher::new(client));

        let reconciler = Reconciler::new(store, publish);
        let catalog = reconciler
            .snapshot_catalog(config.publish.channel_id.as_deref())
            .await?;
        let scanned = reconciler.scan_store(&root).await?;
        let work = Reconciler::diff(&scanned, &catalog);

        render_work_list(format, &scanned, &catalog, &work)
    }
}
