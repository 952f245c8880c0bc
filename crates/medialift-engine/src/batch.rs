//! Batch orchestration
//!
//! Sequences the reconciler, transfer engine, action executor and audit
//! writer for one invocation. Items are isolated from each other: a
//! failure during download or upload abandons that item with a logged
//! stage and the batch moves on; nothing short of a missing required
//! setting aborts the whole run.
//!
//! The work list is computed once, up front, from a catalog snapshot taken
//! before any transfer starts. Items are processed strictly in enumeration
//! order by default; `batch.concurrency` enables a bounded worker pool at
//! the cost of audit-log ordering.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use medialift_core::config::Config;
use medialift_core::domain::audit::AuditRecord;
use medialift_core::domain::outcome::{BatchStatus, BatchSummary, PostActionSetting};
use medialift_core::domain::source_item::SourceItem;
use medialift_core::domain::stage::Stage;
use medialift_core::ports::audit_sink::IAuditSink;
use medialift_core::ports::publish_provider::{IPublishProvider, UploadMetadata};
use medialift_core::ports::store_provider::IStoreProvider;

use crate::actions::ActionExecutor;
use crate::audit::AuditWriter;
use crate::reconcile::Reconciler;
use crate::transfer::{TransferEngine, TransferPolicy};

// ============================================================================
// BatchRunner
// ============================================================================

/// Orchestrates one batch invocation over injected port handles.
///
/// The runner owns the client handles for the duration of the batch; no
/// state survives between invocations.
pub struct BatchRunner {
    store: Arc<dyn IStoreProvider>,
    publish: Arc<dyn IPublishProvider>,
    audit: Option<Arc<AuditWriter>>,
    config: Config,
    cancel: CancellationToken,
}

impl BatchRunner {
    /// Creates a runner for one invocation.
    ///
    /// # Arguments
    /// * `audit_sink` - `None` disables the audit trail (a warning is
    ///   logged once per run)
    pub fn new(
        store: Arc<dyn IStoreProvider>,
        publish: Arc<dyn IPublishProvider>,
        audit_sink: Option<Arc<dyn IAuditSink>>,
        config: Config,
        cancel: CancellationToken,
    ) -> Self {
        let audit = audit_sink
            .map(|sink| Arc::new(AuditWriter::new(sink, config.audit.tab_name.clone())));
        Self {
            store,
            publish,
            audit,
            config,
            cancel,
        }
    }

    /// Runs the batch to completion and returns the structured summary.
    ///
    /// # Errors
    /// Only configuration errors and a failed catalog/store enumeration
    /// abort the run; per-item failures are logged and skipped.
    pub async fn run(&self) -> Result<BatchSummary> {
        let root = self.config.require_root_folder()?.to_string();

        let reconciler = Reconciler::new(self.store.clone(), self.publish.clone());

        info!("taking publish catalog snapshot");
        let catalog = reconciler
            .snapshot_catalog(self.config.publish.channel_id.as_deref())
            .await?;

        info!(root = %root, "scanning source store");
        let scanned = reconciler.scan_store(&root).await?;

        let work = Reconciler::diff(&scanned, &catalog);
        if work.is_empty() {
            info!("no new items to upload");
            return Ok(BatchSummary {
                status: BatchStatus::NoNewItems,
                uploaded: Vec::new(),
                catalog,
                scanned,
            });
        }
        info!(count = work.len(), "new items to upload");

        let labels = if self.config.source.fetch_labels {
            match self.store.list_labels().await {
                Ok(map) => map,
                Err(err) => {
                    warn!(
                        error = %format!("{err:#}"),
                        "could not fetch labels, tags from labels disabled"
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        match &self.audit {
            Some(audit) => audit.ensure_schema().await,
            None => warn!("no audit sink configured, uploads will not be recorded"),
        }

        let workdir = tempfile::tempdir().context("failed to create scratch directory")?;

        let ctx = ItemContext {
            store: self.store.clone(),
            publish: self.publish.clone(),
            audit: self.audit.clone(),
            labels: Arc::new(labels),
            policy: TransferPolicy::from_config(&self.config.transfer),
            default_description: self.config.publish.default_description.clone(),
            action: PostActionSetting::parse(&self.config.publish.post_upload_action),
            completed_folder_id: self.config.source.completed_folder_id.clone(),
            workdir: workdir.path().to_path_buf(),
            cancel: self.cancel.clone(),
        };

        let uploaded = if self.config.batch.concurrency > 1 {
            self.run_pooled(&ctx, &work).await
        } else {
            self.run_sequential(&ctx, &work).await
        };

        info!(uploaded = uploaded.len(), of = work.len(), "batch finished");
        Ok(BatchSummary {
            status: BatchStatus::Processed,
            uploaded,
            catalog,
            scanned,
        })
    }

    /// Processes the work list one item at a time, in enumeration order.
    async fn run_sequential(&self, ctx: &ItemContext, work: &[SourceItem]) -> Vec<SourceItem> {
        let mut uploaded = Vec::new();
        for item in work {
            if self.cancel.is_cancelled() {
                warn!("batch cancelled, skipping remaining items");
                break;
            }
            match process_item(ctx, item).await {
                Ok(()) => uploaded.push(item.clone()),
                Err(failure) => failure.log(item),
            }
        }
        uploaded
    }

    /// Processes the work list through a bounded worker pool.
    ///
    /// The summary still reports enumeration order; only the audit append
    /// order may interleave.
    async fn run_pooled(&self, ctx: &ItemContext, work: &[SourceItem]) -> Vec<SourceItem> {
        let semaphore = Arc::new(Semaphore::new(self.config.batch.concurrency));
        let mut tasks = JoinSet::new();

        for (index, item) in work.iter().cloned().enumerate() {
            let semaphore = semaphore.clone();
            let ctx = ctx.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, None);
                };
                if ctx.cancel.is_cancelled() {
                    return (index, None);
                }
                match process_item(&ctx, &item).await {
                    Ok(()) => (index, Some(item)),
                    Err(failure) => {
                        failure.log(&item);
                        (index, None)
                    }
                }
            });
        }

        let mut slots: Vec<Option<SourceItem>> = vec![None; work.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = outcome,
                Err(err) => error!(error = %err, "item worker panicked"),
            }
        }
        slots.into_iter().flatten().collect()
    }
}

// ============================================================================
// Per-item pipeline
// ============================================================================

/// Everything one item worker needs, cheap to clone into a task.
#[derive(Clone)]
struct ItemContext {
    store: Arc<dyn IStoreProvider>,
    publish: Arc<dyn IPublishProvider>,
    audit: Option<Arc<AuditWriter>>,
    labels: Arc<BTreeMap<String, String>>,
    policy: TransferPolicy,
    default_description: String,
    action: PostActionSetting,
    completed_folder_id: Option<String>,
    workdir: PathBuf,
    cancel: CancellationToken,
}

/// A failed item, tagged with the pipeline stage it died in.
struct ItemFailure {
    stage: Stage,
    error: anyhow::Error,
}

impl ItemFailure {
    fn at(stage: Stage) -> impl FnOnce(anyhow::Error) -> Self {
        move |error| Self { stage, error }
    }

    fn log(&self, item: &SourceItem) {
        error!(
            item = %item.display_name,
            id = %item.remote_id,
            stage = %self.stage,
            error = %format!("{:#}", self.error),
            "item failed, continuing with the next one"
        );
    }
}

/// Runs one item through download → upload → disposition → audit.
///
/// A failure before the upload completes abandons the item: no
/// post-action, no audit row, so the next run picks it up again. After a
/// successful upload nothing can fail the item anymore; disposition and
/// audit problems degrade to logged outcomes.
async fn process_item(ctx: &ItemContext, item: &SourceItem) -> Result<(), ItemFailure> {
    info!(item = %item.display_name, id = %item.remote_id, "processing item");

    let engine = TransferEngine::new(ctx.policy, ctx.cancel.clone());
    // Scratch name keyed by remote id: display names may collide across folders.
    let dest = ctx
        .workdir
        .join(format!("{}{}", item.remote_id, item.extension()));

    let mut stream = ctx
        .store
        .open_download(&item.remote_id)
        .await
        .map_err(ItemFailure::at(Stage::Downloading))?;
    engine
        .download(stream.as_mut(), &dest)
        .await
        .map_err(ItemFailure::at(Stage::Downloading))?;

    let metadata = resolve_metadata(item, &ctx.default_description, &ctx.labels);

    let mut session = ctx
        .publish
        .begin_upload(&dest, &metadata)
        .await
        .map_err(ItemFailure::at(Stage::Uploading))?;
    let upload = engine
        .drive_upload(session.as_mut())
        .await
        .map_err(ItemFailure::at(Stage::Uploading))?;

    let url = ctx.publish.watch_url(&upload.publish_id);
    info!(
        item = %item.display_name,
        publish_id = %upload.publish_id,
        url = %url,
        "upload complete"
    );

    let executor = ActionExecutor::new(ctx.store.clone());
    let outcome = executor
        .apply(
            item,
            &upload.publish_id,
            &ctx.action,
            ctx.completed_folder_id.as_deref(),
        )
        .await;

    if let Some(audit) = &ctx.audit {
        audit
            .append(AuditRecord::new(
                &item.display_name,
                &item.remote_id,
                &upload.publish_id,
                url,
                outcome.kind,
                outcome.info,
            ))
            .await;
    }

    if let Err(err) = tokio::fs::remove_file(&dest).await {
        warn!(path = %dest.display(), error = %err, "failed to remove scratch file");
    }

    Ok(())
}

/// Resolves upload metadata for one item.
///
/// Priority order: the item's own description, then the configured
/// default. Tags are the item's property keys followed by resolved label
/// titles; duplicates are acceptable. The title is the stripped display
/// name, which doubles as the reconciliation key on later runs.
fn resolve_metadata(
    item: &SourceItem,
    default_description: &str,
    labels: &BTreeMap<String, String>,
) -> UploadMetadata {
    let description = item
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| default_description.to_string());

    let mut tags: Vec<String> = item.properties.keys().cloned().collect();
    tags.extend(
        item.label_refs
            .iter()
            .filter_map(|id| labels.get(id).cloned()),
    );

    UploadMetadata {
        title: item.publish_key().to_string(),
        description,
        tags,
        made_for_kids: item.made_for_kids,
    }
}

// ============================================================================
// Tests
// ============================================================================
