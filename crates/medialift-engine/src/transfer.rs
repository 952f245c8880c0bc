//! Resumable chunked transfer driver
//!
//! Drives the chunk-level ports to completion: downloads loop over
//! [`IMediaDownload::next_chunk`] until the stream reports the end, uploads
//! loop over [`IUploadSession::send_chunk`] until a terminal response
//! arrives. Upload chunk calls are wrapped in a retry loop: transient
//! failures back off exponentially with jitter and retry the same chunk
//! (the session resumes from the last acknowledged byte offset), anything
//! else terminates the transfer.
//!
//! Retriability is decided by [`classify`], a single function over the
//! transport-agnostic [`ChunkError`], so the policy can be tested without
//! any particular HTTP client in the picture.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use medialift_core::config::TransferConfig;
use medialift_core::domain::errors::TransferError;
use medialift_core::domain::outcome::UploadResult;
use medialift_core::ports::publish_provider::IUploadSession;
use medialift_core::ports::store_provider::IMediaDownload;
use medialift_core::ports::transfer::{ChunkError, ChunkErrorKind, ChunkStatus};

/// Default retry ceiling for transient chunk failures.
pub const MAX_RETRIES: u32 = 10;

/// Default exponential backoff base in seconds.
pub const BACKOFF_BASE_SECS: u64 = 2;

/// HTTP statuses treated as transient server-side conditions.
const RETRIABLE_STATUS: [u16; 4] = [500, 502, 503, 504];

// ============================================================================
// Failure classification
// ============================================================================

/// Whether a failed chunk call is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Transient; retry the same chunk after backing off
    Retriable,
    /// Permanent; terminate the transfer immediately
    Fatal,
}

/// Classifies a chunk failure for the retry loop.
///
/// Retriable: server-side 5xx conditions in [`RETRIABLE_STATUS`], and
/// transport timeouts or dropped connections. Everything else (client
/// errors, malformed responses, local I/O) is fatal.
pub fn classify(error: &ChunkError) -> FailureClass {
    match error.kind {
        ChunkErrorKind::Http(status) if RETRIABLE_STATUS.contains(&status) => {
            FailureClass::Retriable
        }
        ChunkErrorKind::Timeout | ChunkErrorKind::Connection => FailureClass::Retriable,
        _ => FailureClass::Fatal,
    }
}

/// Sleep duration before the n-th retry: `base^retry` seconds plus a
/// uniform jitter in `[0, 1)`.
pub fn backoff_delay(base_secs: u64, retry: u32) -> Duration {
    let jitter: f64 = rand::random();
    Duration::from_secs_f64((base_secs as f64).powi(retry as i32) + jitter)
}

// ============================================================================
// TransferEngine
// ============================================================================

/// Retry/backoff knobs for one transfer engine instance.
#[derive(Debug, Clone, Copy)]
pub struct TransferPolicy {
    /// Retry ceiling; the transfer fails once the counter exceeds it
    pub max_retries: u32,
    /// Exponential backoff base in seconds
    pub backoff_base_secs: u64,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            backoff_base_secs: BACKOFF_BASE_SECS,
        }
    }
}

impl TransferPolicy {
    pub fn from_config(config: &TransferConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base_secs: config.backoff_base_secs,
        }
    }
}

/// Chunked transfer driver for one batch item at a time.
///
/// Holds no cross-item state; sessions are independent, and the backoff
/// sleep of one never blocks another. The cancellation token is observed
/// between chunk calls: an in-flight chunk completes, the next one is not
/// started.
#[derive(Clone)]
pub struct TransferEngine {
    policy: TransferPolicy,
    cancel: CancellationToken,
}

impl TransferEngine {
    pub fn new(policy: TransferPolicy, cancel: CancellationToken) -> Self {
        Self { policy, cancel }
    }

    /// Downloads a chunked stream into `dest`, reporting fractional
    /// progress after each chunk.
    ///
    /// # Returns
    /// The number of bytes written.
    ///
    /// # Errors
    /// [`TransferError::Network`] if a chunk request fails (download
    /// chunks are not retried; the item is re-attempted on the next run),
    /// [`TransferError::Cancelled`] when cancellation is observed between
    /// chunks, or an I/O error writing the destination file.
    pub async fn download(&self, stream: &mut dyn IMediaDownload, dest: &Path) -> Result<u64> {
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("failed to create {}", dest.display()))?;

        loop {
            if self.cancel.is_cancelled() {
                return Err(TransferError::Cancelled.into());
            }

            let chunk = match stream.next_chunk().await {
                Ok(chunk) => chunk,
                Err(err) => return Err(TransferError::Network(err.to_string()).into()),
            };

            if !chunk.data.is_empty() {
                file.write_all(&chunk.data)
                    .await
                    .with_context(|| format!("failed to write {}", dest.display()))?;
            }

            if let Some(total) = chunk.total.filter(|t| *t > 0) {
                let percent = (chunk.bytes_confirmed as f64 / total as f64 * 100.0) as u32;
                debug!(percent, "download progress");
            }

            if chunk.done {
                file.flush()
                    .await
                    .with_context(|| format!("failed to flush {}", dest.display()))?;
                info!(
                    bytes = chunk.bytes_confirmed,
                    dest = %dest.display(),
                    "download complete"
                );
                return Ok(chunk.bytes_confirmed);
            }
        }
    }

    /// Drives a resumable upload session to its terminal response.
    ///
    /// Transient chunk failures increment a per-session retry counter;
    /// past the ceiling the transfer fails with
    /// [`TransferError::RetriesExhausted`]. The counter never resets, so a
    /// session gets at most `max_retries + 1` failed attempts in total.
    ///
    /// # Errors
    /// [`TransferError::Protocol`] when the terminal response carries no
    /// identifier, [`TransferError::Network`] on a fatal chunk failure,
    /// [`TransferError::RetriesExhausted`] past the ceiling, or
    /// [`TransferError::Cancelled`].
    pub async fn drive_upload(&self, session: &mut dyn IUploadSession) -> Result<UploadResult> {
        let mut retry: u32 = 0;
        let mut attempts: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(TransferError::Cancelled.into());
            }

            attempts += 1;
            match session.send_chunk().await {
                Ok(ChunkStatus::Progress(fraction)) => {
                    debug!(percent = (fraction * 100.0) as u32, "upload progress");
                }
                Ok(ChunkStatus::Complete(body)) => return finish_upload(body),
                Err(err) => match classify(&err) {
                    FailureClass::Retriable => {
                        retry += 1;
                        if retry > self.policy.max_retries {
                            warn!(attempts, "retry ceiling reached, giving up");
                            return Err(TransferError::RetriesExhausted { attempts }.into());
                        }
                        let delay = backoff_delay(self.policy.backoff_base_secs, retry);
                        warn!(
                            error = %err,
                            retry,
                            delay_ms = delay.as_millis() as u64,
                            "transient chunk failure, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    FailureClass::Fatal => {
                        return Err(TransferError::Network(err.to_string()).into());
                    }
                },
            }
        }
    }
}

/// Extracts the upload result from a terminal response body.
///
/// A terminal response without an `id` field is a protocol violation, not
/// a retriable condition.
fn finish_upload(body: serde_json::Value) -> Result<UploadResult> {
    match body.get("id").and_then(|v| v.as_str()) {
        Some(id) => {
            let title = body
                .pointer("/snippet/title")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            info!(publish_id = id, "upload session completed");
            Ok(UploadResult {
                publish_id: id.to_string(),
                title,
            })
        }
        None => Err(TransferError::Protocol(format!(
            "terminal upload response carries no identifier: {body}"
        ))
        .into()),
    }
}

// ============================================================================
// Tests
// ============================================================================
