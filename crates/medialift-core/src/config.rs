//! Configuration module for medialift.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for one batch invocation.
///
/// Every section is optional in the file; omitted sections take their
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root folder of the tree to scan. Required; a missing value aborts
    /// the batch before any work starts.
    pub root_folder_id: Option<String>,
    /// Whether to resolve taxonomy labels into upload tags.
    pub fetch_labels: bool,
    /// Destination container for the `move` post-upload action.
    pub completed_folder_id: Option<String>,
}

/// Publish target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Channel to reconcile against. `None` means the authenticated
    /// user's own channel.
    pub channel_id: Option<String>,
    /// Fallback description for items without one of their own.
    pub default_description: String,
    /// Disposition applied to the source after a successful upload:
    /// `rename`, `delete` or `move`. Not validated here; unrecognized
    /// values degrade to a logged `unknown` outcome at execution time.
    pub post_upload_action: String,
}

/// Chunked transfer and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Size of each transfer chunk (in MiB).
    pub chunk_size_mb: u64,
    /// Retry ceiling for transient chunk failures.
    pub max_retries: u32,
    /// Exponential backoff base: the n-th retry sleeps `base^n` seconds
    /// plus a sub-second jitter.
    pub backoff_base_secs: u64,
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of items processed at once. 1 preserves audit-log ordering;
    /// values up to 8 trade ordering for throughput.
    pub concurrency: usize,
}

/// Audit log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Spreadsheet-like sink to append audit rows to. `None` disables the
    /// audit trail (a warning is logged once per batch).
    pub spreadsheet_id: Option<String>,
    /// Tab the audit rows are appended to.
    pub tab_name: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/medialift/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("medialift")
            .join("config.yaml")
    }

    /// The root folder id, or the fatal error that aborts the batch.
    pub fn require_root_folder(&self) -> Result<&str, ConfigError> {
        self.source
            .root_folder_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingSetting("source.root_folder_id"))
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

// Config and SourceConfig derive Default (options default to None,
// fetch_labels to false).

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            default_description: String::new(),
            post_upload_action: "rename".to_string(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size_mb: 10,
            max_retries: 10,
            backoff_base_secs: 2,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            tab_name: "Logs".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"transfer.chunk_size_mb"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `batch.concurrency`; upstream rate limits make larger
/// pools counterproductive.
const MAX_CONCURRENCY: usize = 8;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. Note that a
    /// missing `source.root_folder_id` is reported here too, but it is the
    /// batch entry point that turns it into a fatal [`ConfigError`].
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- source ---
        if matches!(self.source.root_folder_id.as_deref(), None | Some("")) {
            errors.push(ValidationError {
                field: "source.root_folder_id".into(),
                message: "must be set".into(),
            });
        }

        // --- transfer ---
        if self.transfer.chunk_size_mb == 0 {
            errors.push(ValidationError {
                field: "transfer.chunk_size_mb".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.transfer.backoff_base_secs == 0 {
            errors.push(ValidationError {
                field: "transfer.backoff_base_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- batch ---
        if self.batch.concurrency == 0 || self.batch.concurrency > MAX_CONCURRENCY {
            errors.push(ValidationError {
                field: "batch.concurrency".into(),
                message: format!("must be in range 1..={MAX_CONCURRENCY}"),
            });
        }

        // --- audit ---
        if self.audit.tab_name.is_empty() {
            errors.push(ValidationError {
                field: "audit.tab_name".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use medialift_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .source_root_folder_id("folder-abc")
///     .publish_post_upload_action("move")
///     .source_completed_folder_id("folder-done")
///     .build();
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- source ---

    pub fn source_root_folder_id(mut self, id: impl Into<String>) -> Self {
        self.config.source.root_folder_id = Some(id.into());
        self
    }

    pub fn source_fetch_labels(mut self, fetch: bool) -> Self {
        self.config.source.fetch_labels = fetch;
        self
    }

    pub fn source_completed_folder_id(mut self, id: impl Into<String>) -> Self {
        self.config.source.completed_folder_id = Some(id.into());
        self
    }

    // --- publish ---

    pub fn publish_channel_id(mut self, id: impl Into<String>) -> Self {
        self.config.publish.channel_id = Some(id.into());
        self
    }

    pub fn publish_default_description(mut self, description: impl Into<String>) -> Self {
        self.config.publish.default_description = description.into();
        self
    }

    pub fn publish_post_upload_action(mut self, action: impl Into<String>) -> Self {
        self.config.publish.post_upload_action = action.into();
        self
    }

    // --- transfer ---

    pub fn transfer_chunk_size_mb(mut self, mb: u64) -> Self {
        self.config.transfer.chunk_size_mb = mb;
        self
    }

    pub fn transfer_max_retries(mut self, retries: u32) -> Self {
        self.config.transfer.max_retries = retries;
        self
    }

    pub fn transfer_backoff_base_secs(mut self, secs: u64) -> Self {
        self.config.transfer.backoff_base_secs = secs;
        self
    }

    // --- batch ---

    pub fn batch_concurrency(mut self, concurrency: usize) -> Self {
        self.config.batch.concurrency = concurrency;
        self
    }

    // --- audit ---

    pub fn audit_spreadsheet_id(mut self, id: impl Into<String>) -> Self {
        self.config.audit.spreadsheet_id = Some(id.into());
        self
    }

    pub fn audit_tab_name(mut self, name: impl Into<String>) -> Self {
        self.config.audit.tab_name = name.into();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
