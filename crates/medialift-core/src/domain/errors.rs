//! Domain error types
//!
//! Two error families cross component boundaries: configuration errors,
//! which are fatal and abort before any work starts, and transfer errors,
//! which abort a single item while the batch continues. Disposition and
//! audit failures never become errors at all; they are downgraded to
//! descriptive strings at their own boundary.

use thiserror::Error;

/// Fatal configuration problems, raised before any item is processed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("required setting is not set: {0}")]
    MissingSetting(&'static str),

    /// A setting is present but unusable
    #[error("invalid setting {field}: {message}")]
    Invalid {
        /// Dotted path of the offending field
        field: String,
        /// Human-readable explanation
        message: String,
    },
}

/// Failures that terminate a single transfer session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// A chunk request failed non-retriably
    #[error("network failure during transfer: {0}")]
    Network(String),

    /// The remote end answered outside the protocol (e.g. a terminal
    /// upload response with no identifier)
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The retry ceiling was reached on a transient failure
    #[error("retry limit exceeded after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// The batch was cancelled between chunk calls
    #[error("transfer cancelled")]
    Cancelled,
}
