//! Chunk-level transfer DTOs
//!
//! Shared between the store download port and the publish upload port.
//! [`ChunkError`] is the transport-agnostic failure representation: adapters
//! translate their own error types (HTTP statuses, socket failures) into it,
//! and the engine decides retriability with a single classification function
//! instead of matching on transport exceptions.

/// Broad category of a failed chunk call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkErrorKind {
    /// The remote end answered with this HTTP status
    Http(u16),
    /// The request timed out before a response arrived
    Timeout,
    /// The connection could not be established or was dropped
    Connection,
    /// Anything else (malformed response body, local I/O, ...)
    Other,
}

/// A failed chunk request, carrying enough context for classification
/// and for a useful log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkError {
    pub kind: ChunkErrorKind,
    pub message: String,
}

impl ChunkError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ChunkErrorKind::Http(status),
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: ChunkErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            kind: ChunkErrorKind::Connection,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: ChunkErrorKind::Other,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ChunkErrorKind::Http(status) => write!(f, "http {}: {}", status, self.message),
            ChunkErrorKind::Timeout => write!(f, "timeout: {}", self.message),
            ChunkErrorKind::Connection => write!(f, "connection: {}", self.message),
            ChunkErrorKind::Other => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ChunkError {}

/// One successful read from a chunked download stream.
#[derive(Debug, Clone)]
pub struct ChunkRead {
    /// Bytes received in this chunk (may be empty on the final call)
    pub data: Vec<u8>,
    /// Total bytes confirmed so far, this chunk included
    pub bytes_confirmed: u64,
    /// Total size of the stream when the source reports one
    pub total: Option<u64>,
    /// True once the stream is exhausted
    pub done: bool,
}

/// Result of one upload chunk call.
///
/// A session keeps yielding `Progress` until the remote end produces a
/// terminal response. A terminal payload without an identifier field is a
/// protocol violation, decided by the engine rather than the adapter.
#[derive(Debug, Clone)]
pub enum ChunkStatus {
    /// No terminal response yet; fraction of bytes acknowledged so far
    Progress(f64),
    /// Terminal response body from the publish target
    Complete(serde_json::Value),
}
