//! Port definitions (driven/secondary ports)
//!
//! Trait interfaces implemented by adapter crates. Error values at port
//! boundaries use `anyhow::Result`, except chunk-level calls, which return
//! the typed [`transfer::ChunkError`] so the engine's retry policy can
//! classify failures without knowing the transport.

pub mod audit_sink;
pub mod publish_provider;
pub mod store_provider;
pub mod transfer;

pub use audit_sink::IAuditSink;
pub use publish_provider::{CatalogPage, IPublishProvider, IUploadSession, UploadMetadata};
pub use store_provider::{IMediaDownload, IStoreProvider, MetadataPatch, NodePage, StoreNode};
pub use transfer::{ChunkError, ChunkErrorKind, ChunkRead, ChunkStatus};
