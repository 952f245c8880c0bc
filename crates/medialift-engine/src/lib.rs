//! Medialift Engine - reconciliation and resumable transfers
//!
//! The engine turns the core ports into a working pipeline:
//! - [`reconcile`] - walks the source store and diffs it against the
//!   publish catalog to produce the work list
//! - [`transfer`] - chunked, resumable, retrying download/upload driver
//! - [`actions`] - post-upload disposition of the source file
//! - [`audit`] - best-effort append-only audit trail
//! - [`batch`] - per-item orchestration with failure isolation

pub mod actions;
pub mod audit;
pub mod batch;
pub mod reconcile;
pub mod transfer;
