//! Medialift Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `SourceItem`, `PublishedItem`, `ActionOutcome`, `AuditRecord`
//! - **Port definitions** - Traits for adapters: `IStoreProvider`, `IPublishProvider`, `IAuditSink`
//! - **Configuration** - Typed config with loading, validation and a builder
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! The `medialift-engine` crate orchestrates domain entities through the ports.

pub mod config;
pub mod domain;
pub mod ports;
