// Cascade Erasure - Data-subject erasure across relational stores
// Copyright (c) 2025 Cascade Erasure Contributors
// Licensed under the MIT License

//! # Cascade Erasure
//!
//! Erases one data subject's rows across a set of interdependent entities in
//! a relational store. Three modes are supported: anonymize, delete and
//! tombstone.
//!
//! ## Overview
//!
//! - **Ordered**: entities are processed most-dependent first, so a
//!   referenced row is never erased before the rows pointing at it
//! - **Isolated**: a failure on one entity is recorded and the cascade moves on
//! - **Idempotent**: re-running a request converges on the same state
//! - **Audited**: every mutation leaves an append-only audit entry
//! - **Verified**: processed entities are re-checked for residual rows
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Schema catalog, processors, orchestration, audit and verification
//! - [`adapters`] - Store backends (PostgreSQL, in-memory)
//! - [`domain`] - Identifiers, requests and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cascade_erasure::adapters::store::{create_audit_sink, create_entity_store};
//! use cascade_erasure::config::load_config;
//! use cascade_erasure::core::cascade::CascadeOrchestrator;
//! use cascade_erasure::domain::{ErasureMode, ErasureRequest, RequestId, SubjectId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("erasure.toml")?;
//!     let built = config.build_catalog()?;
//!
//!     let store = create_entity_store(&config).await?;
//!     let audit = create_audit_sink(&config, &store).await?;
//!     let orchestrator =
//!         CascadeOrchestrator::new(store, built.catalog, built.order, built.registry, audit)?;
//!
//!     let request = ErasureRequest::new(
//!         SubjectId::new("user-42")?,
//!         RequestId::new("privacy-req-1001")?,
//!         ErasureMode::Anonymize,
//!     );
//!     let result = orchestrator.erase(&request).await?;
//!
//!     println!("Affected {} rows in {:?}", result.total_records_affected, result.tables_processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`]. Only an unreachable store
//! makes [`CascadeOrchestrator::erase`](core::cascade::CascadeOrchestrator::erase)
//! return an error; everything else is collected in
//! [`CascadeResult::errors`](core::cascade::CascadeResult::errors), and a
//! non-empty list means the request needs manual review.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
