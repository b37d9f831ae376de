//! Core erasure logic.
//!
//! # Modules
//!
//! - [`schema`] - Entity descriptors, cascade order and startup validation
//! - [`anonymization`] - Per-entity replacement rules for PII fields
//! - [`processors`] - One table processor per erasure mode
//! - [`audit`] - Append-only audit entries and sinks
//! - [`verification`] - Mode-aware residual-row checks
//! - [`cascade`] - The orchestrator tying it all together
//!
//! # Erasure Workflow
//!
//! 1. **Validate**: catalog, order and rules are cross-checked when the orchestrator is built
//! 2. **Ping**: an unreachable store aborts before anything is touched
//! 3. **Process**: each entity in cascade order is checked for applicability and
//!    handed to the mode's processor; failures are recorded and the loop continues
//! 4. **Audit**: every entity with a nonzero effect gets an audit entry
//! 5. **Verify**: processed entities are re-counted for residual rows
//!
//! Dry runs stop after step 3 and only count.
//!
//! # Example
//!
//! ```rust
//! use cascade_erasure::adapters::memory::{InMemoryStore, MemoryAuditLog};
//! use cascade_erasure::core::anonymization::AnonymizationRegistry;
//! use cascade_erasure::core::cascade::CascadeOrchestrator;
//! use cascade_erasure::core::schema::{CascadeOrder, EntityDescriptor, SchemaCatalog};
//! use cascade_erasure::domain::{EntityName, ErasureMode, ErasureRequest, RequestId, SubjectId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! store.insert("jobs", serde_json::json!({"user_id": "user-42"})).await?;
//!
//! let jobs = EntityName::new("jobs")?;
//! let catalog = SchemaCatalog::new([EntityDescriptor::linked(jobs.clone(), "user_id", ["user_id"])?])?;
//! let order = CascadeOrder::new([jobs])?;
//!
//! // Every PII field needs a rule, whatever the mode
//! let registry = AnonymizationRegistry::new().with_rule(
//!     EntityName::new("jobs")?,
//!     cascade_erasure::core::anonymization::AnonymizationRule::new()
//!         .with_field("user_id", cascade_erasure::core::anonymization::Replacement::Hash),
//! );
//!
//! let orchestrator = CascadeOrchestrator::new(
//!     store,
//!     catalog,
//!     order,
//!     registry,
//!     Arc::new(MemoryAuditLog::new()),
//! )?;
//!
//! let request = ErasureRequest::new(SubjectId::new("user-42")?, RequestId::generate(), ErasureMode::Delete);
//! let result = orchestrator.erase(&request).await?;
//! assert_eq!(result.total_records_affected, 1);
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```

pub mod anonymization;
pub mod audit;
pub mod cascade;
pub mod processors;
pub mod schema;
pub mod verification;
