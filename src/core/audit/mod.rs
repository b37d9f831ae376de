//! Audit trail for erasure runs
//!
//! One [`AuditEntry`] is appended per entity with a nonzero effect. Sinks are
//! append-only and separate from the entities being erased. Nothing is
//! written during dry runs.

mod file;

pub use file::JsonFileAuditLog;

use crate::domain::ids::{EntityName, RequestId, SubjectId};
use crate::domain::{ErasureMode, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one entity erased for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub request_id: RequestId,
    pub entity_name: EntityName,
    pub records_affected: u64,
    /// Raw subject identifier; audit readers need it to prove erasure
    pub subject_id: SubjectId,
    pub mode: ErasureMode,
    pub completed_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Entry stamped with the current time
    pub fn new(
        request_id: RequestId,
        entity_name: EntityName,
        records_affected: u64,
        subject_id: SubjectId,
        mode: ErasureMode,
    ) -> Self {
        Self {
            request_id,
            entity_name,
            records_affected,
            subject_id,
            mode,
            completed_at: Utc::now(),
        }
    }
}

/// Append-only audit destination
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one entry
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Audit`](crate::domain::ErasureError::Audit) if
    /// the entry could not be persisted.
    async fn append(&self, entry: &AuditEntry) -> Result<()>;

    /// Short sink name for logs
    fn sink_name(&self) -> &str;
}
