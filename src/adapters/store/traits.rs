//! Relational store abstraction traits
//!
//! The erasure engine only ever needs three filtered operations per entity,
//! plus a liveness probe. Schema management, pooling and transactions stay
//! inside the implementation.

use super::filter::{FieldAssignments, SubjectFilter};
use crate::domain::Result;
use async_trait::async_trait;

/// Generic per-entity store interface
///
/// Implementations must report exact affected-row counts and must never
/// touch rows outside the filter. Errors are returned as
/// [`ErasureError::Store`](crate::domain::ErasureError::Store); a
/// [`StoreError::Unavailable`](crate::domain::StoreError::Unavailable) marks
/// the store as unreachable and aborts a cascade.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Check that the store is reachable
    ///
    /// # Errors
    ///
    /// Returns a fatal error if no connection can be made.
    async fn ping(&self) -> Result<()>;

    /// Count rows matching the filter (read-only)
    async fn count(&self, filter: &SubjectFilter) -> Result<u64>;

    /// Overwrite the given fields on every row matching the filter
    ///
    /// # Returns
    ///
    /// The number of rows updated.
    async fn update(&self, filter: &SubjectFilter, assignments: &FieldAssignments) -> Result<u64>;

    /// Delete every row matching the filter
    ///
    /// # Returns
    ///
    /// The number of rows deleted.
    async fn delete(&self, filter: &SubjectFilter) -> Result<u64>;

    /// Short backend name for logs
    fn backend_name(&self) -> &str;
}
