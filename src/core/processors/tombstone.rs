use super::{subject_filter, TableProcessor};
use crate::adapters::store::filter::{
    DELETED_AT_FIELD, DELETED_BY_FIELD, DELETED_FLAG_FIELD, DELETION_REQUEST_FIELD,
};
use crate::adapters::store::{EntityStore, FieldAssignments};
use crate::core::schema::EntityDescriptor;
use crate::domain::{ErasureMode, ErasureRequest, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Value written to the `deleted_by` column
pub const TOMBSTONE_ACTOR: &str = "cascade_erasure";

/// Flags the subject's rows as logically deleted, keeping row and payload
///
/// Only rows not yet tombstoned are touched, so a re-run keeps the original
/// deletion timestamp and request id and reports zero rows.
pub struct TombstoneProcessor {
    store: Arc<dyn EntityStore>,
}

impl TombstoneProcessor {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    fn assignments(request: &ErasureRequest) -> FieldAssignments {
        let mut assignments = FieldAssignments::new();
        assignments.insert(DELETED_FLAG_FIELD.to_string(), Value::Bool(true));
        assignments.insert(
            DELETED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        assignments.insert(
            DELETED_BY_FIELD.to_string(),
            Value::String(TOMBSTONE_ACTOR.to_string()),
        );
        assignments.insert(
            DELETION_REQUEST_FIELD.to_string(),
            Value::String(request.request_id.to_string()),
        );
        assignments
    }
}

#[async_trait]
impl TableProcessor for TombstoneProcessor {
    fn mode(&self) -> ErasureMode {
        ErasureMode::Tombstone
    }

    async fn process(&self, descriptor: &EntityDescriptor, request: &ErasureRequest) -> Result<u64> {
        let filter = subject_filter(descriptor, request)?.live_only();

        if request.dry_run {
            return self.store.count(&filter).await;
        }

        self.store
            .update(&filter, &Self::assignments(request))
            .await
    }
}
