use super::{subject_filter, TableProcessor};
use crate::adapters::store::filter::ANONYMIZED_AT_FIELD;
use crate::adapters::store::EntityStore;
use crate::core::anonymization::AnonymizationRegistry;
use crate::core::schema::EntityDescriptor;
use crate::domain::{ErasureMode, ErasureRequest, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Overwrites the subject's PII fields using the entity's anonymization rule
pub struct AnonymizeProcessor {
    store: Arc<dyn EntityStore>,
    registry: Arc<AnonymizationRegistry>,
}

impl AnonymizeProcessor {
    pub fn new(store: Arc<dyn EntityStore>, registry: Arc<AnonymizationRegistry>) -> Self {
        Self { store, registry }
    }
}

#[async_trait]
impl TableProcessor for AnonymizeProcessor {
    fn mode(&self) -> ErasureMode {
        ErasureMode::Anonymize
    }

    async fn process(&self, descriptor: &EntityDescriptor, request: &ErasureRequest) -> Result<u64> {
        let filter = subject_filter(descriptor, request)?;

        // Resolve the rule before counting so a dry run surfaces a missing rule too
        let mut assignments = self
            .registry
            .assignments_for(descriptor, &request.subject_id)?;

        if request.dry_run {
            return self.store.count(&filter).await;
        }

        assignments.insert(
            ANONYMIZED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        self.store.update(&filter, &assignments).await
    }
}
