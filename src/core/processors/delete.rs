use super::{subject_filter, TableProcessor};
use crate::adapters::store::EntityStore;
use crate::core::schema::EntityDescriptor;
use crate::domain::{ErasureMode, ErasureRequest, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Removes the subject's rows
pub struct HardDeleteProcessor {
    store: Arc<dyn EntityStore>,
}

impl HardDeleteProcessor {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TableProcessor for HardDeleteProcessor {
    fn mode(&self) -> ErasureMode {
        ErasureMode::Delete
    }

    async fn process(&self, descriptor: &EntityDescriptor, request: &ErasureRequest) -> Result<u64> {
        let filter = subject_filter(descriptor, request)?;

        if request.dry_run {
            return self.store.count(&filter).await;
        }

        self.store.delete(&filter).await
    }
}
