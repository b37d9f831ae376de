//! Table processors, one per erasure mode
//!
//! A processor applies its mode to the rows of a single entity that belong to
//! the request's subject and reports the exact number of rows affected. In a
//! dry run every processor only counts.

mod anonymize;
mod delete;
mod tombstone;

pub use anonymize::AnonymizeProcessor;
pub use delete::HardDeleteProcessor;
pub use tombstone::{TombstoneProcessor, TOMBSTONE_ACTOR};

use crate::adapters::store::{EntityStore, SubjectFilter};
use crate::core::anonymization::AnonymizationRegistry;
use crate::core::schema::EntityDescriptor;
use crate::domain::{ErasureError, ErasureMode, ErasureRequest, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Mode strategy applied to one entity
#[async_trait]
pub trait TableProcessor: Send + Sync {
    /// Mode implemented by this processor
    fn mode(&self) -> ErasureMode;

    /// Apply the mode to the subject's rows of one entity
    ///
    /// # Returns
    ///
    /// Rows affected, or rows that would be affected in a dry run.
    async fn process(&self, descriptor: &EntityDescriptor, request: &ErasureRequest) -> Result<u64>;
}

/// Select the processor for a mode
pub fn processor_for(
    mode: ErasureMode,
    store: Arc<dyn EntityStore>,
    registry: Arc<AnonymizationRegistry>,
) -> Box<dyn TableProcessor> {
    match mode {
        ErasureMode::Delete => Box::new(HardDeleteProcessor::new(store)),
        ErasureMode::Anonymize => Box::new(AnonymizeProcessor::new(store, registry)),
        ErasureMode::Tombstone => Box::new(TombstoneProcessor::new(store)),
    }
}

/// Filter over every row of the entity linked to the request's subject
pub(crate) fn subject_filter(
    descriptor: &EntityDescriptor,
    request: &ErasureRequest,
) -> Result<SubjectFilter> {
    let field = descriptor.subject_field().ok_or_else(|| {
        ErasureError::Validation(format!(
            "entity '{}' has no subject field",
            descriptor.name()
        ))
    })?;

    Ok(SubjectFilter::new(
        descriptor.name().clone(),
        field,
        request.subject_id.clone(),
    ))
}
