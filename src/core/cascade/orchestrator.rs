//! Cascade orchestrator
//!
//! Runs one erasure request across the cascade order, strictly sequentially.
//! Per-entity failures are recorded and the loop moves on; an unreachable
//! store aborts the run with an error instead.

use super::result::{CascadeResult, CascadeState, EntityOutcome};
use crate::adapters::store::EntityStore;
use crate::core::anonymization::AnonymizationRegistry;
use crate::core::audit::{AuditEntry, AuditSink};
use crate::core::processors::processor_for;
use crate::core::schema::validation::into_result;
use crate::core::schema::{Applicability, CascadeOrder, EntityDescriptor, SchemaCatalog};
use crate::core::verification::{VerificationReport, Verifier};
use crate::domain::ids::EntityName;
use crate::domain::{ErasureError, ErasureRequest, Result};
use futures::stream::{self, StreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Erasure engine entry point
pub struct CascadeOrchestrator {
    store: Arc<dyn EntityStore>,
    catalog: SchemaCatalog,
    order: CascadeOrder,
    registry: Arc<AnonymizationRegistry>,
    audit: Arc<dyn AuditSink>,
    verifier: Verifier,
    max_concurrency: usize,
    force_dry_run: bool,
}

impl CascadeOrchestrator {
    /// Build an orchestrator, validating catalog, order and rules together
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`] listing every blocking problem:
    /// a subject-linked entity missing from the order, an order entry without
    /// a descriptor, a dependency ordered after its referenced entity, a
    /// subject field not declared PII, or a PII field without a rule.
    pub fn new(
        store: Arc<dyn EntityStore>,
        catalog: SchemaCatalog,
        order: CascadeOrder,
        registry: AnonymizationRegistry,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        let mut issues = order.validate_against(&catalog);
        issues.extend(registry.validate_against(&catalog));
        into_result(issues)?;

        tracing::debug!(
            backend = store.backend_name(),
            audit_sink = audit.sink_name(),
            entities = order.len(),
            "Cascade orchestrator ready"
        );

        Ok(Self {
            verifier: Verifier::new(store.clone()),
            store,
            catalog,
            order,
            registry: Arc::new(registry),
            audit,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            force_dry_run: false,
        })
    }

    /// Bound on requests processed at once by [`erase_many`](Self::erase_many)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Treat every request as a dry run
    pub fn with_forced_dry_run(mut self, force_dry_run: bool) -> Self {
        self.force_dry_run = force_dry_run;
        self
    }

    pub fn cascade_order(&self) -> &CascadeOrder {
        &self.order
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Run one erasure request
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned (the store is unreachable). Everything
    /// else ends up in [`CascadeResult::errors`].
    pub async fn erase(&self, request: &ErasureRequest) -> Result<CascadeResult> {
        let start = Instant::now();
        let request = self.effective(request);
        crate::log_cascade_start!(request);
        tracing::trace!(state = %CascadeState::Initiated, "Cascade state");

        if let Err(e) = self.store.ping().await {
            tracing::error!(request_id = %request.request_id, error = %e, "Store unreachable, cascade aborted");
            return Err(if e.is_fatal() {
                e
            } else {
                ErasureError::StoreUnavailable(e.to_string())
            });
        }

        let processor = processor_for(request.mode, self.store.clone(), self.registry.clone());
        let mut result = CascadeResult::new(self.order.to_strings());
        let mut processed: Vec<&EntityDescriptor> = Vec::new();

        for entity in self.order.iter() {
            let descriptor = match self.catalog.applicability(entity) {
                Applicability::Applicable(descriptor) => descriptor,
                Applicability::NoSubjectLink | Applicability::Undeclared => {
                    log_outcome(&request, entity, &EntityOutcome::Skipped);
                    continue;
                }
            };

            tracing::trace!(state = %CascadeState::Processing(entity.clone()), "Cascade state");

            let outcome = match processor.process(descriptor, &request).await {
                Ok(0) => EntityOutcome::Unaffected,
                Ok(records_affected) => {
                    result.record_processed(entity, records_affected);
                    processed.push(descriptor);

                    if !request.dry_run {
                        self.write_audit(&request, entity, records_affected, &mut result)
                            .await;
                    }
                    EntityOutcome::Success(records_affected)
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(
                        request_id = %request.request_id,
                        entity = %entity,
                        error = %e,
                        tables_processed = ?result.tables_processed,
                        "Fatal store error, cascade aborted; outcome unknown, safe to retry"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let message = format!("{entity}: {e}");
                    result.record_error(message.clone());
                    EntityOutcome::ErrorRecorded(message)
                }
            };

            log_outcome(&request, entity, &outcome);
        }

        if !request.dry_run && !processed.is_empty() {
            tracing::trace!(state = %CascadeState::Verifying, "Cascade state");
            let report = self.verifier.verify(processed, &request).await?;
            result.errors.extend(report.error_messages());
        }

        result.execution_time_ms = start.elapsed().as_millis() as u64;
        tracing::trace!(state = %result.final_state(), "Cascade state");
        crate::log_cascade_complete!(request, result);

        Ok(result)
    }

    /// Run independent requests concurrently
    ///
    /// Each request's own cascade stays sequential. Results come back in
    /// input order, one per request.
    pub async fn erase_many(&self, requests: Vec<ErasureRequest>) -> Vec<Result<CascadeResult>> {
        tracing::info!(
            requests = requests.len(),
            max_concurrency = self.max_concurrency,
            "Starting batch erasure"
        );

        stream::iter(requests)
            .map(|request| async move { self.erase(&request).await })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Check for residual rows without erasing anything
    ///
    /// Covers every applicable entity in the cascade order, or only those in
    /// `entities` when given.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`] for an entity outside the
    /// catalog's subject-linked entities, or a fatal store error.
    pub async fn verify(
        &self,
        request: &ErasureRequest,
        entities: Option<&[EntityName]>,
    ) -> Result<VerificationReport> {
        let mut descriptors = Vec::new();

        match entities {
            Some(names) => {
                for name in names {
                    match self.catalog.applicability(name) {
                        Applicability::Applicable(descriptor) => descriptors.push(descriptor),
                        Applicability::NoSubjectLink | Applicability::Undeclared => {
                            return Err(ErasureError::Validation(format!(
                                "entity '{name}' has no subject-linked descriptor"
                            )));
                        }
                    }
                }
            }
            None => {
                for name in self.order.iter() {
                    if let Applicability::Applicable(descriptor) = self.catalog.applicability(name) {
                        descriptors.push(descriptor);
                    }
                }
            }
        }

        self.store.ping().await?;
        self.verifier.verify(descriptors, request).await
    }

    fn effective<'a>(&self, request: &'a ErasureRequest) -> Cow<'a, ErasureRequest> {
        if self.force_dry_run && !request.dry_run {
            Cow::Owned(request.clone().with_dry_run(true))
        } else {
            Cow::Borrowed(request)
        }
    }

    async fn write_audit(
        &self,
        request: &ErasureRequest,
        entity: &EntityName,
        records_affected: u64,
        result: &mut CascadeResult,
    ) {
        let entry = AuditEntry::new(
            request.request_id.clone(),
            entity.clone(),
            records_affected,
            request.subject_id.clone(),
            request.mode,
        );

        if let Err(e) = self.audit.append(&entry).await {
            tracing::error!(
                request_id = %request.request_id,
                entity = %entity,
                error = %e,
                "Audit write failed after mutation"
            );
            result.record_error(format!("{entity}: audit entry not written: {e}"));
        }
    }
}

fn log_outcome(request: &ErasureRequest, entity: &EntityName, outcome: &EntityOutcome) {
    match outcome {
        EntityOutcome::Success(records_affected) => tracing::info!(
            request_id = %request.request_id,
            entity = %entity,
            records_affected,
            dry_run = request.dry_run,
            "Entity processed"
        ),
        EntityOutcome::Unaffected => tracing::debug!(
            request_id = %request.request_id,
            entity = %entity,
            "No rows for subject"
        ),
        EntityOutcome::Skipped => tracing::debug!(
            request_id = %request.request_id,
            entity = %entity,
            "Entity has no subject link, skipped"
        ),
        EntityOutcome::ErrorRecorded(message) => tracing::warn!(
            request_id = %request.request_id,
            entity = %entity,
            error = %message,
            "Entity failed, continuing cascade"
        ),
    }
}
