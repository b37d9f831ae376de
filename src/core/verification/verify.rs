//! Residual-row verification
//!
//! After a non-dry run, every processed entity is re-counted with a
//! mode-dependent filter:
//! - delete and anonymize expect no row to match the subject at all;
//! - tombstone keeps the rows, so it expects no row to match the subject
//!   without carrying the tombstone flag.

use crate::adapters::store::{EntityStore, SubjectFilter};
use crate::core::processors::subject_filter;
use crate::core::schema::EntityDescriptor;
use crate::core::verification::report::{VerificationFinding, VerificationReport};
use crate::domain::{ErasureMode, ErasureRequest, Result};
use std::sync::Arc;
use std::time::Instant;

/// Read-only residual checker
pub struct Verifier {
    store: Arc<dyn EntityStore>,
}

impl Verifier {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Filter selecting rows that should no longer exist after `mode`
    pub fn residual_filter(
        descriptor: &EntityDescriptor,
        request: &ErasureRequest,
    ) -> Result<SubjectFilter> {
        let filter = subject_filter(descriptor, request)?;
        Ok(match request.mode {
            ErasureMode::Delete | ErasureMode::Anonymize => filter,
            ErasureMode::Tombstone => filter.live_only(),
        })
    }

    /// Verify the given entities for one request
    ///
    /// Per-entity count failures become findings. A fatal store error is
    /// returned as-is.
    pub async fn verify<'a, I>(&self, descriptors: I, request: &ErasureRequest) -> Result<VerificationReport>
    where
        I: IntoIterator<Item = &'a EntityDescriptor>,
    {
        let start = Instant::now();
        let mut report = VerificationReport::new(request.mode);

        for descriptor in descriptors {
            let residual = match Self::residual_filter(descriptor, request) {
                Ok(filter) => self.store.count(&filter).await,
                Err(e) => Err(e),
            };

            match residual {
                Ok(0) => report.record_pass(),
                Ok(residual_rows) => {
                    tracing::warn!(
                        entity = %descriptor.name(),
                        mode = %request.mode,
                        residual_rows,
                        "Residual rows found during verification"
                    );
                    report.record_failure(VerificationFinding {
                        entity: descriptor.name().clone(),
                        mode: request.mode,
                        residual_rows,
                        error: None,
                    });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        entity = %descriptor.name(),
                        error = %e,
                        "Verification count failed"
                    );
                    report.record_failure(VerificationFinding {
                        entity: descriptor.name().clone(),
                        mode: request.mode,
                        residual_rows: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        report.set_duration(start.elapsed().as_millis() as u64);

        tracing::debug!(
            mode = %request.mode,
            verified = report.total_verified,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Verification completed"
        );

        Ok(report)
    }
}
