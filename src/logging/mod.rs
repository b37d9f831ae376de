//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - console output, plain or JSON
//! - configurable log levels, overridable with `RUST_LOG`
//! - optional JSON file logging with daily or hourly rotation
//!
//! Subject identifiers never appear in log events. Events carry
//! `subject_digest`, a short SHA-256 prefix, instead.
//!
//! # Example
//!
//! ```no_run
//! use cascade_erasure::logging::init_logging;
//! use cascade_erasure::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a cascade
///
/// # Example
///
/// ```no_run
/// use cascade_erasure::log_cascade_start;
/// use cascade_erasure::domain::{ErasureMode, ErasureRequest, RequestId, SubjectId};
///
/// let request = ErasureRequest::new(
///     SubjectId::new("user-42").unwrap(),
///     RequestId::new("req-1").unwrap(),
///     ErasureMode::Delete,
/// );
/// log_cascade_start!(&request);
/// ```
#[macro_export]
macro_rules! log_cascade_start {
    ($request:expr) => {
        tracing::info!(
            request_id = %$request.request_id,
            subject_digest = %$request.subject_id.digest(),
            mode = %$request.mode,
            dry_run = $request.dry_run,
            "Cascade initiated"
        );
    };
}

/// Log the end of a cascade
#[macro_export]
macro_rules! log_cascade_complete {
    ($request:expr, $result:expr) => {
        if $result.is_success() {
            tracing::info!(
                request_id = %$request.request_id,
                tables_processed = $result.tables_processed.len(),
                total_records_affected = $result.total_records_affected,
                duration_ms = $result.execution_time_ms,
                "Cascade completed"
            );
        } else {
            tracing::warn!(
                request_id = %$request.request_id,
                tables_processed = $result.tables_processed.len(),
                total_records_affected = $result.total_records_affected,
                duration_ms = $result.execution_time_ms,
                error_count = $result.errors.len(),
                "Cascade completed with errors; manual review required"
            );
        }
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use cascade_erasure::log_error_with_context;
/// use cascade_erasure::domain::ErasureError;
///
/// let error = ErasureError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
