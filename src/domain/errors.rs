//! Domain error types
//!
//! This module defines the error hierarchy for the erasure engine.
//! Errors are domain-specific and don't expose third-party driver types.

use thiserror::Error;

/// Main erasure error type
///
/// Every fallible operation in the library returns this type. Errors raised
/// while processing a single entity are normally folded into the
/// `CascadeResult::errors` list by the orchestrator; only the variants for which
/// [`ErasureError::is_fatal`] returns `true` abort a cascade.
#[derive(Debug, Error)]
pub enum ErasureError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Startup validation errors (catalog, cascade order, anonymization rules)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Relational store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The store could not be reached at all; no partial progress can be trusted
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A PII field has no anonymization rule registered for its entity
    #[error("No anonymization rule for field '{field}' of entity '{entity}'")]
    MissingAnonymizationRule { entity: String, field: String },

    /// Audit sink errors
    #[error("Audit log error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ErasureError {
    /// Whether this error invalidates every step of the cascade and must be
    /// propagated to the caller instead of being recorded per entity.
    pub fn is_fatal(&self) -> bool {
        match self {
            ErasureError::StoreUnavailable(_) => true,
            ErasureError::Store(store_err) => store_err.is_fatal(),
            _ => false,
        }
    }
}

/// Relational store errors
///
/// Raised by [`EntityStore`](crate::adapters::store::EntityStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or pool failure; the whole store is unreachable
    #[error("Store unreachable: {0}")]
    Unavailable(String),

    /// The entity (table) is not known to the store
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// A filtered count/update/delete failed
    #[error("Query failed on '{entity}': {message}")]
    QueryFailed { entity: String, message: String },

    /// A replacement value could not be written
    #[error("Invalid value for '{entity}.{field}': {message}")]
    InvalidValue {
        entity: String,
        field: String,
        message: String,
    },
}

impl StoreError {
    /// Whether the error means the store as a whole cannot be trusted
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ErasureError {
    fn from(err: std::io::Error) -> Self {
        ErasureError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ErasureError {
    fn from(err: serde_json::Error) -> Self {
        ErasureError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ErasureError {
    fn from(err: toml::de::Error) -> Self {
        ErasureError::Configuration(format!("TOML parse error: {err}"))
    }
}
