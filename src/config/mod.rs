//! Configuration management.
//!
//! TOML-based configuration loading, parsing and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ERASURE_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load, plus cross-entity validation when the catalog is built
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cascade_erasure::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("erasure.toml")?;
//! let built = config.build_catalog()?;
//!
//! println!("Cascade order: {:?}", built.order.to_strings());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and forced dry-run
//! - [`StoreConfig`] - PostgreSQL connection and pool settings
//! - [`AuditConfig`] - Audit sink selection
//! - [`CascadeConfig`] - Cascade order and batch concurrency
//! - [`EntityConfig`] - Entity descriptors and anonymization rules
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [store]
//! connection_string = "${ERASURE_DATABASE_URL}"
//!
//! [cascade]
//! order = ["crawl_results", "templates", "jobs"]
//!
//! [[entities]]
//! name = "crawl_results"
//! subject_field = "user_id"
//! pii_fields = ["user_id", "page_title"]
//! references = ["jobs"]
//!
//! [entities.rules]
//! user_id = { kind = "hash" }
//! page_title = { kind = "redact" }
//! ```

pub mod catalog;
pub mod loader;
pub mod schema;
pub mod secret;

pub use catalog::ErasureCatalog;
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AuditConfig, AuditSinkKind, CascadeConfig, EntityConfig, ErasureConfig,
    LoggingConfig, StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
