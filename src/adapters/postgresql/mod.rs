//! PostgreSQL integration
//!
//! Pooled `tokio-postgres` access to the tables holding subject data, plus
//! an audit table sink in the same database.

pub mod audit;
pub mod client;
pub mod store;

pub use audit::PostgresAuditLog;
pub use client::PostgresClient;
pub use store::PostgresStore;
