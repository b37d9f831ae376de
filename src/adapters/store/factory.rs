//! Store and audit sink factories
//!
//! Build the configured backends. The PostgreSQL audit sink shares the
//! entity store's connection pool.

use crate::adapters::postgresql::{PostgresAuditLog, PostgresClient, PostgresStore};
use crate::config::schema::{AuditSinkKind, ErasureConfig};
use crate::core::audit::{AuditSink, JsonFileAuditLog};
use crate::domain::Result;
use std::sync::Arc;

/// Create the PostgreSQL entity store
///
/// # Errors
///
/// Returns an error if the connection pool cannot be configured.
pub async fn create_entity_store(config: &ErasureConfig) -> Result<Arc<PostgresStore>> {
    let client = PostgresClient::new(&config.store).await?;
    tracing::info!(
        database = %client.connection_string_safe(),
        max_connections = config.store.max_connections,
        "Creating PostgreSQL entity store"
    );
    Ok(Arc::new(PostgresStore::new(Arc::new(client))))
}

/// Create the configured audit sink
///
/// For the `postgresql` sink the audit table is created if missing, which
/// needs a reachable database.
///
/// # Errors
///
/// Returns an error if the sink cannot be prepared.
pub async fn create_audit_sink(
    config: &ErasureConfig,
    store: &PostgresStore,
) -> Result<Arc<dyn AuditSink>> {
    match config.audit.sink {
        AuditSinkKind::PostgreSQL => {
            tracing::info!(table = %config.audit.table, "Creating PostgreSQL audit sink");
            let sink = PostgresAuditLog::new(store.client().clone(), config.audit.table.clone());
            sink.ensure_table().await?;
            Ok(Arc::new(sink))
        }
        AuditSinkKind::File => {
            tracing::info!(path = %config.audit.log_path.display(), "Creating file audit sink");
            Ok(Arc::new(JsonFileAuditLog::new(config.audit.log_path.clone())?))
        }
    }
}
