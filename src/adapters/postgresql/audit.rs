//! Audit sink appending to a PostgreSQL table

use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::postgresql::store::quote_ident;
use crate::core::audit::{AuditEntry, AuditSink};
use crate::domain::{ErasureError, Result};
use async_trait::async_trait;
use std::sync::Arc;

const DEFAULT_TABLE: &str = "erasure_audit_log";
const MIGRATION: &str = include_str!("../../../migrations/001_audit_log.sql");

/// Insert-only audit table
pub struct PostgresAuditLog {
    client: Arc<PostgresClient>,
    table: String,
    insert_sql: String,
}

impl PostgresAuditLog {
    /// Create a sink writing to `table`
    pub fn new(client: Arc<PostgresClient>, table: impl Into<String>) -> Self {
        let table = table.into();
        let insert_sql = insert_sql(&table);
        Self {
            client,
            table,
            insert_sql,
        }
    }

    /// Create the audit table and its indexes if missing
    pub async fn ensure_table(&self) -> Result<()> {
        let script = migration_for(&self.table);
        self.client
            .batch_execute(&script)
            .await
            .map_err(|e| ErasureError::Audit(format!("Failed to create audit table '{}': {e}", self.table)))?;

        tracing::info!(table = %self.table, "Audit table ready");
        Ok(())
    }
}

fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {} (request_id, entity_name, records_affected, subject_id, mode, completed_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
        quote_ident(table)
    )
}

/// Migration script with the configured table name
///
/// Table and index names are quoted the same way as in [`insert_sql`], so a
/// mixed-case name is not folded to lower case on creation.
fn migration_for(table: &str) -> String {
    let index = |suffix: &str| {
        (
            format!("{DEFAULT_TABLE}_{suffix}"),
            quote_ident(&format!("{table}_{suffix}")),
        )
    };
    let (request_idx, quoted_request_idx) = index("request_idx");
    let (subject_idx, quoted_subject_idx) = index("subject_idx");

    MIGRATION
        .replace(&request_idx, &quoted_request_idx)
        .replace(&subject_idx, &quoted_subject_idx)
        .replace(
            &format!("{DEFAULT_TABLE} ("),
            &format!("{} (", quote_ident(table)),
        )
}

#[async_trait]
impl AuditSink for PostgresAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let records_affected = i64::try_from(entry.records_affected).unwrap_or(i64::MAX);

        self.client
            .execute(
                &self.table,
                &self.insert_sql,
                &[
                    &entry.request_id.as_str(),
                    &entry.entity_name.as_str(),
                    &records_affected,
                    &entry.subject_id.as_str(),
                    &entry.mode.as_str(),
                    &entry.completed_at,
                ],
            )
            .await
            .map_err(|e| ErasureError::Audit(format!("Failed to append audit entry: {e}")))?;

        Ok(())
    }

    fn sink_name(&self) -> &str {
        "postgresql"
    }
}
