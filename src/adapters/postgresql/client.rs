//! PostgreSQL client
//!
//! Connection pooling and statement execution shared by the entity store and
//! the audit table sink.

use crate::config::schema::StoreConfig;
use crate::domain::{ErasureError, Result, StoreError};
use deadpool_postgres::{
    Manager, ManagerConfig, Object, Pool, PoolError, RecyclingMethod, Runtime,
};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// Pooled PostgreSQL client
pub struct PostgresClient {
    pool: Pool,
    statement_timeout_ms: u64,
    safe_connection_string: String,
}

impl PostgresClient {
    /// Build the connection pool
    ///
    /// Connections are opened lazily; use [`ping`](Self::ping) to check reachability.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Configuration`] if the connection string cannot be parsed.
    pub async fn new(config: &StoreConfig) -> Result<Self> {
        let connection_string = config.connection_string.expose_secret();

        let pg_config: tokio_postgres::Config = connection_string.parse().map_err(|e| {
            ErasureError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
        })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                ErasureError::Configuration(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self {
            pool,
            statement_timeout_ms: config.statement_timeout_seconds * 1000,
            safe_connection_string: redact_connection_string(connection_string.as_ref()),
        })
    }

    /// Check that a connection can be made and used
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be reached.
    pub async fn ping(&self) -> Result<()> {
        let client = self.connection().await?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| StoreError::Unavailable(format!("Connection test failed: {e}")))?;

        tracing::debug!(database = %self.safe_connection_string, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Run a statement returning exactly one row
    pub async fn query_one(
        &self,
        entity: &str,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row> {
        let client = self.connection().await?;
        client
            .query_one(statement, params)
            .await
            .map_err(|e| map_query_error(entity, &e))
    }

    /// Run a statement and return the number of affected rows
    pub async fn execute(
        &self,
        entity: &str,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.connection().await?;
        client
            .execute(statement, params)
            .await
            .map_err(|e| map_query_error(entity, &e))
    }

    /// Run a multi-statement script, used for migrations
    pub async fn batch_execute(&self, script: &str) -> Result<()> {
        let client = self.connection().await?;
        client
            .batch_execute(script)
            .await
            .map_err(|e| map_query_error("migration", &e))
    }

    /// Connection string with credentials removed
    pub fn connection_string_safe(&self) -> &str {
        &self.safe_connection_string
    }

    /// Pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }

    async fn connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(map_pool_error)?;

        client
            .execute(
                &format!("SET statement_timeout = {}", self.statement_timeout_ms),
                &[],
            )
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to set statement timeout: {e}")))?;

        Ok(client)
    }
}

fn redact_connection_string(connection_string: &str) -> String {
    connection_string
        .rsplit_once('@')
        .map(|(_, host)| format!("postgresql://***@{host}"))
        .unwrap_or_else(|| "postgresql://***".to_string())
}

fn map_pool_error(err: PoolError) -> ErasureError {
    StoreError::Unavailable(format!("Failed to get connection from pool: {err}")).into()
}

fn map_query_error(entity: &str, err: &tokio_postgres::Error) -> ErasureError {
    if err.is_closed() {
        return StoreError::Unavailable(format!("Connection closed: {err}")).into();
    }

    match err.code() {
        Some(code) if *code == SqlState::UNDEFINED_TABLE => {
            StoreError::UnknownEntity(entity.to_string()).into()
        }
        Some(code)
            if *code == SqlState::INVALID_TEXT_REPRESENTATION
                || *code == SqlState::DATATYPE_MISMATCH
                || *code == SqlState::NOT_NULL_VIOLATION =>
        {
            StoreError::InvalidValue {
                entity: entity.to_string(),
                field: err
                    .as_db_error()
                    .and_then(|db| db.column())
                    .unwrap_or("?")
                    .to_string(),
                message: err.to_string(),
            }
            .into()
        }
        _ => StoreError::QueryFailed {
            entity: entity.to_string(),
            message: err
                .as_db_error()
                .map(|db| db.message().to_string())
                .unwrap_or_else(|| err.to_string()),
        }
        .into(),
    }
}
