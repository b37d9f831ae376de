//! In-process store and audit sink
//!
//! Rows are JSON objects held per entity. Used for embedding the engine,
//! exercising cascades in tests and rehearsing configurations without a
//! database. Failure injection lets callers simulate a broken entity
//! ([`InMemoryStore::fail_on`]) or an unreachable store
//! ([`InMemoryStore::set_unavailable`]).

use crate::adapters::store::filter::DELETED_FLAG_FIELD;
use crate::adapters::store::{EntityStore, FieldAssignments, RowScope, SubjectFilter};
use crate::core::audit::{AuditEntry, AuditSink};
use crate::domain::ids::EntityName;
use crate::domain::{ErasureError, Result, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

type Row = Map<String, Value>;

/// Entity store backed by in-memory maps
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<BTreeMap<EntityName, Vec<Row>>>,
    failing: RwLock<HashSet<EntityName>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty entity
    pub async fn create_entity(&self, entity: &str) -> Result<()> {
        let name = parse_entity(entity)?;
        self.tables.write().await.entry(name).or_default();
        Ok(())
    }

    /// Insert a row, creating the entity on first use
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`] if the entity name is invalid or
    /// the row is not a JSON object.
    pub async fn insert(&self, entity: &str, row: Value) -> Result<()> {
        let name = parse_entity(entity)?;
        let Value::Object(row) = row else {
            return Err(ErasureError::Validation(format!(
                "rows for '{entity}' must be JSON objects"
            )));
        };

        self.tables.write().await.entry(name).or_default().push(row);
        Ok(())
    }

    /// Snapshot of an entity's rows, in insertion order
    pub async fn rows(&self, entity: &str) -> Vec<Row> {
        let tables = self.tables.read().await;
        tables
            .iter()
            .find(|(name, _)| name.as_str() == entity)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }

    /// Number of rows currently held for an entity
    pub async fn row_count(&self, entity: &str) -> usize {
        let tables = self.tables.read().await;
        tables
            .iter()
            .find(|(name, _)| name.as_str() == entity)
            .map_or(0, |(_, rows)| rows.len())
    }

    /// Make every operation on `entity` fail with a query error
    pub async fn fail_on(&self, entity: &str) {
        if let Ok(name) = EntityName::new(entity) {
            self.failing.write().await.insert(name);
        }
    }

    /// Undo [`fail_on`](Self::fail_on) for every entity
    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    /// Simulate the whole store being unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn check(&self, entity: &EntityName) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()).into());
        }
        if self.failing.read().await.contains(entity) {
            return Err(StoreError::QueryFailed {
                entity: entity.to_string(),
                message: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn parse_entity(entity: &str) -> Result<EntityName> {
    EntityName::new(entity).map_err(ErasureError::Validation)
}

fn unknown(entity: &EntityName) -> ErasureError {
    StoreError::UnknownEntity(entity.to_string()).into()
}

fn selects(filter: &SubjectFilter, row: &Row) -> bool {
    let linked = row
        .get(&filter.subject_field)
        .is_some_and(|value| filter.matches_link(value));

    match filter.scope {
        RowScope::All => linked,
        RowScope::Live => linked && row.get(DELETED_FLAG_FIELD) != Some(&Value::Bool(true)),
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()).into());
        }
        Ok(())
    }

    async fn count(&self, filter: &SubjectFilter) -> Result<u64> {
        self.check(&filter.entity).await?;

        let tables = self.tables.read().await;
        let rows = tables.get(&filter.entity).ok_or_else(|| unknown(&filter.entity))?;
        Ok(rows.iter().filter(|row| selects(filter, row)).count() as u64)
    }

    async fn update(&self, filter: &SubjectFilter, assignments: &FieldAssignments) -> Result<u64> {
        self.check(&filter.entity).await?;

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(&filter.entity)
            .ok_or_else(|| unknown(&filter.entity))?;

        let mut affected = 0;
        for row in rows.iter_mut().filter(|row| selects(filter, row)) {
            for (field, value) in assignments {
                row.insert(field.clone(), value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, filter: &SubjectFilter) -> Result<u64> {
        self.check(&filter.entity).await?;

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(&filter.entity)
            .ok_or_else(|| unknown(&filter.entity))?;

        let before = rows.len();
        rows.retain(|row| !selects(filter, row));
        Ok((before - rows.len()) as u64)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

/// Audit sink collecting entries in memory
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
    failing: AtomicBool,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries appended so far
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Make every append fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ErasureError::Audit("in-memory audit log marked failing".to_string()));
        }
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SubjectId;
    use serde_json::json;

    fn filter(entity: &str, subject: &str) -> SubjectFilter {
        SubjectFilter::new(
            EntityName::new(entity).unwrap(),
            "user_id",
            SubjectId::new(subject).unwrap(),
        )
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert("jobs", json!({"user_id": "u1", "n": 1})).await.unwrap();
        store.insert("jobs", json!({"user_id": "u1", "n": 2, "is_deleted": true})).await.unwrap();
        store.insert("jobs", json!({"user_id": "u2", "n": 3})).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let store = InMemoryStore::new();
        assert!(store.insert("jobs", json!([1, 2])).await.is_err());
        assert!(store.insert("bad name", json!({})).await.is_err());
    }

    #[tokio::test]
    async fn test_count_respects_scope() {
        let store = seeded().await;
        assert_eq!(store.count(&filter("jobs", "u1")).await.unwrap(), 2);
        assert_eq!(store.count(&filter("jobs", "u1").live_only()).await.unwrap(), 1);
        assert_eq!(store.count(&filter("jobs", "u3")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_and_delete_touch_only_filtered_rows() {
        let store = seeded().await;

        let mut assignments = FieldAssignments::new();
        assignments.insert("n".to_string(), json!(0));
        assert_eq!(store.update(&filter("jobs", "u1").live_only(), &assignments).await.unwrap(), 1);

        let rows = store.rows("jobs").await;
        assert_eq!(rows[0]["n"], json!(0));
        assert_eq!(rows[1]["n"], json!(2));
        assert_eq!(rows[2]["n"], json!(3));

        assert_eq!(store.delete(&filter("jobs", "u1")).await.unwrap(), 2);
        assert_eq!(store.row_count("jobs").await, 1);
    }

    #[tokio::test]
    async fn test_unknown_entity() {
        let store = InMemoryStore::new();
        let err = store.count(&filter("ghost", "u1")).await.unwrap_err();
        assert!(matches!(err, ErasureError::Store(StoreError::UnknownEntity(_))));

        store.create_entity("ghost").await.unwrap();
        assert_eq!(store.count(&filter("ghost", "u1")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = seeded().await;

        store.fail_on("jobs").await;
        let err = store.count(&filter("jobs", "u1")).await.unwrap_err();
        assert!(!err.is_fatal());

        store.clear_failures().await;
        assert!(store.count(&filter("jobs", "u1")).await.is_ok());

        store.set_unavailable(true);
        assert!(store.ping().await.unwrap_err().is_fatal());
        assert!(store.delete(&filter("jobs", "u1")).await.unwrap_err().is_fatal());
        assert_eq!(store.row_count("jobs").await, 3);
    }

    #[tokio::test]
    async fn test_memory_audit_log() {
        use crate::domain::ids::RequestId;
        use crate::domain::ErasureMode;

        let log = MemoryAuditLog::new();
        let entry = AuditEntry::new(
            RequestId::new("req-1").unwrap(),
            EntityName::new("jobs").unwrap(),
            2,
            SubjectId::new("u1").unwrap(),
            ErasureMode::Delete,
        );

        log.append(&entry).await.unwrap();
        assert_eq!(log.entries().await.len(), 1);

        log.set_failing(true);
        assert!(log.append(&entry).await.is_err());
        assert_eq!(log.entries().await.len(), 1);
    }
}
