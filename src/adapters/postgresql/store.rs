//! PostgreSQL implementation of [`EntityStore`]
//!
//! Entities map to tables, fields to columns. Identifiers are validated at
//! configuration time and quoted here; subject ids and replacement values are
//! always bound as parameters.

use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::store::filter::DELETED_FLAG_FIELD;
use crate::adapters::store::{EntityStore, FieldAssignments, RowScope, SubjectFilter};
use crate::domain::{ErasureError, Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Table-backed entity store
pub struct PostgresStore {
    client: Arc<PostgresClient>,
}

impl PostgresStore {
    pub fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }

    /// Shared client, for sinks living in the same database
    pub fn client(&self) -> &Arc<PostgresClient> {
        &self.client
    }
}

/// Double-quote an identifier
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quote a string literal
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `WHERE` clause selecting the filter's rows; the subject id is `$1`
///
/// The id is bound as text and converted to the subject column's own type
/// through the table's row type, leaving the column itself uncast so an
/// index on it stays usable.
fn where_clause(filter: &SubjectFilter) -> String {
    let table = quote_ident(filter.entity.as_str());
    let column = quote_ident(&filter.subject_field);
    let mut clause = format!(
        "{table}.{column} = (jsonb_populate_record(NULL::{table}, jsonb_build_object({}, $1::text))).{column}",
        quote_literal(&filter.subject_field)
    );
    if filter.scope == RowScope::Live {
        clause.push_str(&format!(
            " AND {table}.{} IS NOT TRUE",
            quote_ident(DELETED_FLAG_FIELD)
        ));
    }
    clause
}

fn count_sql(filter: &SubjectFilter) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {}",
        quote_ident(filter.entity.as_str()),
        where_clause(filter)
    )
}

fn delete_sql(filter: &SubjectFilter) -> String {
    format!(
        "DELETE FROM {} WHERE {}",
        quote_ident(filter.entity.as_str()),
        where_clause(filter)
    )
}

/// `UPDATE` taking the new values as one JSON object in `$2`
///
/// `jsonb_populate_record` casts each value to its column's type, so
/// timestamps, booleans and text all travel the same way.
fn update_sql(filter: &SubjectFilter, assignments: &FieldAssignments) -> Result<String> {
    if assignments.is_empty() {
        return Err(ErasureError::Validation(format!(
            "update on '{}' has no assignments",
            filter.entity
        )));
    }

    let table = quote_ident(filter.entity.as_str());
    let set_list = assignments
        .keys()
        .map(|field| {
            let column = quote_ident(field);
            format!("{column} = r.{column}")
        })
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "UPDATE {table} SET {set_list} FROM jsonb_populate_record(NULL::{table}, $2::jsonb) AS r WHERE {}",
        where_clause(filter)
    ))
}

#[async_trait]
impl EntityStore for PostgresStore {
    async fn ping(&self) -> Result<()> {
        self.client.ping().await
    }

    async fn count(&self, filter: &SubjectFilter) -> Result<u64> {
        let row = self
            .client
            .query_one(
                filter.entity.as_str(),
                &count_sql(filter),
                &[&filter.subject_id.as_str()],
            )
            .await?;

        let count: i64 = row.try_get(0).map_err(|e| StoreError::QueryFailed {
            entity: filter.entity.to_string(),
            message: format!("Unexpected count result: {e}"),
        })?;
        Ok(count.max(0) as u64)
    }

    async fn update(&self, filter: &SubjectFilter, assignments: &FieldAssignments) -> Result<u64> {
        let statement = update_sql(filter, assignments)?;
        let values: Value = Value::Object(
            assignments
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        );

        self.client
            .execute(
                filter.entity.as_str(),
                &statement,
                &[&filter.subject_id.as_str(), &values],
            )
            .await
    }

    async fn delete(&self, filter: &SubjectFilter) -> Result<u64> {
        self.client
            .execute(
                filter.entity.as_str(),
                &delete_sql(filter),
                &[&filter.subject_id.as_str()],
            )
            .await
    }

    fn backend_name(&self) -> &str {
        "postgresql"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{EntityName, SubjectId};
    use serde_json::json;

    fn filter() -> SubjectFilter {
        SubjectFilter::new(
            EntityName::new("crawl_results").unwrap(),
            "user_id",
            SubjectId::new("user-1").unwrap(),
        )
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("jobs"), "\"jobs\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    const SUBJECT_MATCH: &str = r#""crawl_results"."user_id" = (jsonb_populate_record(NULL::"crawl_results", jsonb_build_object('user_id', $1::text)))."user_id""#;

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("user_id"), "'user_id'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_subject_column_is_never_cast() {
        let clause = where_clause(&filter());
        assert_eq!(clause, SUBJECT_MATCH);
        assert!(!clause.contains(r#""user_id"::text"#));
    }

    #[test]
    fn test_count_sql() {
        assert_eq!(
            count_sql(&filter()),
            format!(r#"SELECT COUNT(*) FROM "crawl_results" WHERE {SUBJECT_MATCH}"#)
        );
        assert_eq!(
            count_sql(&filter().live_only()),
            format!(
                r#"SELECT COUNT(*) FROM "crawl_results" WHERE {SUBJECT_MATCH} AND "crawl_results"."is_deleted" IS NOT TRUE"#
            )
        );
    }

    #[test]
    fn test_delete_sql() {
        assert_eq!(
            delete_sql(&filter()),
            format!(r#"DELETE FROM "crawl_results" WHERE {SUBJECT_MATCH}"#)
        );
    }

    #[test]
    fn test_update_sql() {
        let mut assignments = FieldAssignments::new();
        assignments.insert("user_id".to_string(), json!("anon_1"));
        assignments.insert("payload".to_string(), json!(null));

        let sql = update_sql(&filter(), &assignments).unwrap();
        assert_eq!(
            sql,
            format!(
                r#"UPDATE "crawl_results" SET "payload" = r."payload", "user_id" = r."user_id" FROM jsonb_populate_record(NULL::"crawl_results", $2::jsonb) AS r WHERE {SUBJECT_MATCH}"#
            )
        );
    }

    #[test]
    fn test_update_sql_requires_assignments() {
        assert!(update_sql(&filter(), &FieldAssignments::new()).is_err());
    }
}
