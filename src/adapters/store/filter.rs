//! Row filters and field assignments passed to [`EntityStore`](super::EntityStore)

use crate::domain::ids::{EntityName, SubjectId};
use serde_json::Value;
use std::collections::BTreeMap;

/// Column flagging a row as logically deleted
pub const DELETED_FLAG_FIELD: &str = "is_deleted";

/// Column holding the tombstone timestamp
pub const DELETED_AT_FIELD: &str = "deleted_at";

/// Column naming the actor that tombstoned the row
pub const DELETED_BY_FIELD: &str = "deleted_by";

/// Column holding the privacy request that tombstoned the row
pub const DELETION_REQUEST_FIELD: &str = "deletion_request_id";

/// Column stamped when a row is anonymized
pub const ANONYMIZED_AT_FIELD: &str = "anonymized_at";

/// Column -> new value, ordered so generated statements are stable
pub type FieldAssignments = BTreeMap<String, Value>;

/// Which rows of a subject a filter selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Every row linked to the subject
    All,
    /// Only rows not carrying the tombstone flag
    Live,
}

/// Selects the rows of one entity that belong to one subject
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectFilter {
    /// Entity (table) to filter
    pub entity: EntityName,

    /// Subject-link column
    pub subject_field: String,

    /// Subject identifier the link column is compared to
    pub subject_id: SubjectId,

    /// Row scope
    pub scope: RowScope,
}

impl SubjectFilter {
    /// Filter over every row of `entity` linked to `subject_id`
    pub fn new(entity: EntityName, subject_field: impl Into<String>, subject_id: SubjectId) -> Self {
        Self {
            entity,
            subject_field: subject_field.into(),
            subject_id,
            scope: RowScope::All,
        }
    }

    /// Restrict the filter to rows without the tombstone flag
    pub fn live_only(mut self) -> Self {
        self.scope = RowScope::Live;
        self
    }

    /// Whether a stored link value refers to this filter's subject
    ///
    /// Link columns may be textual or numeric; both compare by their text form,
    /// matching the `::text` comparison used by the SQL backend.
    pub fn matches_link(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => s == self.subject_id.as_str(),
            Value::Number(n) => n.to_string() == self.subject_id.as_str(),
            _ => false,
        }
    }
}
