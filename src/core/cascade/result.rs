//! Cascade result and state

use crate::domain::ids::EntityName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one erasure request
///
/// A returned result with non-empty `errors` is not a clean success; the
/// request needs manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Entities with a nonzero effect, in processing order
    pub tables_processed: Vec<String>,

    /// Sum of rows affected (or counted, in a dry run)
    pub total_records_affected: u64,

    /// The configured cascade order, echoed
    pub cascade_order: Vec<String>,

    /// Per-entity failures and verification findings
    pub errors: Vec<String>,

    pub execution_time_ms: u64,
}

impl CascadeResult {
    pub(crate) fn new(cascade_order: Vec<String>) -> Self {
        Self {
            tables_processed: Vec::new(),
            total_records_affected: 0,
            cascade_order,
            errors: Vec::new(),
            execution_time_ms: 0,
        }
    }

    pub(crate) fn record_processed(&mut self, entity: &EntityName, records_affected: u64) {
        self.tables_processed.push(entity.to_string());
        self.total_records_affected += records_affected;
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// True only when no error or finding was recorded
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Terminal state of the run
    pub fn final_state(&self) -> CascadeState {
        if self.is_success() {
            CascadeState::Completed
        } else {
            CascadeState::CompletedWithErrors
        }
    }
}

/// Orchestrator states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeState {
    Initiated,
    Processing(EntityName),
    Verifying,
    Completed,
    CompletedWithErrors,
}

impl fmt::Display for CascadeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeState::Initiated => f.write_str("initiated"),
            CascadeState::Processing(entity) => write!(f, "processing({entity})"),
            CascadeState::Verifying => f.write_str("verifying"),
            CascadeState::Completed => f.write_str("completed"),
            CascadeState::CompletedWithErrors => f.write_str("completed_with_errors"),
        }
    }
}

/// What happened to one entity in the processing loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOutcome {
    /// Rows were affected (or would be, in a dry run)
    Success(u64),
    /// Processed, but no row belonged to the subject
    Unaffected,
    /// No subject link or no descriptor
    Skipped,
    /// The processor failed; the message went to `errors`
    ErrorRecorded(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accumulates() {
        let mut result = CascadeResult::new(vec!["a".to_string(), "b".to_string()]);
        assert!(result.is_success());
        assert_eq!(result.final_state(), CascadeState::Completed);

        result.record_processed(&EntityName::new("a").unwrap(), 3);
        result.record_processed(&EntityName::new("b").unwrap(), 1);
        assert_eq!(result.tables_processed, vec!["a", "b"]);
        assert_eq!(result.total_records_affected, 4);

        result.record_error("b: boom".to_string());
        assert!(!result.is_success());
        assert_eq!(result.final_state(), CascadeState::CompletedWithErrors);
    }

    #[test]
    fn test_result_json_shape() {
        let result = CascadeResult::new(vec!["jobs".to_string()]);
        let json = serde_json::to_value(&result).unwrap();

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "cascade_order",
                "errors",
                "execution_time_ms",
                "tables_processed",
                "total_records_affected"
            ]
        );
    }

    #[test]
    fn test_state_display() {
        let state = CascadeState::Processing(EntityName::new("jobs").unwrap());
        assert_eq!(state.to_string(), "processing(jobs)");
        assert_eq!(CascadeState::CompletedWithErrors.to_string(), "completed_with_errors");
    }
}
