//! Startup validation issues

use crate::domain::ids::EntityName;
use crate::domain::{ErasureError, Result};
use std::fmt;

/// A problem found while cross-checking the catalog, order and rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A subject-linked entity is not in the cascade order and would be skipped
    MissingFromOrder(EntityName),
    /// The order names an entity with no descriptor
    OrderedButUndeclared(EntityName),
    /// A dependent entity is ordered after the entity it references
    DependencyOutOfOrder {
        dependent: EntityName,
        referenced: EntityName,
    },
    /// The subject-link column is not declared PII, so anonymized rows stay linked
    SubjectFieldNotPii { entity: EntityName, field: String },
    /// A PII field has no anonymization rule
    MissingRule { entity: EntityName, field: String },
    /// A rule targets a field that is not declared PII
    RuleForNonPiiField { entity: EntityName, field: String },
}

impl ValidationIssue {
    /// Warnings are logged; everything else blocks startup
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationIssue::RuleForNonPiiField { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingFromOrder(entity) => write!(
                f,
                "entity '{entity}' holds subject data but is missing from the cascade order"
            ),
            ValidationIssue::OrderedButUndeclared(entity) => write!(
                f,
                "entity '{entity}' is in the cascade order but has no schema descriptor"
            ),
            ValidationIssue::DependencyOutOfOrder {
                dependent,
                referenced,
            } => write!(
                f,
                "entity '{dependent}' references '{referenced}' but is ordered after it"
            ),
            ValidationIssue::SubjectFieldNotPii { entity, field } => write!(
                f,
                "subject field '{field}' of entity '{entity}' must be listed in pii_fields"
            ),
            ValidationIssue::MissingRule { entity, field } => write!(
                f,
                "PII field '{field}' of entity '{entity}' has no anonymization rule"
            ),
            ValidationIssue::RuleForNonPiiField { entity, field } => write!(
                f,
                "anonymization rule for '{entity}.{field}' targets a field not declared as PII"
            ),
        }
    }
}

/// Turn collected issues into a single error, logging warnings on the way
///
/// # Errors
///
/// Returns [`ErasureError::Validation`] listing every blocking issue.
pub fn into_result(issues: Vec<ValidationIssue>) -> Result<()> {
    let mut errors = Vec::new();
    for issue in issues {
        if issue.is_warning() {
            tracing::warn!(issue = %issue, "Catalog validation warning");
        } else {
            errors.push(issue.to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ErasureError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_fail() {
        let issues = vec![ValidationIssue::RuleForNonPiiField {
            entity: EntityName::new("jobs").unwrap(),
            field: "status".to_string(),
        }];
        assert!(into_result(issues).is_ok());
    }

    #[test]
    fn test_errors_are_joined() {
        let issues = vec![
            ValidationIssue::MissingFromOrder(EntityName::new("jobs").unwrap()),
            ValidationIssue::MissingRule {
                entity: EntityName::new("templates").unwrap(),
                field: "title".to_string(),
            },
        ];
        let err = into_result(issues).unwrap_err().to_string();
        assert!(err.contains("'jobs'"));
        assert!(err.contains("'title'"));
    }
}
