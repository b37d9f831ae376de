//! Per-entity anonymization rule registry

use super::rules::{AnonymizationRule, RuleContext};
use crate::adapters::store::FieldAssignments;
use crate::core::schema::{EntityDescriptor, SchemaCatalog, ValidationIssue};
use crate::domain::ids::{EntityName, SubjectId};
use crate::domain::{ErasureError, Result};
use std::collections::HashMap;

/// Entity -> anonymization rule
#[derive(Debug, Clone, Default)]
pub struct AnonymizationRegistry {
    rules: HashMap<EntityName, AnonymizationRule>,
}

impl AnonymizationRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rule for an entity, replacing any previous one
    pub fn register(&mut self, entity: EntityName, rule: AnonymizationRule) {
        self.rules.insert(entity, rule);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_rule(mut self, entity: EntityName, rule: AnonymizationRule) -> Self {
        self.register(entity, rule);
        self
    }

    /// Rule registered for an entity
    pub fn rule_for(&self, entity: &EntityName) -> Option<&AnonymizationRule> {
        self.rules.get(entity)
    }

    /// New values for every PII field of the entity
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::MissingAnonymizationRule`] for the first PII
    /// field without a rule. No partial assignment is ever returned.
    pub fn assignments_for(
        &self,
        descriptor: &EntityDescriptor,
        subject_id: &SubjectId,
    ) -> Result<FieldAssignments> {
        let rule = self.rules.get(descriptor.name());
        let mut assignments = FieldAssignments::new();

        for field in descriptor.pii_fields() {
            let replacement = rule.and_then(|r| r.get(field)).ok_or_else(|| {
                ErasureError::MissingAnonymizationRule {
                    entity: descriptor.name().to_string(),
                    field: field.clone(),
                }
            })?;

            let ctx = RuleContext {
                entity: descriptor.name(),
                field,
                subject_id,
            };
            assignments.insert(field.clone(), replacement.resolve(&ctx));
        }

        Ok(assignments)
    }

    /// Cross-check rules against the catalog's PII declarations
    pub fn validate_against(&self, catalog: &SchemaCatalog) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for descriptor in catalog.linked() {
            let name = descriptor.name();

            if let Some(field) = descriptor.subject_field() {
                if !descriptor.pii_fields().contains(field) {
                    issues.push(ValidationIssue::SubjectFieldNotPii {
                        entity: name.clone(),
                        field: field.to_string(),
                    });
                }
            }

            let rule = self.rules.get(name);
            for field in descriptor.pii_fields() {
                if rule.and_then(|r| r.get(field)).is_none() {
                    issues.push(ValidationIssue::MissingRule {
                        entity: name.clone(),
                        field: field.clone(),
                    });
                }
            }

            if let Some(rule) = rule {
                for field in rule.fields() {
                    if !descriptor.pii_fields().contains(field) {
                        issues.push(ValidationIssue::RuleForNonPiiField {
                            entity: name.clone(),
                            field: field.to_string(),
                        });
                    }
                }
            }
        }

        issues
    }
}
