//! Cascade order
//!
//! Entities are processed most-dependent first: an entity that references
//! another is always erased before the referenced one.

use super::descriptor::SchemaCatalog;
use super::validation::ValidationIssue;
use crate::domain::ids::EntityName;
use crate::domain::{ErasureError, Result};
use std::collections::HashSet;

/// Ordered, duplicate-free list of entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOrder {
    entities: Vec<EntityName>,
}

impl CascadeOrder {
    /// Build an order
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`] if the order is empty or lists an entity twice.
    pub fn new(entities: impl IntoIterator<Item = EntityName>) -> Result<Self> {
        let entities: Vec<EntityName> = entities.into_iter().collect();
        if entities.is_empty() {
            return Err(ErasureError::Validation(
                "cascade order cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entity in &entities {
            if !seen.insert(entity) {
                return Err(ErasureError::Validation(format!(
                    "entity '{entity}' appears more than once in the cascade order"
                )));
            }
        }

        Ok(Self { entities })
    }

    /// Entities in processing order
    pub fn iter(&self) -> impl Iterator<Item = &EntityName> {
        self.entities.iter()
    }

    /// Position of an entity in the order
    pub fn position(&self, entity: &EntityName) -> Option<usize> {
        self.entities.iter().position(|e| e == entity)
    }

    /// Whether an entity is part of the order
    pub fn contains(&self, entity: &EntityName) -> bool {
        self.position(entity).is_some()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false; an order is never empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names as strings, for echoing into results
    pub fn to_strings(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.to_string()).collect()
    }

    /// Cross-check the order against the schema catalog
    pub fn validate_against(&self, catalog: &SchemaCatalog) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for entity in &self.entities {
            if catalog.get(entity).is_none() {
                issues.push(ValidationIssue::OrderedButUndeclared(entity.clone()));
            }
        }

        for descriptor in catalog.linked() {
            if !self.contains(descriptor.name()) {
                issues.push(ValidationIssue::MissingFromOrder(descriptor.name().clone()));
            }
        }

        for descriptor in catalog.iter() {
            let Some(from) = self.position(descriptor.name()) else {
                continue;
            };
            for referenced in descriptor.references() {
                if let Some(to) = self.position(referenced) {
                    if from > to {
                        issues.push(ValidationIssue::DependencyOutOfOrder {
                            dependent: descriptor.name().clone(),
                            referenced: referenced.clone(),
                        });
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::descriptor::EntityDescriptor;

    fn name(s: &str) -> EntityName {
        EntityName::new(s).unwrap()
    }

    fn linked(s: &str) -> EntityDescriptor {
        EntityDescriptor::linked(name(s), "user_id", ["user_id"]).unwrap()
    }

    #[test]
    fn test_order_rejects_empty_and_duplicates() {
        assert!(CascadeOrder::new(Vec::new()).is_err());
        assert!(CascadeOrder::new([name("jobs"), name("jobs")]).is_err());
    }

    #[test]
    fn test_order_iteration_and_position() {
        let order = CascadeOrder::new([name("crawl_results"), name("templates"), name("jobs")]).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order.position(&name("templates")), Some(1));
        assert_eq!(
            order.to_strings(),
            vec!["crawl_results", "templates", "jobs"]
        );
    }

    #[test]
    fn test_linked_entity_missing_from_order() {
        let catalog = SchemaCatalog::new([linked("jobs"), linked("templates")]).unwrap();
        let order = CascadeOrder::new([name("jobs")]).unwrap();

        let issues = order.validate_against(&catalog);
        assert_eq!(issues, vec![ValidationIssue::MissingFromOrder(name("templates"))]);
    }

    #[test]
    fn test_unlinked_entity_may_be_absent() {
        let catalog =
            SchemaCatalog::new([linked("jobs"), EntityDescriptor::unlinked(name("plans"))]).unwrap();
        let order = CascadeOrder::new([name("jobs")]).unwrap();
        assert!(order.validate_against(&catalog).is_empty());
    }

    #[test]
    fn test_ordered_but_undeclared() {
        let catalog = SchemaCatalog::new([linked("jobs")]).unwrap();
        let order = CascadeOrder::new([name("ghost"), name("jobs")]).unwrap();
        assert_eq!(
            order.validate_against(&catalog),
            vec![ValidationIssue::OrderedButUndeclared(name("ghost"))]
        );
    }

    #[test]
    fn test_dependency_must_precede_referenced() {
        let catalog = SchemaCatalog::new([
            linked("crawl_results").with_references([name("jobs")]),
            linked("jobs"),
        ])
        .unwrap();

        let good = CascadeOrder::new([name("crawl_results"), name("jobs")]).unwrap();
        assert!(good.validate_against(&catalog).is_empty());

        let bad = CascadeOrder::new([name("jobs"), name("crawl_results")]).unwrap();
        assert_eq!(
            bad.validate_against(&catalog),
            vec![ValidationIssue::DependencyOutOfOrder {
                dependent: name("crawl_results"),
                referenced: name("jobs"),
            }]
        );
    }
}
