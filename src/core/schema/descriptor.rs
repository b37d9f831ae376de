//! Entity schema descriptors
//!
//! Applicability of an entity to an erasure run is decided from these static
//! declarations, never by probing the store.

use crate::domain::ids::{is_valid_identifier, EntityName};
use crate::domain::{ErasureError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Static description of one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    name: EntityName,
    subject_field: Option<String>,
    pii_fields: BTreeSet<String>,
    references: BTreeSet<EntityName>,
}

impl EntityDescriptor {
    /// Descriptor for an entity whose rows link to a data subject
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`] if a column name is not a plain identifier.
    pub fn linked<I, S>(name: EntityName, subject_field: impl Into<String>, pii_fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subject_field = subject_field.into();
        check_column(&name, &subject_field)?;

        let pii_fields: BTreeSet<String> = pii_fields.into_iter().map(Into::into).collect();
        for field in &pii_fields {
            check_column(&name, field)?;
        }

        Ok(Self {
            name,
            subject_field: Some(subject_field),
            pii_fields,
            references: BTreeSet::new(),
        })
    }

    /// Descriptor for an entity without a subject link
    pub fn unlinked(name: EntityName) -> Self {
        Self {
            name,
            subject_field: None,
            pii_fields: BTreeSet::new(),
            references: BTreeSet::new(),
        }
    }

    /// Declare the entities this one holds references to
    pub fn with_references(mut self, references: impl IntoIterator<Item = EntityName>) -> Self {
        self.references = references.into_iter().collect();
        self
    }

    /// Entity name
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    /// Whether rows of this entity carry a subject-link attribute
    pub fn has_subject_link(&self) -> bool {
        self.subject_field.is_some()
    }

    /// Subject-link column, if any
    pub fn subject_field(&self) -> Option<&str> {
        self.subject_field.as_deref()
    }

    /// Columns holding personal data
    pub fn pii_fields(&self) -> &BTreeSet<String> {
        &self.pii_fields
    }

    /// Entities referenced by this one
    pub fn references(&self) -> &BTreeSet<EntityName> {
        &self.references
    }
}

fn check_column(entity: &EntityName, field: &str) -> Result<()> {
    if is_valid_identifier(field) {
        Ok(())
    } else {
        Err(ErasureError::Validation(format!(
            "'{field}' is not a valid column name for entity '{entity}'"
        )))
    }
}

/// Outcome of the applicability check for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability<'a> {
    /// The entity carries a subject link and is processed
    Applicable(&'a EntityDescriptor),
    /// Declared, but without a subject link
    NoSubjectLink,
    /// No descriptor exists for the entity
    Undeclared,
}

/// All entity descriptors, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    descriptors: BTreeMap<EntityName, EntityDescriptor>,
}

impl SchemaCatalog {
    /// Build a catalog from descriptors
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`] if an entity is declared twice.
    pub fn new(descriptors: impl IntoIterator<Item = EntityDescriptor>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for descriptor in descriptors {
            let name = descriptor.name().clone();
            if map.insert(name.clone(), descriptor).is_some() {
                return Err(ErasureError::Validation(format!(
                    "entity '{name}' is declared more than once"
                )));
            }
        }
        Ok(Self { descriptors: map })
    }

    /// Look up a descriptor
    pub fn get(&self, name: &EntityName) -> Option<&EntityDescriptor> {
        self.descriptors.get(name)
    }

    /// Read-only applicability check
    pub fn applicability(&self, name: &EntityName) -> Applicability<'_> {
        match self.descriptors.get(name) {
            Some(descriptor) if descriptor.has_subject_link() => {
                Applicability::Applicable(descriptor)
            }
            Some(_) => Applicability::NoSubjectLink,
            None => Applicability::Undeclared,
        }
    }

    /// Descriptors that carry a subject link
    pub fn linked(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.descriptors.values().filter(|d| d.has_subject_link())
    }

    /// All descriptors
    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.descriptors.values()
    }

    /// Number of declared entities
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> EntityName {
        EntityName::new(s).unwrap()
    }

    #[test]
    fn test_linked_descriptor() {
        let d = EntityDescriptor::linked(name("templates"), "owner_id", ["owner_id", "title"]).unwrap();
        assert!(d.has_subject_link());
        assert_eq!(d.subject_field(), Some("owner_id"));
        assert_eq!(d.pii_fields().len(), 2);
    }

    #[test]
    fn test_linked_descriptor_rejects_bad_column() {
        assert!(EntityDescriptor::linked(name("jobs"), "user id", ["x"]).is_err());
        assert!(EntityDescriptor::linked(name("jobs"), "user_id", ["bad-col"]).is_err());
    }

    #[test]
    fn test_applicability() {
        let catalog = SchemaCatalog::new([
            EntityDescriptor::linked(name("jobs"), "user_id", ["user_id"]).unwrap(),
            EntityDescriptor::unlinked(name("plans")),
        ])
        .unwrap();

        assert!(matches!(
            catalog.applicability(&name("jobs")),
            Applicability::Applicable(_)
        ));
        assert_eq!(catalog.applicability(&name("plans")), Applicability::NoSubjectLink);
        assert_eq!(catalog.applicability(&name("ghost")), Applicability::Undeclared);
        assert_eq!(catalog.linked().count(), 1);
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        let result = SchemaCatalog::new([
            EntityDescriptor::unlinked(name("jobs")),
            EntityDescriptor::unlinked(name("jobs")),
        ]);
        assert!(matches!(result, Err(ErasureError::Validation(_))));
    }
}
