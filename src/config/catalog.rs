//! Building the engine's schema catalog from configuration

use super::schema::{EntityConfig, ErasureConfig};
use crate::core::anonymization::{AnonymizationRegistry, AnonymizationRule};
use crate::core::schema::validation::into_result;
use crate::core::schema::{CascadeOrder, EntityDescriptor, SchemaCatalog};
use crate::domain::Result;

/// Catalog, cascade order and rules derived from an [`ErasureConfig`]
#[derive(Debug, Clone)]
pub struct ErasureCatalog {
    pub catalog: SchemaCatalog,
    pub order: CascadeOrder,
    pub registry: AnonymizationRegistry,
}

impl ErasureConfig {
    /// Build and cross-validate the schema catalog, cascade order and
    /// anonymization rules declared in this configuration
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Validation`](crate::domain::ErasureError::Validation)
    /// listing every blocking issue found.
    pub fn build_catalog(&self) -> Result<ErasureCatalog> {
        let catalog = SchemaCatalog::new(
            self.entities
                .iter()
                .map(descriptor_for)
                .collect::<Result<Vec<_>>>()?,
        )?;

        let order = CascadeOrder::new(self.cascade.order.iter().cloned())?;

        let mut registry = AnonymizationRegistry::new();
        for entity in self.entities.iter().filter(|e| !e.rules.is_empty()) {
            let rule: AnonymizationRule = entity
                .rules
                .iter()
                .map(|(field, spec)| (field.clone(), spec.clone()))
                .collect();
            registry.register(entity.name.clone(), rule);
        }

        let mut issues = order.validate_against(&catalog);
        issues.extend(registry.validate_against(&catalog));
        into_result(issues)?;

        tracing::debug!(
            entities = catalog.len(),
            linked = catalog.linked().count(),
            order = ?order.to_strings(),
            "Schema catalog built"
        );

        Ok(ErasureCatalog {
            catalog,
            order,
            registry,
        })
    }
}

fn descriptor_for(entity: &EntityConfig) -> Result<EntityDescriptor> {
    let descriptor = match &entity.subject_field {
        Some(field) => {
            EntityDescriptor::linked(entity.name.clone(), field.clone(), entity.pii_fields.iter().cloned())?
        }
        None => EntityDescriptor::unlinked(entity.name.clone()),
    };
    Ok(descriptor.with_references(entity.references.iter().cloned()))
}
