//! Entity schema descriptors, cascade order and their startup validation

pub mod descriptor;
pub mod order;
pub mod validation;

pub use descriptor::{Applicability, EntityDescriptor, SchemaCatalog};
pub use order::CascadeOrder;
pub use validation::ValidationIssue;
