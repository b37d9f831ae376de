//! Store abstraction layer
//!
//! Trait-based access to the relational store holding subject data, so the
//! engine runs unchanged against PostgreSQL or the in-memory backend.

pub mod factory;
pub mod filter;
pub mod traits;

pub use factory::{create_audit_sink, create_entity_store};
pub use filter::{FieldAssignments, RowScope, SubjectFilter};
pub use traits::EntityStore;
