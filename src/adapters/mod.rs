//! Store and audit backends
//!
//! - [`store`] - the [`EntityStore`](store::EntityStore) abstraction and backend factories
//! - [`postgresql`] - PostgreSQL tables
//! - [`memory`] - in-process store and audit log
//!
//! The engine only sees trait objects, so the same cascade runs against any
//! backend:
//!
//! ```rust
//! use cascade_erasure::adapters::memory::InMemoryStore;
//! use cascade_erasure::adapters::store::EntityStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn EntityStore> = Arc::new(InMemoryStore::new());
//! assert_eq!(store.backend_name(), "memory");
//! ```

pub mod memory;
pub mod postgresql;
pub mod store;
