//! Domain models and types for the erasure engine.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SubjectId`], [`RequestId`], [`EntityName`])
//! - **Request model** ([`ErasureRequest`], [`ErasureMode`])
//! - **Error types** ([`ErasureError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use cascade_erasure::domain::{EntityName, SubjectId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let subject = SubjectId::new("user-42")?;
//! let entity = EntityName::new("crawl_results")?;
//!
//! // This won't compile - a subject is not an entity
//! // let wrong: EntityName = subject;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod request;
pub mod result;

pub use errors::{ErasureError, StoreError};
pub use ids::{EntityName, RequestId, SubjectId};
pub use request::{ErasureMode, ErasureRequest};
pub use result::Result;
