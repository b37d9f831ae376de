//! Anonymization rules and their registry
//!
//! Every PII field of an entity must have an explicit rule. There is no
//! fallback: anonymizing an entity with an uncovered field fails that entity.

pub mod registry;
pub mod rules;

pub use registry::AnonymizationRegistry;
pub use rules::{AnonymizationRule, Generator, Replacement, ReplacementSpec, RuleContext, REDACTED};
