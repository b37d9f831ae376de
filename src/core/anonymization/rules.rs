//! Replacement rules for personal-data fields

use crate::domain::ids::{EntityName, SubjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Literal written by [`Replacement::Redact`]
pub const REDACTED: &str = "[REDACTED]";

/// Inputs available to a replacement when computing a field's new value
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub entity: &'a EntityName,
    pub field: &'a str,
    pub subject_id: &'a SubjectId,
}

/// Code-registered replacement function
///
/// Must return the same value for the same context, or re-running an
/// anonymization would change already-anonymized content.
pub type Generator = Arc<dyn Fn(&RuleContext<'_>) -> Value + Send + Sync>;

/// Replacement rule as written in configuration files
///
/// ```toml
/// [entities.rules]
/// user_id = { kind = "hash" }
/// email = { kind = "value", value = "deleted@example.invalid" }
/// notes = { kind = "null" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplacementSpec {
    /// Fixed literal
    Value { value: Value },
    /// SQL NULL
    Null,
    /// The `[REDACTED]` marker
    Redact,
    /// Deterministic pseudonym
    Hash,
}

/// How a single field is overwritten
#[derive(Clone)]
pub enum Replacement {
    Value(Value),
    Null,
    Redact,
    Hash,
    Generator(Generator),
}

impl Replacement {
    /// Wrap a closure as a generator rule
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> Value + Send + Sync + 'static,
    {
        Replacement::Generator(Arc::new(f))
    }

    /// Compute the value written for one field
    pub fn resolve(&self, ctx: &RuleContext<'_>) -> Value {
        match self {
            Replacement::Value(value) => value.clone(),
            Replacement::Null => Value::Null,
            Replacement::Redact => Value::String(REDACTED.to_string()),
            Replacement::Hash => Value::String(pseudonym(ctx)),
            Replacement::Generator(f) => f(ctx),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Replacement::Value(_) => "value",
            Replacement::Null => "null",
            Replacement::Redact => "redact",
            Replacement::Hash => "hash",
            Replacement::Generator(_) => "generator",
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Replacement::Generator(_) => f.write_str("Generator(..)"),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<ReplacementSpec> for Replacement {
    fn from(spec: ReplacementSpec) -> Self {
        match spec {
            ReplacementSpec::Value { value } => Replacement::Value(value),
            ReplacementSpec::Null => Replacement::Null,
            ReplacementSpec::Redact => Replacement::Redact,
            ReplacementSpec::Hash => Replacement::Hash,
        }
    }
}

/// `anon_` + first 16 hex chars of SHA-256(entity:field:subject)
fn pseudonym(ctx: &RuleContext<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ctx.entity.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(ctx.field.as_bytes());
    hasher.update(b":");
    hasher.update(ctx.subject_id.as_str().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("anon_{}", &digest[..16])
}

/// Field -> replacement rules for one entity
#[derive(Debug, Clone, Default)]
pub struct AnonymizationRule {
    fields: BTreeMap<String, Replacement>,
}

impl AnonymizationRule {
    /// Empty rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for one field
    pub fn with_field(mut self, field: impl Into<String>, replacement: Replacement) -> Self {
        self.fields.insert(field.into(), replacement);
        self
    }

    /// Replacement for a field
    pub fn get(&self, field: &str) -> Option<&Replacement> {
        self.fields.get(field)
    }

    /// Fields covered by this rule
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FromIterator<(String, ReplacementSpec)> for AnonymizationRule {
    fn from_iter<T: IntoIterator<Item = (String, ReplacementSpec)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, spec)| (field, spec.into()))
                .collect(),
        }
    }
}
