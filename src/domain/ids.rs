//! Domain identifier types with validation
//!
//! Newtype wrappers keep subject, request and entity identifiers from being
//! mixed up, and validate formats at construction time.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Returns `true` if `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`, max 63 bytes)
///
/// Entity and field names are interpolated into statements as quoted
/// identifiers, so anything else is rejected up front.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Data subject identifier
///
/// The value every subject-linked entity stores in its subject-link field.
/// It is PII in its own right, so `Display` is never used in logs; use
/// [`SubjectId::digest`] instead.
///
/// # Examples
///
/// ```
/// use cascade_erasure::domain::ids::SubjectId;
/// use std::str::FromStr;
///
/// let subject = SubjectId::from_str("user-42").unwrap();
/// assert_eq!(subject.as_str(), "user-42");
/// assert_eq!(subject.digest().len(), 12);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new SubjectId
    ///
    /// Returns `Err` if the identifier is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Subject ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the subject ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 digest used to correlate log lines without logging the identifier
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.0.as_bytes());
        format!("{hash:x}")[..12].to_string()
    }
}

// Debug is redacted so the raw identifier never ends up in `?request` log fields.
impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectId({})", self.digest())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SubjectId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Privacy request identifier
///
/// Assigned by the upstream privacy workflow and stamped onto tombstoned rows
/// and audit entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Creates a new RequestId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Request ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh random request ID (UUID v4)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the request ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RequestId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Entity (table) name
///
/// # Examples
///
/// ```
/// use cascade_erasure::domain::ids::EntityName;
///
/// assert!(EntityName::new("crawl_results").is_ok());
/// assert!(EntityName::new("crawl results").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Creates a new EntityName
    ///
    /// Returns `Err` unless the name is a plain SQL identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(format!(
                "Invalid entity name '{name}'. Must match [A-Za-z_][A-Za-z0-9_]* (max 63 chars)"
            ));
        }
        Ok(Self(name))
    }

    /// Returns the entity name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntityName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> Self {
        name.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_valid() {
        let id = SubjectId::new("user-42").unwrap();
        assert_eq!(id.as_str(), "user-42");
        assert_eq!(id.to_string(), "user-42");
    }

    #[test]
    fn test_subject_id_empty() {
        assert!(SubjectId::new("").is_err());
        assert!(SubjectId::new("   ").is_err());
    }

    #[test]
    fn test_subject_id_debug_is_redacted() {
        let id = SubjectId::new("alice@example.com").unwrap();
        let debug = format!("{id:?}");
        assert!(!debug.contains("alice"));
        assert!(debug.contains(&id.digest()));
    }

    #[test]
    fn test_subject_digest_stable() {
        let a = SubjectId::new("user-1").unwrap();
        let b = SubjectId::new("user-1").unwrap();
        let c = SubjectId::new("user-2").unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn test_request_id_generate_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert!(RequestId::new("").is_err());
    }

    #[test]
    fn test_ids_deserialize_through_validation() {
        let subject: SubjectId = serde_json::from_str("\"user-42\"").unwrap();
        assert_eq!(subject.as_str(), "user-42");
        assert_eq!(serde_json::to_string(&subject).unwrap(), "\"user-42\"");

        assert!(serde_json::from_str::<SubjectId>("\"\"").is_err());
        assert!(serde_json::from_str::<SubjectId>("\"  \"").is_err());
        assert!(serde_json::from_str::<RequestId>("\"\"").is_err());
        assert_eq!(
            serde_json::from_str::<RequestId>("\"req-9\"").unwrap().as_str(),
            "req-9"
        );
    }

    #[test]
    fn test_entity_name_validation() {
        assert!(EntityName::new("jobs").is_ok());
        assert!(EntityName::new("_private").is_ok());
        assert!(EntityName::new("crawl_results_2").is_ok());
        assert!(EntityName::new("").is_err());
        assert!(EntityName::new("2jobs").is_err());
        assert!(EntityName::new("jobs; DROP TABLE users").is_err());
        assert!(EntityName::new("a".repeat(64)).is_err());
    }

    #[test]
    fn test_entity_name_serde() {
        let name: EntityName = serde_json::from_str("\"templates\"").unwrap();
        assert_eq!(name.as_str(), "templates");
        assert!(serde_json::from_str::<EntityName>("\"bad name\"").is_err());
    }
}
