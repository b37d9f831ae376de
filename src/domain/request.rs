//! Erasure request model
//!
//! An [`ErasureRequest`] is created once per privacy request by the upstream
//! workflow and handed to the engine read-only.

use super::ids::{RequestId, SubjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a subject's rows are erased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErasureMode {
    /// Overwrite PII fields using the entity's anonymization rules
    Anonymize,
    /// Remove the rows
    Delete,
    /// Keep the rows but flag them as logically deleted
    Tombstone,
}

impl ErasureMode {
    /// All modes, in a stable order
    pub const ALL: [ErasureMode; 3] = [
        ErasureMode::Anonymize,
        ErasureMode::Delete,
        ErasureMode::Tombstone,
    ];

    /// Lowercase name as used in configuration and audit entries
    pub fn as_str(&self) -> &'static str {
        match self {
            ErasureMode::Anonymize => "anonymize",
            ErasureMode::Delete => "delete",
            ErasureMode::Tombstone => "tombstone",
        }
    }
}

impl fmt::Display for ErasureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErasureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anonymize" | "anonymise" => Ok(ErasureMode::Anonymize),
            "delete" | "hard_delete" => Ok(ErasureMode::Delete),
            "tombstone" | "soft_delete" => Ok(ErasureMode::Tombstone),
            _ => Err(format!(
                "Invalid erasure mode '{s}'. Must be one of: anonymize, delete, tombstone"
            )),
        }
    }
}

/// A single erasure request
///
/// # Examples
///
/// ```
/// use cascade_erasure::domain::{ErasureMode, ErasureRequest, RequestId, SubjectId};
///
/// let request = ErasureRequest::new(
///     SubjectId::new("user-42").unwrap(),
///     RequestId::new("req-1").unwrap(),
///     ErasureMode::Tombstone,
/// )
/// .with_dry_run(true);
///
/// assert!(request.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErasureRequest {
    /// Subject whose rows are erased
    pub subject_id: SubjectId,

    /// Upstream privacy request identifier
    pub request_id: RequestId,

    /// Erasure strategy
    pub mode: ErasureMode,

    /// Count what would be affected without mutating anything
    #[serde(default)]
    pub dry_run: bool,
}

impl ErasureRequest {
    /// Creates a new, non-dry-run request
    pub fn new(subject_id: SubjectId, request_id: RequestId, mode: ErasureMode) -> Self {
        Self {
            subject_id,
            request_id,
            mode,
            dry_run: false,
        }
    }

    /// Sets the dry-run flag
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("anonymize".parse::<ErasureMode>(), Ok(ErasureMode::Anonymize));
        assert_eq!("DELETE".parse::<ErasureMode>(), Ok(ErasureMode::Delete));
        assert_eq!("soft_delete".parse::<ErasureMode>(), Ok(ErasureMode::Tombstone));
        assert!("purge".parse::<ErasureMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in ErasureMode::ALL {
            assert_eq!(mode.to_string().parse::<ErasureMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_mode_serde_snake_case() {
        let json = serde_json::to_string(&ErasureMode::Tombstone).unwrap();
        assert_eq!(json, "\"tombstone\"");
    }

    #[test]
    fn test_request_deserialize_defaults_dry_run() {
        let request: ErasureRequest = serde_json::from_str(
            r#"{"subject_id": "user-1", "request_id": "req-1", "mode": "delete"}"#,
        )
        .unwrap();
        assert_eq!(request.mode, ErasureMode::Delete);
        assert!(!request.dry_run);
    }
}
