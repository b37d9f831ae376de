//! Verification report structures

use crate::domain::ids::EntityName;
use crate::domain::ErasureMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of post-erasure verification over a set of entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Mode the residual check was parameterized by
    pub mode: ErasureMode,

    /// Number of entities checked
    pub total_verified: usize,

    /// Entities with no residual rows
    pub passed: usize,

    /// Entities with residual rows or a failed check
    pub failed: usize,

    /// Details of every failed entity
    pub findings: Vec<VerificationFinding>,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

/// A residual-row finding for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFinding {
    pub entity: EntityName,
    pub mode: ErasureMode,
    /// Rows still matching the residual filter
    pub residual_rows: u64,
    /// Set when the count itself failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for VerificationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(
                f,
                "verification of '{}' could not complete: {error}",
                self.entity
            );
        }

        match self.mode {
            ErasureMode::Tombstone => write!(
                f,
                "verification failed for '{}': {} row(s) linked to the subject are not tombstoned",
                self.entity, self.residual_rows
            ),
            ErasureMode::Delete | ErasureMode::Anonymize => write!(
                f,
                "verification failed for '{}': {} row(s) still linked to the subject after {}",
                self.entity, self.residual_rows, self.mode
            ),
        }
    }
}

impl VerificationReport {
    /// Create an empty report
    pub fn new(mode: ErasureMode) -> Self {
        Self {
            verified_at: Utc::now(),
            mode,
            total_verified: 0,
            passed: 0,
            failed: 0,
            findings: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record an entity with no residual rows
    pub fn record_pass(&mut self) {
        self.total_verified += 1;
        self.passed += 1;
    }

    /// Record a failed entity
    pub fn record_failure(&mut self, finding: VerificationFinding) {
        self.total_verified += 1;
        self.failed += 1;
        self.findings.push(finding);
    }

    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Whether every entity verified clean
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Findings rendered as error strings
    pub fn error_messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    /// Human-readable summary
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("📊 Verification Report\n");
        summary.push_str(&format!("  Mode: {}\n", self.mode));
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Entities verified: {}\n", self.total_verified));
        summary.push_str(&format!("  ✅ Clean: {}\n", self.passed));
        summary.push_str(&format!("  ❌ Residual: {}\n", self.failed));

        if !self.findings.is_empty() {
            summary.push_str("\n❌ Findings:\n");
            for (i, finding) in self.findings.iter().enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, finding));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(mode: ErasureMode, residual_rows: u64) -> VerificationFinding {
        VerificationFinding {
            entity: EntityName::new("jobs").unwrap(),
            mode,
            residual_rows,
            error: None,
        }
    }

    #[test]
    fn test_new_report_is_success() {
        let report = VerificationReport::new(ErasureMode::Delete);
        assert_eq!(report.total_verified, 0);
        assert!(report.findings.is_empty());
        assert!(report.is_success());
    }

    #[test]
    fn test_record_pass_and_failure() {
        let mut report = VerificationReport::new(ErasureMode::Delete);
        report.record_pass();
        report.record_failure(finding(ErasureMode::Delete, 2));

        assert_eq!(report.total_verified, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.is_success());
        assert_eq!(report.error_messages().len(), 1);
    }

    #[test]
    fn test_finding_messages_depend_on_mode() {
        let delete = finding(ErasureMode::Delete, 2).to_string();
        assert!(delete.contains("'jobs'"));
        assert!(delete.contains("still linked"));

        let tombstone = finding(ErasureMode::Tombstone, 1).to_string();
        assert!(tombstone.contains("not tombstoned"));

        let errored = VerificationFinding {
            error: Some("timeout".to_string()),
            ..finding(ErasureMode::Anonymize, 0)
        };
        assert!(errored.to_string().contains("could not complete: timeout"));
    }

    #[test]
    fn test_format_summary() {
        let mut report = VerificationReport::new(ErasureMode::Tombstone);
        report.record_pass();
        report.record_failure(finding(ErasureMode::Tombstone, 1));
        report.set_duration(12);

        let summary = report.format_summary();
        assert!(summary.contains("Mode: tombstone"));
        assert!(summary.contains("Entities verified: 2"));
        assert!(summary.contains("Duration: 12 ms"));
        assert!(summary.contains("1. verification failed for 'jobs'"));
    }
}
