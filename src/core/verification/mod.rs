//! Post-erasure verification
//!
//! Counts rows still attributable to the subject after a run, with the
//! residual filter parameterized by erasure mode.

pub mod report;
pub mod verify;

pub use report::{VerificationFinding, VerificationReport};
pub use verify::Verifier;
