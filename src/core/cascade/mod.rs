//! Cascade orchestration
//!
//! State machine per request:
//!
//! ```text
//! Initiated -> Processing(entity) -> {Success | Skipped | ErrorRecorded} -> ...
//!           -> Verifying -> Completed | CompletedWithErrors
//! ```

pub mod orchestrator;
pub mod result;

pub use orchestrator::CascadeOrchestrator;
pub use result::{CascadeResult, CascadeState, EntityOutcome};
