//! Verify command implementation
//!
//! Runs only the residual-row check for a subject, without erasing anything.

use super::{
    build_orchestrator, TargetArgs, EXIT_COMPLETED_WITH_ERRORS, EXIT_CONFIG_ERROR, EXIT_FATAL,
    EXIT_OK,
};
use crate::config::load_config;
use crate::domain::{EntityName, ErasureError, ErasureRequest, RequestId, SubjectId};
use clap::Args;

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Restrict the check to these entities (repeatable)
    #[arg(long)]
    pub entity: Vec<EntityName>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl VerifyArgs {
    /// Execute the verify command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let orchestrator = match build_orchestrator(&config).await {
            Ok(o) => o,
            Err(e @ (ErasureError::Validation(_) | ErasureError::Configuration(_))) => {
                eprintln!("Startup validation failed: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to initialize erasure engine");
                eprintln!("Failed to initialize erasure engine: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let entities = (!self.entity.is_empty()).then_some(self.entity.as_slice());
        let mut exit_code = EXIT_OK;

        for raw in &self.target.subject_id {
            let subject_id = match SubjectId::new(raw.as_str()) {
                Ok(id) => id,
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
            };
            let request = ErasureRequest::new(subject_id, RequestId::generate(), self.target.mode);

            let report = match orchestrator.verify(&request, entities).await {
                Ok(report) => report,
                Err(e @ ErasureError::Validation(_)) => {
                    eprintln!("{e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
                Err(e) => {
                    crate::log_error_with_context!(&e, "Verification aborted");
                    eprintln!("Verification aborted: {e}");
                    return Ok(EXIT_FATAL);
                }
            };

            tracing::info!(
                subject_digest = %request.subject_id.digest(),
                mode = %request.mode,
                passed = report.passed,
                failed = report.failed,
                "Verification finished"
            );

            if self.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.format_summary());
            }

            if !report.is_success() {
                exit_code = EXIT_COMPLETED_WITH_ERRORS;
            }
        }

        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErasureMode;

    #[tokio::test]
    async fn test_verify_missing_config_is_config_error() {
        let args = VerifyArgs {
            target: TargetArgs {
                subject_id: vec!["user-42".to_string()],
                mode: ErasureMode::Delete,
            },
            entity: vec![],
            json: false,
        };

        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
