//! Erase and preview commands

use super::{
    build_orchestrator, TargetArgs, EXIT_COMPLETED_WITH_ERRORS, EXIT_CONFIG_ERROR, EXIT_FATAL,
    EXIT_INTERRUPTED, EXIT_OK,
};
use crate::config::load_config;
use crate::core::cascade::{CascadeOrchestrator, CascadeResult};
use crate::domain::{ErasureError, ErasureRequest, RequestId, SubjectId};
use clap::Args;
use serde_json::json;
use std::io::{self, Write};
use tokio::sync::watch;

/// Arguments for the erase command
#[derive(Args, Debug)]
pub struct EraseArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Privacy request identifier (defaults to a fresh UUID; single subject only)
    #[arg(long)]
    pub request_id: Option<String>,

    /// Count affected rows without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl PreviewArgs {
    /// Execute the preview command as a dry-run erase
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        EraseArgs {
            target: self.target.clone(),
            request_id: None,
            dry_run: true,
            yes: true,
        }
        .execute(config_path, shutdown_signal)
        .await
    }
}

impl EraseArgs {
    /// Execute the erase command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let requests = match self.requests() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - nothing will be modified");
            eprintln!("DRY RUN - rows are counted, nothing is modified");
        }

        if !self.yes && !dry_run && !confirm(&self.target, requests.len())? {
            println!("Erasure cancelled.");
            return Ok(EXIT_OK);
        }

        let orchestrator = match build_orchestrator(&config).await {
            Ok(o) => o,
            Err(e @ (ErasureError::Validation(_) | ErasureError::Configuration(_))) => {
                crate::log_error_with_context!(&e, "Startup validation failed");
                eprintln!("Startup validation failed: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to initialize erasure engine");
                eprintln!("Failed to initialize erasure engine: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        tokio::select! {
            code = run(&orchestrator, requests) => code,
            Ok(()) = shutdown_signal.changed() => {
                tracing::warn!("Erasure interrupted; outcome unknown, safe to retry");
                eprintln!("Interrupted. Outcome unknown; re-running the same request is safe.");
                Ok(EXIT_INTERRUPTED)
            }
        }
    }

    fn requests(&self) -> Result<Vec<ErasureRequest>, String> {
        if self.request_id.is_some() && self.target.subject_id.len() > 1 {
            return Err("--request-id can only be used with a single --subject-id".to_string());
        }

        self.target
            .subject_id
            .iter()
            .map(|raw| {
                let subject_id = SubjectId::new(raw.as_str())?;
                let request_id = match &self.request_id {
                    Some(id) => RequestId::new(id.as_str())?,
                    None => RequestId::generate(),
                };
                Ok(ErasureRequest::new(subject_id, request_id, self.target.mode)
                    .with_dry_run(self.dry_run))
            })
            .collect()
    }
}

async fn run(orchestrator: &CascadeOrchestrator, requests: Vec<ErasureRequest>) -> anyhow::Result<i32> {
    if requests.len() == 1 {
        let request = &requests[0];
        return match orchestrator.erase(request).await {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(exit_code_for(std::slice::from_ref(&result)))
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Cascade aborted");
                eprintln!("Cascade aborted: {e}");
                eprintln!("Outcome unknown; re-running the same request is safe.");
                Ok(EXIT_FATAL)
            }
        };
    }

    let request_ids: Vec<String> = requests.iter().map(|r| r.request_id.to_string()).collect();
    let outcomes = orchestrator.erase_many(requests).await;

    let mut results = Vec::new();
    let mut fatal = false;
    let mut report = Vec::with_capacity(outcomes.len());

    for (request_id, outcome) in request_ids.into_iter().zip(outcomes) {
        match outcome {
            Ok(result) => {
                report.push(json!({ "request_id": request_id, "result": result }));
                results.push(result);
            }
            Err(e) => {
                fatal = true;
                report.push(json!({ "request_id": request_id, "error": e.to_string() }));
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if fatal {
        EXIT_FATAL
    } else {
        exit_code_for(&results)
    })
}

fn exit_code_for(results: &[CascadeResult]) -> i32 {
    if results.iter().all(CascadeResult::is_success) {
        EXIT_OK
    } else {
        EXIT_COMPLETED_WITH_ERRORS
    }
}

fn confirm(target: &TargetArgs, count: usize) -> anyhow::Result<bool> {
    println!("Erasure:");
    println!("  Mode: {}", target.mode);
    println!("  Subjects: {count}");
    println!();
    print!("This permanently changes stored data. Proceed? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
