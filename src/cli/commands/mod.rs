//! CLI command implementations

pub mod erase;
pub mod init;
pub mod validate;
pub mod verify;

use crate::adapters::store::{create_audit_sink, create_entity_store};
use crate::config::ErasureConfig;
use crate::core::cascade::CascadeOrchestrator;
use crate::domain::{ErasureMode, Result};
use clap::Args;

/// Exit code: everything succeeded
pub const EXIT_OK: i32 = 0;
/// Exit code: completed, but errors need manual review
pub const EXIT_COMPLETED_WITH_ERRORS: i32 = 1;
/// Exit code: configuration or validation error
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code: fatal error, outcome unknown
pub const EXIT_FATAL: i32 = 5;
/// Exit code: interrupted by signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// Subject and mode shared by erase, preview and verify
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Data subject identifier (repeat for a batch)
    #[arg(long = "subject-id", required = true)]
    pub subject_id: Vec<String>,

    /// Erasure mode (anonymize, delete, tombstone)
    #[arg(long)]
    pub mode: ErasureMode,
}

/// Connect the configured store and audit sink and build the orchestrator
pub(crate) async fn build_orchestrator(config: &ErasureConfig) -> Result<CascadeOrchestrator> {
    let built = config.build_catalog()?;
    let store = create_entity_store(config).await?;
    let audit = create_audit_sink(config, &store).await?;

    Ok(CascadeOrchestrator::new(
        store,
        built.catalog,
        built.order,
        built.registry,
        audit,
    )?
    .with_max_concurrency(config.cascade.max_concurrent_requests)
    .with_forced_dry_run(config.application.dry_run))
}
