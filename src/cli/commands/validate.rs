//! Validate config command implementation
//!
//! Loads the configuration and runs the catalog, order and rule checks
//! without touching the store.

use super::{EXIT_CONFIG_ERROR, EXIT_OK};
use crate::config::{load_config, AuditSinkKind};
use crate::core::schema::Applicability;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let built = match config.build_catalog() {
            Ok(b) => b,
            Err(e) => {
                println!("Schema catalog validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("Schema catalog is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Forced Dry Run: {}", config.application.dry_run);
        println!(
            "  Store: {}",
            config
                .store
                .connection_string
                .expose_secret()
                .as_ref()
                .split('@')
                .next_back()
                .unwrap_or("***")
        );
        println!("  Max Connections: {}", config.store.max_connections);
        match config.audit.sink {
            AuditSinkKind::PostgreSQL => println!("  Audit: table {}", config.audit.table),
            AuditSinkKind::File => println!("  Audit: file {}", config.audit.log_path.display()),
        }
        println!(
            "  Max Concurrent Requests: {}",
            config.cascade.max_concurrent_requests
        );
        println!("  Cascade Order:");
        for (i, entity) in built.order.iter().enumerate() {
            let detail = match built.catalog.applicability(entity) {
                Applicability::Applicable(descriptor) => format!(
                    "subject field '{}', {} PII field(s)",
                    descriptor.subject_field().unwrap_or_default(),
                    descriptor.pii_fields().len()
                ),
                Applicability::NoSubjectLink => "no subject link, skipped".to_string(),
                Applicability::Undeclared => "undeclared".to_string(),
            };
            println!("    {}. {entity} ({detail})", i + 1);
        }
        println!();

        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[store]
connection_string = "postgresql://app:pw@localhost:5432/app"

[cascade]
order = ["jobs"]

[[entities]]
name = "jobs"
subject_field = "user_id"
pii_fields = ["user_id"]

[entities.rules]
user_id = { kind = "hash" }
"#;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_valid_config() {
        let file = write_config(VALID);
        let code = ValidateArgs {}
            .execute(&file.path().display().to_string())
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[tokio::test]
    async fn test_missing_rule_is_config_error() {
        let file = write_config(&VALID.replace("user_id = { kind = \"hash\" }", ""));
        let code = ValidateArgs {}
            .execute(&file.path().display().to_string())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
