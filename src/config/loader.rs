//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuditSinkKind, ErasureConfig};
use super::secret::secret_string;
use crate::domain::errors::ErasureError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding configuration keys
pub const ENV_PREFIX: &str = "ERASURE_";

/// Loads configuration from a TOML file
///
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders (comment lines are left alone)
/// 3. Parses the TOML into [`ErasureConfig`]
/// 4. Applies `ERASURE_*` environment overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ErasureError::Configuration`] if any step fails. Every missing
/// environment variable is reported at once.
///
/// # Examples
///
/// ```no_run
/// use cascade_erasure::config::loader::load_config;
///
/// let config = load_config("erasure.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ErasureConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ErasureError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ErasureError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    parse_config(&contents)
}

/// Same as [`load_config`], from an in-memory TOML document
pub fn parse_config(contents: &str) -> Result<ErasureConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ErasureConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ErasureError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes `${VAR_NAME}` placeholders with environment values
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ErasureError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ErasureError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env(key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ErasureError::Configuration(format!("Invalid value '{raw}' for {ENV_PREFIX}{key}"))
        }),
        None => Ok(None),
    }
}

/// Applies `ERASURE_<SECTION>_<KEY>` environment overrides
///
/// Entities and their rules are only configurable from the file.
fn apply_env_overrides(config: &mut ErasureConfig) -> Result<()> {
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_parsed("APPLICATION_DRY_RUN")? {
        config.application.dry_run = val;
    }

    if let Some(val) = env("STORE_CONNECTION_STRING") {
        config.store.connection_string = secret_string(val);
    }
    if let Some(val) = env_parsed("STORE_MAX_CONNECTIONS")? {
        config.store.max_connections = val;
    }
    if let Some(val) = env_parsed("STORE_CONNECTION_TIMEOUT_SECONDS")? {
        config.store.connection_timeout_seconds = val;
    }
    if let Some(val) = env_parsed("STORE_STATEMENT_TIMEOUT_SECONDS")? {
        config.store.statement_timeout_seconds = val;
    }

    if let Some(val) = env("AUDIT_SINK") {
        config.audit.sink = match val.to_lowercase().as_str() {
            "postgresql" => AuditSinkKind::PostgreSQL,
            "file" => AuditSinkKind::File,
            other => {
                return Err(ErasureError::Configuration(format!(
                    "Invalid {ENV_PREFIX}AUDIT_SINK '{other}'. Must be one of: postgresql, file"
                )))
            }
        };
    }
    if let Some(val) = env("AUDIT_TABLE") {
        config.audit.table = val;
    }
    if let Some(val) = env("AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }

    if let Some(val) = env_parsed("CASCADE_MAX_CONCURRENT_REQUESTS")? {
        config.cascade.max_concurrent_requests = val;
    }

    if let Some(val) = env_parsed("LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
    if let Some(val) = env_parsed("LOGGING_JSON_CONSOLE")? {
        config.logging.json_console = val;
    }

    Ok(())
}
