//! JSON-lines audit log file

use super::{AuditEntry, AuditSink};
use crate::domain::{ErasureError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Appends one JSON object per line
///
/// Appends are serialized through a lock so lines from concurrent requests
/// never interleave.
pub struct JsonFileAuditLog {
    log_path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileAuditLog {
    /// Create the log, making sure its directory exists
    pub fn new(log_path: impl Into<PathBuf>) -> Result<Self> {
        let log_path = log_path.into();

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ErasureError::Audit(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[async_trait]
impl AuditSink for JsonFileAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .map_err(|e| {
                ErasureError::Audit(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| ErasureError::Audit(format!("Failed to write audit entry: {e}")))?;
        file.flush()
            .await
            .map_err(|e| ErasureError::Audit(format!("Failed to flush audit log: {e}")))?;

        Ok(())
    }

    fn sink_name(&self) -> &str {
        "file"
    }
}
