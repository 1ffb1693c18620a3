use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use log::info;
use tokio::io::AsyncWriteExt;

/// Append-only record of destructive actions that actually happened.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Log stored at `log_file` under the repository root.
    pub fn new(repo_root: &Path, log_file: &Path) -> Self {
        Self {
            path: repo_root.join(log_file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    pub async fn record(&self, message: &str) -> Result<()> {
        info!("audit: {message}");

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(format_entry(Utc::now(), message).as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}

/// `[2024-05-01T12:00:00Z] message\n`
pub fn format_entry(at: DateTime<Utc>, message: &str) -> String {
    format!("[{}] {}\n", at.format("%Y-%m-%dT%H:%M:%SZ"), message)
}
