#![allow(async_fn_in_trait)]

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use log::debug;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;

// -----------------------------------------------------------------------------
// GitOps trait

/// Executes the git CLI.
///
/// A non-zero exit is not an error: it is reported through [`GitOutput`] so
/// callers can decide what a failure means. `Err` is reserved for failing to
/// run git at all.
#[cfg_attr(test, automock)]
pub trait GitOps {
    async fn run(&self, args: &[String]) -> Result<GitOutput>;
}

/// Captured result of a single git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if git was terminated by a signal.
    pub code: Option<i32>,
}

impl GitOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stderr, falling back to stdout when git wrote its complaint there.
    pub fn error_text(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit {
    path: Option<PathBuf>,
}

impl RealGit {
    /// Run git in the process's current directory.
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Run git inside `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Whether a git executable can be launched at all.
    pub async fn is_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl Default for RealGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOps for RealGit {
    async fn run(&self, args: &[String]) -> Result<GitOutput> {
        debug!("git {}", args.join(" "));

        let mut command = Command::new("git");
        if let Some(path) = &self.path {
            command.current_dir(path);
        }
        let output = command
            .args(args)
            .output()
            .await
            .context("Failed to execute git command")?;

        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }
}
