use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::ops::git::GitOps;

/// Branches that need an elevated confirmation before they can be deleted.
pub const DEFAULT_PROTECTED_BRANCHES: [&str; 7] = [
    "main",
    "master",
    "develop",
    "production",
    "prod",
    "staging",
    "release",
];

pub const DEFAULT_REMOTE: &str = "origin";

/// Audit log location, relative to the repository root.
pub const DEFAULT_LOG_FILE: &str = ".git/branchguard.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub protected_branches: BTreeSet<String>,
    pub remote: String,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protected_branches: DEFAULT_PROTECTED_BRANCHES
                .iter()
                .map(|b| b.to_string())
                .collect(),
            remote: DEFAULT_REMOTE.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load config from git config, on top of the defaults.
    ///
    /// `branchguard.protected` may be given several times and only ever adds
    /// to the default protected set.
    pub async fn load(git: &impl GitOps) -> Result<Self> {
        let mut config = Self::default();

        for branch in read_values(git, "branchguard.protected").await? {
            config.protected_branches.insert(branch);
        }
        if let Some(remote) = read_values(git, "branchguard.remote").await?.pop() {
            config.remote = remote;
        }
        if let Some(log_file) = read_values(git, "branchguard.logFile").await?.pop() {
            config.log_file = PathBuf::from(log_file);
        }

        Ok(config)
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(
        protected_branches: impl IntoIterator<Item = impl Into<String>>,
        remote: impl Into<String>,
        log_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            protected_branches: protected_branches.into_iter().map(Into::into).collect(),
            remote: remote.into(),
            log_file: log_file.into(),
        }
    }
}

/// All values of a git config key; an unset key yields nothing.
async fn read_values(git: &impl GitOps, key: &str) -> Result<Vec<String>> {
    let output = git
        .run(&["config".to_string(), "--get-all".to_string(), key.to_string()])
        .await?;

    // Exit code 1 means the key is not set
    if !output.success() {
        return Ok(vec![]);
    }

    Ok(output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
