//! Read-only repository queries.
//!
//! Nothing here is cached: the repository can change between two questions,
//! so every query asks git afresh.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use anyhow::bail;
use log::warn;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;

/// Preferred merge-safety references, in priority order.
pub const PRIMARY_BRANCH_CANDIDATES: [&str; 3] = ["develop", "main", "master"];

/// One-line summaries of the commits a branch has on top of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummaries(String);

impl CommitSummaries {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.lines().map(str::trim).filter(|line| !line.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Top-level directory of the working tree, `None` outside a repository.
    pub async fn repo_root(&self) -> Result<Option<PathBuf>> {
        let output = self.git(&["rev-parse", "--show-toplevel"]).await?;
        if !output.success() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(output.stdout.trim())))
    }

    pub async fn current_branch(&self) -> Result<String> {
        let output = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        if !output.success() {
            bail!("Cannot resolve current branch: {}", output.error_text());
        }
        let branch = output.stdout.trim();
        if branch == "HEAD" {
            bail!("HEAD is detached");
        }
        Ok(branch.to_string())
    }

    /// Branch heads only; a detached HEAD is not a branch.
    pub async fn list_local_branches(&self) -> Result<BTreeSet<String>> {
        let output = self
            .git(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])
            .await?;
        if !output.success() {
            bail!("git for-each-ref failed: {}", output.error_text());
        }
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Names of the configured remotes.
    pub async fn list_remotes(&self) -> Result<Vec<String>> {
        let output = self.git(&["remote"]).await?;
        if !output.success() {
            bail!("git remote failed: {}", output.error_text());
        }
        Ok(output.stdout.split_whitespace().map(str::to_string).collect())
    }

    /// Branches present on `remote` right now, as reported by the remote itself.
    pub async fn list_remote_branches(&self, remote: &str) -> Result<BTreeSet<String>> {
        let output = self.git(&["ls-remote", "--heads", remote]).await?;
        if !output.success() {
            bail!("Cannot list branches on {}: {}", remote, output.error_text());
        }
        Ok(output
            .stdout
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .filter_map(|refname| refname.strip_prefix("refs/heads/"))
            .map(str::to_string)
            .collect())
    }

    /// Check if `source` is fully merged into `target`.
    /// Returns true if every commit reachable from `source` is reachable from `target`.
    pub async fn is_ancestor(&self, source: &str, target: &str) -> Result<bool> {
        let output = self
            .git(&["merge-base", "--is-ancestor", source, target])
            .await?;

        // Exit code 0 means it is an ancestor, 1 means it's not
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => bail!(
                "Cannot compare {} with {}: {}",
                source,
                target,
                output.error_text()
            ),
        }
    }

    /// Commits reachable from `source` but not from `target`.
    pub async fn unique_commits(&self, source: &str, target: &str) -> Result<CommitSummaries> {
        let range = format!("{target}..{source}");
        let output = self.git(&["log", "--oneline", &range]).await?;
        if !output.success() {
            bail!("{}", output.error_text());
        }
        Ok(CommitSummaries(output.stdout))
    }

    /// Whether there is nothing to commit. A failed status counts as dirty.
    pub async fn is_working_tree_clean(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain"]).await?;
        if !output.success() {
            warn!("git status failed, treating tree as dirty: {}", output.error_text());
            return Ok(false);
        }
        Ok(output.stdout.trim().is_empty())
    }

    /// First of develop, main, master that exists locally, else any local branch.
    ///
    /// `exclude` is never returned, so a branch is never its own reference.
    pub async fn choose_primary_branch(&self, exclude: Option<&str>) -> Result<Option<String>> {
        let locals = self.list_local_branches().await?;
        let eligible = |branch: &str| Some(branch) != exclude;

        if let Some(candidate) = PRIMARY_BRANCH_CANDIDATES
            .into_iter()
            .find(|candidate| eligible(candidate) && locals.contains(*candidate))
        {
            return Ok(Some(candidate.to_string()));
        }

        Ok(locals
            .iter()
            .map(String::as_str)
            .find(|branch| eligible(branch))
            .map(str::to_string))
    }
}
