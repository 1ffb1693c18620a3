use std::io::Write;

use anyhow::Result;

use crate::App;
use crate::gate::Action;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::outcome::Abort;
use crate::outcome::Outcome;
use crate::ui;

impl<G: GitOps, P: Prompter> App<G, P> {
    pub async fn cmd_pull(&self, stdout: &mut impl Write) -> Result<Outcome> {
        let current = self.current_branch().await?;
        if !self.confirm(
            Action::Pull,
            &format!("Pull latest changes into '{current}'?"),
        )? {
            return Ok(Outcome::Aborted(Abort::Declined));
        }
        if !self.git_reported(&["pull"], stdout).await?.success() {
            return Ok(Outcome::Aborted(Abort::Failed));
        }
        Ok(Outcome::Done)
    }

    /// Create `name` from the current commit and check it out, then offer to publish it.
    pub async fn cmd_create_branch(&self, name: &str, stdout: &mut impl Write) -> Result<Outcome> {
        let name = name.trim();
        if name.is_empty() {
            ui::failure(stdout, "Branch name cannot be empty.")?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        }
        if !self.require_repository(stdout).await? {
            return Ok(Outcome::Aborted(Abort::Precondition));
        }
        if !self
            .git_reported(&["checkout", "-b", name], stdout)
            .await?
            .success()
        {
            return Ok(Outcome::Aborted(Abort::Failed));
        }

        let remote = &self.config.remote;
        if self.confirm(Action::Push, "Push new branch to remote?")?
            && !self
                .git_reported(&["push", "-u", remote, name], stdout)
                .await?
                .success()
        {
            return Ok(Outcome::Aborted(Abort::Failed));
        }
        Ok(Outcome::Done)
    }

    /// Stage everything, commit it, then offer to push.
    pub async fn cmd_commit(&self, message: &str, stdout: &mut impl Write) -> Result<Outcome> {
        let message = message.trim();
        if message.is_empty() {
            ui::failure(stdout, "Commit message cannot be empty.")?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        }
        if !self.require_repository(stdout).await? {
            return Ok(Outcome::Aborted(Abort::Precondition));
        }
        for args in [vec!["add", "."], vec!["commit", "-m", message]] {
            if !self.git_reported(&args, stdout).await?.success() {
                return Ok(Outcome::Aborted(Abort::Failed));
            }
        }

        if self.confirm(Action::Push, "Push changes to remote?")?
            && !self.git_reported(&["push"], stdout).await?.success()
        {
            return Ok(Outcome::Aborted(Abort::Failed));
        }
        Ok(Outcome::Done)
    }

    /// Merge `source` into `target` after bringing `target` up to date.
    pub async fn cmd_merge(
        &self,
        source: &str,
        target: &str,
        stdout: &mut impl Write,
    ) -> Result<Outcome> {
        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() || target.is_empty() {
            ui::failure(stdout, "Branch names cannot be empty.")?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        }
        if !self.confirm(
            Action::Merge,
            &format!("Merge '{source}' into '{target}'?"),
        )? {
            return Ok(Outcome::Aborted(Abort::Declined));
        }

        for args in [vec!["checkout", target], vec!["pull"]] {
            if !self.git_reported(&args, stdout).await?.success() {
                return Ok(Outcome::Aborted(Abort::Failed));
            }
        }
        if !self.git_reported(&["merge", source], stdout).await?.success() {
            ui::failure(stdout, "Merge failed or produced conflicts. Resolve manually.")?;
            return Ok(Outcome::Aborted(Abort::MergeConflict));
        }

        if self.confirm(Action::Push, "Push merged changes to remote?")?
            && !self.git_reported(&["push"], stdout).await?.success()
        {
            return Ok(Outcome::Aborted(Abort::Failed));
        }
        Ok(Outcome::Done)
    }

    async fn require_repository(&self, stdout: &mut impl Write) -> Result<bool> {
        if self.repo_root().await?.is_none() {
            ui::failure(stdout, "Not inside a Git repository.")?;
            return Ok(false);
        }
        Ok(true)
    }
}
