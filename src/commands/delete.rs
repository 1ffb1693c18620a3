use std::io::Write;

use anyhow::Result;
use tracing::instrument;

use crate::App;
use crate::audit::AuditLog;
use crate::gate::Action;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::outcome::Abort;
use crate::outcome::DeleteReport;
use crate::outcome::Outcome;
use crate::outcome::Scope;
use crate::ui;

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Delete a branch locally, on the remote, or both.
    ///
    /// 1. A protected branch must first be confirmed with `DELETE <branch>`.
    /// 2. Locally, a branch merged into the primary branch is deleted with
    ///    `branch -d` after a yes/no. Anything else shows the commits that would
    ///    be lost, offers a backup tag, and needs the branch name typed before
    ///    `branch -D`.
    /// 3. On the remote, the branch name must always be typed.
    #[instrument(skip_all, fields(branch = %branch, scope = ?scope))]
    pub async fn cmd_delete(
        &self,
        scope: Scope,
        branch: &str,
        stdout: &mut impl Write,
    ) -> Result<DeleteReport> {
        let branch = branch.trim();
        if branch.is_empty() {
            ui::failure(stdout, "Branch name cannot be empty.")?;
            return Ok(DeleteReport::aborted(scope, Abort::Precondition));
        }
        let Some(audit) = self.open_audit_log().await? else {
            ui::failure(stdout, "Not inside a Git repository.")?;
            return Ok(DeleteReport::aborted(scope, Abort::Precondition));
        };

        let current = self.current_branch().await.ok();
        writeln!(
            stdout,
            "Current branch: {}",
            current.as_deref().unwrap_or("(none)")
        )?;

        if self.gate.is_protected(branch) {
            ui::warning(stdout, &format!("'{branch}' is a protected branch."))?;
            writeln!(stdout, "To proceed you must type exactly: DELETE {branch}")?;
            if !self.confirm(
                Action::DeleteProtected(branch),
                "Protected-branch deletion confirmation",
            )? {
                writeln!(stdout, "Aborted protected-branch deletion.")?;
                return Ok(DeleteReport::aborted(scope, Abort::Declined));
            }
        }

        let mut report = DeleteReport {
            local: None,
            remote: None,
        };
        if scope.includes_local() {
            report.local = Some(
                self.delete_local(branch, current.as_deref(), &audit, stdout)
                    .await?,
            );
        }
        if scope.includes_remote() {
            report.remote = Some(self.delete_remote(branch, &audit, stdout).await?);
        }
        Ok(report)
    }

    async fn delete_local(
        &self,
        branch: &str,
        current: Option<&str>,
        audit: &AuditLog,
        stdout: &mut impl Write,
    ) -> Result<Outcome> {
        if !self.list_local_branches().await?.contains(branch) {
            ui::notice(stdout, &format!("Local branch '{branch}' not found."))?;
            return Ok(Outcome::Skipped);
        }

        if current == Some(branch) {
            ui::failure(
                stdout,
                "You are currently on the branch you want to delete.",
            )?;
            let Some(safe_target) = self.choose_primary_branch(Some(branch)).await? else {
                writeln!(stdout, "No other local branch to switch to.")?;
                return Ok(Outcome::Aborted(Abort::Precondition));
            };
            writeln!(stdout, "Suggested safe branch to switch to: {safe_target}")?;
            if !self.confirm(
                Action::SwitchBranch,
                &format!("Switch to '{safe_target}' and continue?"),
            )? {
                writeln!(
                    stdout,
                    "Aborted: check out a different branch before deleting."
                )?;
                return Ok(Outcome::Aborted(Abort::Declined));
            }
            if !self
                .git_reported(&["checkout", &safe_target], stdout)
                .await?
                .success()
            {
                return Ok(Outcome::Aborted(Abort::Failed));
            }
        }

        let primary = self.choose_primary_branch(Some(branch)).await?;
        let merged = match &primary {
            Some(primary) => self.is_ancestor(branch, primary).await?,
            None => false,
        };

        if let (true, Some(primary)) = (merged, &primary) {
            ui::success(
                stdout,
                &format!("Branch '{branch}' is merged into '{primary}'. Safe to delete locally."),
            )?;
            if !self.confirm(
                Action::DeleteMergedLocal,
                &format!("Delete local branch '{branch}'?"),
            )? {
                writeln!(stdout, "Aborted local deletion.")?;
                return Ok(Outcome::Aborted(Abort::Declined));
            }
            return self
                .run_delete(&["branch", "-d", branch], audit, stdout, || {
                    (
                        format!("Deleted local branch '{branch}'."),
                        format!("Deleted local branch {branch}"),
                    )
                })
                .await;
        }

        match &primary {
            Some(primary) => ui::warning(
                stdout,
                &format!("Branch '{branch}' is NOT merged into '{primary}'."),
            )?,
            None => ui::warning(
                stdout,
                "Could not determine a primary branch to check merge status.",
            )?,
        }
        self.show_unique_commits(branch, primary.as_deref().unwrap_or("HEAD"), stdout)
            .await?;

        if self.confirm(
            Action::CreateBackupTag,
            &format!("Create a backup tag for '{branch}' before deleting?"),
        )? {
            self.create_backup_tag(branch, audit, stdout).await?;
        }

        writeln!(
            stdout,
            "To force-delete this unmerged local branch, type the exact branch name."
        )?;
        if !self.confirm(
            Action::ForceDeleteUnmerged(branch),
            "Force-delete confirmation",
        )? {
            writeln!(stdout, "Aborted local deletion.")?;
            return Ok(Outcome::Aborted(Abort::Declined));
        }
        self.run_delete(&["branch", "-D", branch], audit, stdout, || {
            (
                format!("Force-deleted local branch '{branch}'."),
                format!("Force-deleted local branch {branch}"),
            )
        })
        .await
    }

    async fn delete_remote(
        &self,
        branch: &str,
        audit: &AuditLog,
        stdout: &mut impl Write,
    ) -> Result<Outcome> {
        let remote = &self.config.remote;
        if !self.list_remotes().await?.contains(remote) {
            ui::failure(
                stdout,
                &format!("Remote '{remote}' not configured; cannot delete remote branch."),
            )?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        }

        // A missing branch is only a warning; git gets the final word.
        if !self.list_remote_branches(remote).await?.contains(branch) {
            ui::notice(stdout, &format!("Remote branch '{remote}/{branch}' not found."))?;
            if !self.confirm(
                Action::AttemptMissingRemoteDelete,
                "Do you still want to attempt remote deletion?",
            )? {
                return Ok(Outcome::Aborted(Abort::Declined));
            }
        }

        writeln!(
            stdout,
            "To delete the remote branch, type the exact branch name to confirm."
        )?;
        if !self.confirm(Action::DeleteRemote(branch), "Remote-delete confirmation")? {
            writeln!(stdout, "Aborted remote deletion.")?;
            return Ok(Outcome::Aborted(Abort::Declined));
        }

        self.run_delete(&["push", remote, "--delete", branch], audit, stdout, || {
            (
                format!("Deleted remote branch '{remote}/{branch}'."),
                format!("Deleted remote branch {remote}/{branch}"),
            )
        })
        .await
    }

    /// Issue a delete command; only a successful one is audited.
    async fn run_delete(
        &self,
        args: &[&str],
        audit: &AuditLog,
        stdout: &mut impl Write,
        messages: impl FnOnce() -> (String, String),
    ) -> Result<Outcome> {
        let output = self.git(args).await?;
        if !output.success() {
            ui::failure(
                stdout,
                &format!("git {} failed: {}", args.join(" "), output.error_text()),
            )?;
            return Ok(Outcome::Aborted(Abort::Failed));
        }

        let (shown, logged) = messages();
        ui::success(stdout, &shown)?;
        audit.record(&logged).await?;
        Ok(Outcome::Done)
    }

    async fn show_unique_commits(
        &self,
        branch: &str,
        reference: &str,
        stdout: &mut impl Write,
    ) -> Result<()> {
        writeln!(stdout)?;
        writeln!(stdout, "Commits that are unique to the branch (would be lost):")?;
        match self.unique_commits(branch, reference).await {
            Ok(commits) if commits.is_empty() => writeln!(stdout, "(no unique commits)")?,
            Ok(commits) => {
                for commit in commits.iter() {
                    writeln!(stdout, "  {commit}")?;
                }
            }
            Err(e) => writeln!(stdout, "{e}")?,
        }
        Ok(())
    }
}
