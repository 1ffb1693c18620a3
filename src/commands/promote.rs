use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use tracing::instrument;

use crate::App;
use crate::gate::Action;
use crate::gate::PROMOTE_PHRASE;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::outcome::Abort;
use crate::outcome::Outcome;
use crate::ui;

pub const STAGING_BRANCH: &str = "staging";

/// Main branch names, in order of preference.
pub const MAIN_BRANCHES: [&str; 2] = ["main", "master"];

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Merge staging into main (or master) and push it.
    ///
    /// The working tree must be clean (or the operator must accept that it is
    /// not), both branches are pulled first, a backup tag of main is offered,
    /// and the fixed phrase must be typed before the merge. A failed merge
    /// never reaches the push.
    #[instrument(skip_all)]
    pub async fn cmd_promote(&self, stdout: &mut impl Write) -> Result<Outcome> {
        let Some(audit) = self.open_audit_log().await? else {
            ui::failure(stdout, "Not inside a Git repository.")?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        };
        let remote = self.config.remote.as_str();
        if !self.list_remotes().await?.iter().any(|r| r == remote) {
            ui::failure(stdout, &format!("Remote '{remote}' not configured."))?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        }

        let locals = self.list_local_branches().await?;
        let remotes = self.list_remote_branches(remote).await?;

        if !self
            .resolve_branch(STAGING_BRANCH, &locals, &remotes, stdout)
            .await?
        {
            return Ok(Outcome::Aborted(Abort::Precondition));
        }

        let Some(main) = MAIN_BRANCHES
            .into_iter()
            .find(|b| locals.contains(*b) || remotes.contains(*b))
        else {
            ui::failure(
                stdout,
                &format!("No main/master branch found locally or on {remote}. Aborting."),
            )?;
            return Ok(Outcome::Aborted(Abort::Precondition));
        };
        if !self.resolve_branch(main, &locals, &remotes, stdout).await? {
            return Ok(Outcome::Aborted(Abort::Precondition));
        }

        if !self.is_working_tree_clean().await? {
            ui::warning(
                stdout,
                &format!(
                    "Working tree is not clean. Commit or stash changes before deploying to {main}."
                ),
            )?;
            if !self.confirm(
                Action::ProceedWithDirtyTree,
                "Proceed despite uncommitted changes?",
            )? {
                writeln!(stdout, "Aborted due to dirty working tree.")?;
                return Ok(Outcome::Aborted(Abort::Declined));
            }
        }

        for branch in [STAGING_BRANCH, main] {
            for args in [vec!["checkout", branch], vec!["pull", remote, branch]] {
                if !self.git_reported(&args, stdout).await?.success() {
                    return Ok(Outcome::Aborted(Abort::Failed));
                }
            }
        }

        if self.confirm(
            Action::CreateBackupTag,
            &format!("Create a backup tag for '{main}' before merging?"),
        )? {
            self.create_backup_tag(main, &audit, stdout).await?;
        }

        ui::warning(
            stdout,
            &format!("This will merge '{STAGING_BRANCH}' into '{main}' and push to {remote}."),
        )?;
        writeln!(stdout, "To confirm, type exactly: {PROMOTE_PHRASE}")?;
        if !self.confirm(Action::Promote, "Final confirmation")? {
            writeln!(stdout, "Aborted promotion of {STAGING_BRANCH} to {main}.")?;
            return Ok(Outcome::Aborted(Abort::Declined));
        }

        let output = self.git(&["merge", STAGING_BRANCH]).await?;
        if !output.success() {
            ui::failure(
                stdout,
                "Merge failed or produced conflicts. Resolve manually, then push. Push skipped.",
            )?;
            writeln!(stdout, "{}", output.error_text())?;
            return Ok(Outcome::Aborted(Abort::MergeConflict));
        }

        let output = self.git(&["push", remote, main]).await?;
        if !output.success() {
            ui::failure(
                stdout,
                &format!("Failed to push {}: {}", main, output.error_text()),
            )?;
            return Ok(Outcome::Aborted(Abort::Failed));
        }
        ui::success(stdout, &format!("Successfully pushed '{main}' to {remote}."))?;
        audit
            .record(&format!(
                "Merged {STAGING_BRANCH} into {main} and pushed to {remote}"
            ))
            .await?;

        Ok(Outcome::Done)
    }

    /// Make sure `branch` exists locally, offering to track it from the remote.
    ///
    /// Returns false if the workflow cannot continue.
    async fn resolve_branch(
        &self,
        branch: &str,
        locals: &BTreeSet<String>,
        remotes: &BTreeSet<String>,
        stdout: &mut impl Write,
    ) -> Result<bool> {
        if locals.contains(branch) {
            return Ok(true);
        }
        let remote = &self.config.remote;
        if !remotes.contains(branch) {
            ui::failure(
                stdout,
                &format!("No {branch} branch found locally or on {remote}. Aborting."),
            )?;
            return Ok(false);
        }

        if !self.confirm(
            Action::CreateTrackingBranch,
            &format!("Local '{branch}' not found. Create tracking branch from {remote}/{branch}?"),
        )? {
            writeln!(stdout, "Aborted: no local '{branch}' branch.")?;
            return Ok(false);
        }
        let upstream = format!("{remote}/{branch}");
        Ok(self
            .git_reported(&["branch", "--track", branch, &upstream], stdout)
            .await?
            .success())
    }
}
