use std::io::Write;

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use log::warn;

use crate::App;
use crate::audit::AuditLog;
use crate::gate::Action;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::ui;

/// Namespace for recovery tags.
pub const BACKUP_TAG_PREFIX: &str = "backup/";

/// `backup/<branch>/<YYYYMMDDTHHMMSSZ>`.
pub fn backup_tag_name(branch: &str, at: DateTime<Utc>) -> String {
    format!(
        "{BACKUP_TAG_PREFIX}{branch}/{}",
        at.format("%Y%m%dT%H%M%SZ")
    )
}

/// The tag already exists by the time it is logged, so a log failure only warns.
async fn record_softly(audit: &AuditLog, message: &str) {
    if let Err(e) = audit.record(message).await {
        warn!("Failed to write audit entry {message:?}: {e:#}");
    }
}

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Tag the current tip of `branch` so it can be recovered after a destructive step.
    ///
    /// Failing to tag is reported but not fatal; the caller carries on without
    /// a backup. If the branch is on the remote the operator may publish the tag.
    pub async fn create_backup_tag(
        &self,
        branch: &str,
        audit: &AuditLog,
        stdout: &mut impl Write,
    ) -> Result<Option<String>> {
        let tag = backup_tag_name(branch, Utc::now());

        let output = self.git(&["tag", &tag, branch]).await?;
        if !output.success() {
            ui::failure(
                stdout,
                &format!("Failed to create tag {}: {}", tag, output.error_text()),
            )?;
            return Ok(None);
        }
        ui::success(stdout, &format!("Created backup tag: {tag}"))?;
        record_softly(audit, &format!("Created backup tag {tag} for branch {branch}")).await;

        let remote = &self.config.remote;
        let on_remote = match self.list_remote_branches(remote).await {
            Ok(branches) => branches.contains(branch),
            Err(e) => {
                warn!("Not offering to publish {tag}: {e:#}");
                false
            }
        };
        if on_remote
            && self.confirm(
                Action::PublishBackupTag,
                &format!("Push the backup tag to '{remote}'?"),
            )?
        {
            let output = self.git(&["push", remote, &tag]).await?;
            if output.success() {
                ui::success(stdout, &format!("Pushed tag {tag} to {remote}"))?;
                record_softly(audit, &format!("Pushed tag {tag} to {remote}")).await;
            } else {
                ui::failure(
                    stdout,
                    &format!("Failed to push tag: {}", output.error_text()),
                )?;
            }
        }

        Ok(Some(tag))
    }
}
