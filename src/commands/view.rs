use std::io::Write;

use anyhow::Result;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::ui;

/// Commits shown by `history` unless asked otherwise.
pub const DEFAULT_HISTORY_LENGTH: usize = 100;

impl<G: GitOps, P: Prompter> App<G, P> {
    pub async fn cmd_status(&self, stdout: &mut impl Write) -> Result<()> {
        ui::heading(stdout, "Git status (short + branch):")?;
        self.git_reported(&["status", "--short", "--branch"], stdout)
            .await?;
        Ok(())
    }

    pub async fn cmd_branches(&self, stdout: &mut impl Write) -> Result<()> {
        ui::heading(stdout, "Local branches (-vv):")?;
        self.git_reported(&["branch", "-vv"], stdout).await?;
        ui::heading(stdout, "Remote branches:")?;
        self.git_reported(&["branch", "-r"], stdout).await?;
        ui::heading(stdout, "All branches (local + remote):")?;
        self.git_reported(&["branch", "-a"], stdout).await?;
        Ok(())
    }

    pub async fn cmd_history(&self, count: usize, stdout: &mut impl Write) -> Result<()> {
        ui::heading(stdout, &format!("Last {count} commits (graph view):"))?;
        let limit = format!("-n{count}");
        self.git_reported(
            &["log", "--oneline", "--graph", "--decorate", "--all", &limit],
            stdout,
        )
        .await?;
        Ok(())
    }
}

/// Parse a commit count typed at the menu; blank or garbage means the default.
pub fn parse_history_length(input: &str) -> usize {
    input.trim().parse().unwrap_or(DEFAULT_HISTORY_LENGTH)
}
