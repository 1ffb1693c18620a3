use std::io::Write;

use anyhow::Result;
use log::debug;

use crate::audit::AuditLog;
use crate::config::Config;
use crate::gate::Action;
use crate::gate::Confirmation;
use crate::gate::Gate;
use crate::ops::git::GitOps;
use crate::ops::git::GitOutput;
use crate::ops::prompt::Prompter;
use crate::ui;

pub struct App<G: GitOps, P: Prompter> {
    pub config: Config,
    pub gate: Gate,
    pub git: G,
    pub prompt: P,
}

impl<G: GitOps, P: Prompter> App<G, P> {
    pub fn new(config: Config, git: G, prompt: P) -> Self {
        Self {
            gate: Gate::new(config.protected_branches.clone()),
            config,
            git,
            prompt,
        }
    }
}

/// Shared helper methods for App
impl<G: GitOps, P: Prompter> App<G, P> {
    pub(crate) async fn git(&self, args: &[&str]) -> Result<GitOutput> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        self.git.run(&args).await
    }

    /// Run a git command, echoing its output and surfacing any failure.
    pub(crate) async fn git_reported(
        &self,
        args: &[&str],
        stdout: &mut impl Write,
    ) -> Result<GitOutput> {
        let output = self.git(args).await?;
        let text = output.stdout.trim_end();
        if !text.is_empty() {
            writeln!(stdout, "{text}")?;
        }
        if !output.success() {
            ui::failure(
                stdout,
                &format!("git {} failed: {}", args.join(" "), output.error_text()),
            )?;
        }
        Ok(output)
    }

    /// Put the confirmation protocol for `action` to the operator.
    pub(crate) fn confirm(&self, action: Action<'_>, prompt: &str) -> Result<bool> {
        let confirmed = match self.gate.requirement(action) {
            Confirmation::None => true,
            Confirmation::YesNo => self.prompt.ask_yes_no(prompt)?,
            Confirmation::ExactText(expected) => self.prompt.ask_exact_text(prompt, &expected)?,
        };
        debug!("confirmation for {action:?}: {confirmed}");
        Ok(confirmed)
    }

    /// Audit log for the current repository, or `None` outside a repository.
    pub(crate) async fn open_audit_log(&self) -> Result<Option<AuditLog>> {
        Ok(self
            .repo_root()
            .await?
            .map(|root| AuditLog::new(&root, &self.config.log_file)))
    }
}
