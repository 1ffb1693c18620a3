use std::io::Write;

use anyhow::Result;

use crate::App;
use crate::commands::view::parse_history_length;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::outcome::Scope;
use crate::ui;

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Interactive loop over every command until the operator exits.
    ///
    /// A failing command is reported and the menu comes back; only failing to
    /// read the operator's choice ends the loop.
    pub async fn cmd_menu(&self, stdout: &mut impl Write) -> Result<()> {
        loop {
            ui::heading(stdout, "branchguard (safe mode)")?;
            writeln!(stdout, "1. Create & push new branch")?;
            writeln!(stdout, "2. Commit & push changes")?;
            writeln!(stdout, "3. Merge branch into another")?;
            writeln!(stdout, "4. Pull latest changes")?;
            writeln!(stdout, "5. Git status (view)")?;
            writeln!(stdout, "6. Show branches (local & remote)")?;
            writeln!(stdout, "7. Show commit history (graph)")?;
            writeln!(stdout, "8. Delete branch (SAFE)")?;
            writeln!(stdout, "9. Push staging -> main (SAFE)")?;
            writeln!(stdout, "10. Exit")?;
            stdout.flush()?;

            let choice = self.prompt.ask_text(">")?;
            let result = match choice.as_str() {
                "1" => self.menu_create_branch(stdout).await,
                "2" => self.menu_commit(stdout).await,
                "3" => self.menu_merge(stdout).await,
                "4" => self.cmd_pull(stdout).await.map(drop),
                "5" => self.cmd_status(stdout).await,
                "6" => self.cmd_branches(stdout).await,
                "7" => self.menu_history(stdout).await,
                "8" => self.menu_delete(stdout).await,
                "9" => self.cmd_promote(stdout).await.map(drop),
                "10" => {
                    writeln!(stdout, "Exiting.")?;
                    return Ok(());
                }
                _ => ui::failure(stdout, "Invalid choice."),
            };
            if let Err(e) = result {
                ui::failure(stdout, &format!("{e:#}"))?;
            }
        }
    }

    async fn menu_create_branch(&self, stdout: &mut impl Write) -> Result<()> {
        let name = self.prompt.ask_text("Enter new branch name")?;
        self.cmd_create_branch(&name, stdout).await.map(drop)
    }

    async fn menu_commit(&self, stdout: &mut impl Write) -> Result<()> {
        let message = self.prompt.ask_text("Commit message")?;
        self.cmd_commit(&message, stdout).await.map(drop)
    }

    async fn menu_history(&self, stdout: &mut impl Write) -> Result<()> {
        let count = self
            .prompt
            .ask_text("How many commits to show (Enter for 100)")?;
        self.cmd_history(parse_history_length(&count), stdout).await
    }

    async fn menu_merge(&self, stdout: &mut impl Write) -> Result<()> {
        let target = self.prompt.ask_text("Merge into branch (e.g., develop)")?;
        let source = self.prompt.ask_text("Branch to merge from")?;
        self.cmd_merge(&source, &target, stdout).await.map(drop)
    }

    async fn menu_delete(&self, stdout: &mut impl Write) -> Result<()> {
        writeln!(stdout, "Delete branch options:")?;
        writeln!(stdout, "  1) Delete local branch")?;
        writeln!(stdout, "  2) Delete remote branch ({})", self.config.remote)?;
        writeln!(stdout, "  3) Delete both local and remote")?;
        stdout.flush()?;

        let scope = match self.prompt.ask_text(">")?.as_str() {
            "1" => Scope::Local,
            "2" => Scope::Remote,
            "3" => Scope::Both,
            _ => return ui::failure(stdout, "Invalid choice."),
        };
        let branch = self.prompt.ask_text("Branch name to delete")?;
        self.cmd_delete(scope, &branch, stdout).await.map(drop)
    }
}
