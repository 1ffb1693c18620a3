//! In-memory doubles for workflow tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::path::Path;

use anyhow::Result;
use anyhow::bail;

use crate::audit::AuditLog;
use crate::config::DEFAULT_LOG_FILE;
use crate::gate::Confirmation;
use crate::ops::git::GitOps;
use crate::ops::git::GitOutput;
use crate::ops::prompt::Prompter;

// -----------------------------------------------------------------------------
// FakeGit

/// State of the simulated repository.
pub struct FakeRepo {
    pub current: String,
    pub local: BTreeSet<String>,
    pub remote: BTreeSet<String>,
    pub remotes: Vec<String>,
    /// Branches that are ancestors of every other branch.
    pub merged: BTreeSet<String>,
    /// Commits only found on a branch.
    pub unique: BTreeMap<String, Vec<String>>,
    pub dirty: bool,
    /// Commands (matched by prefix) that exit non-zero.
    pub fail: Vec<String>,
}

impl Default for FakeRepo {
    fn default() -> Self {
        Self {
            current: "main".to_string(),
            local: BTreeSet::new(),
            remote: BTreeSet::new(),
            remotes: vec!["origin".to_string()],
            merged: BTreeSet::new(),
            unique: BTreeMap::new(),
            dirty: false,
            fail: vec![],
        }
    }
}

impl FakeRepo {
    pub fn local(&mut self, branches: &[&str]) -> &mut Self {
        self.local.extend(branches.iter().map(|b| b.to_string()));
        self
    }

    pub fn remote(&mut self, branches: &[&str]) -> &mut Self {
        self.remote.extend(branches.iter().map(|b| b.to_string()));
        self
    }

    pub fn current(&mut self, branch: &str) -> &mut Self {
        self.current = branch.to_string();
        self
    }

    pub fn merged(&mut self, branches: &[&str]) -> &mut Self {
        self.merged.extend(branches.iter().map(|b| b.to_string()));
        self
    }

    pub fn unique(&mut self, branch: &str, commits: &[&str]) -> &mut Self {
        self.unique.insert(
            branch.to_string(),
            commits.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn dirty(&mut self) -> &mut Self {
        self.dirty = true;
        self
    }

    pub fn no_remotes(&mut self) -> &mut Self {
        self.remotes.clear();
        self
    }

    pub fn fail(&mut self, command: &str) -> &mut Self {
        self.fail.push(command.to_string());
        self
    }
}

/// A git that interprets the handful of commands the workflows issue and
/// records every invocation.
pub struct FakeGit {
    root: tempfile::TempDir,
    repo: RefCell<FakeRepo>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl FakeGit {
    pub fn new(setup: impl FnOnce(&mut FakeRepo)) -> Self {
        let mut repo = FakeRepo::default();
        setup(&mut repo);
        Self {
            root: tempfile::tempdir().unwrap(),
            repo: RefCell::new(repo),
            calls: RefCell::new(vec![]),
        }
    }

    pub fn audit_log(&self) -> AuditLog {
        AuditLog::new(self.root.path(), Path::new(DEFAULT_LOG_FILE))
    }

    pub fn audit_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.audit_log().path())
            .map(|contents| contents.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn ran(&self, args: &[&str]) -> bool {
        self.calls.borrow().iter().any(|call| call == args)
    }

    /// Invocations that change the repository or the remote, space-joined.
    pub fn mutations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| is_mutation(call))
            .map(|call| call.join(" "))
            .collect()
    }

    pub fn local_branches(&self) -> BTreeSet<String> {
        self.repo.borrow().local.clone()
    }

    pub fn current_branch(&self) -> String {
        self.repo.borrow().current.clone()
    }
}

fn is_mutation(call: &[String]) -> bool {
    match call.first().map(String::as_str) {
        Some("checkout" | "tag" | "push" | "pull" | "merge" | "add" | "commit") => true,
        Some("branch") => matches!(
            call.get(1).map(String::as_str),
            Some("-d" | "-D" | "--track")
        ),
        _ => false,
    }
}

fn lines<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(|item| format!("{item}\n")).collect()
}

impl GitOps for FakeGit {
    async fn run(&self, args: &[String]) -> Result<GitOutput> {
        self.calls.borrow_mut().push(args.to_vec());

        let joined = args.join(" ");
        let mut repo = self.repo.borrow_mut();
        if repo.fail.iter().any(|prefix| joined.starts_with(prefix.as_str())) {
            return Ok(GitOutput::failed(1, format!("error: {joined} failed")));
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = match args.as_slice() {
            ["rev-parse", "--show-toplevel"] => {
                GitOutput::ok(format!("{}\n", self.root.path().display()))
            }
            ["rev-parse", "--abbrev-ref", "HEAD"] => GitOutput::ok(format!("{}\n", repo.current)),
            ["for-each-ref", "--format=%(refname:short)", "refs/heads/"] => {
                GitOutput::ok(lines(&repo.local))
            }
            ["remote"] => GitOutput::ok(lines(&repo.remotes)),
            ["ls-remote", "--heads", remote] => {
                if repo.remotes.iter().any(|r| r == remote) {
                    GitOutput::ok(
                        repo.remote
                            .iter()
                            .map(|b| format!("{:040}\trefs/heads/{b}\n", 0))
                            .collect::<String>(),
                    )
                } else {
                    GitOutput::failed(
                        128,
                        format!("fatal: '{remote}' does not appear to be a git repository"),
                    )
                }
            }
            ["merge-base", "--is-ancestor", source, _] => {
                if repo.merged.contains(*source) {
                    GitOutput::ok("")
                } else {
                    GitOutput::failed(1, "")
                }
            }
            ["log", "--oneline", range] => {
                let source = range.split("..").nth(1).unwrap_or_default();
                GitOutput::ok(
                    repo.unique
                        .get(source)
                        .map(|commits| lines(commits))
                        .unwrap_or_default(),
                )
            }
            ["status", "--porcelain"] => {
                GitOutput::ok(if repo.dirty { " M src/lib.rs\n" } else { "" })
            }
            ["checkout", branch] => {
                if repo.local.contains(*branch) {
                    repo.current = branch.to_string();
                    GitOutput::ok("")
                } else {
                    GitOutput::failed(
                        1,
                        format!("error: pathspec '{branch}' did not match any file(s) known to git"),
                    )
                }
            }
            ["checkout", "-b", branch] => {
                if repo.local.insert(branch.to_string()) {
                    repo.current = branch.to_string();
                    GitOutput::ok("")
                } else {
                    GitOutput::failed(
                        128,
                        format!("fatal: a branch named '{branch}' already exists"),
                    )
                }
            }
            ["commit", "-m", _] => {
                if repo.dirty {
                    repo.dirty = false;
                    GitOutput::ok("")
                } else {
                    GitOutput::failed(1, "nothing to commit, working tree clean")
                }
            }
            ["branch", "-d", branch] => {
                if repo.merged.contains(*branch) {
                    repo.local.remove(*branch);
                    GitOutput::ok(format!("Deleted branch {branch}\n"))
                } else {
                    GitOutput::failed(
                        1,
                        format!("error: the branch '{branch}' is not fully merged"),
                    )
                }
            }
            ["branch", "-D", branch] => {
                repo.local.remove(*branch);
                GitOutput::ok(format!("Deleted branch {branch}\n"))
            }
            ["branch", "--track", branch, _] => {
                repo.local.insert(branch.to_string());
                GitOutput::ok("")
            }
            ["push", _, "--delete", branch] => {
                repo.remote.remove(*branch);
                GitOutput::ok("")
            }
            _ => GitOutput::ok(""),
        };
        Ok(output)
    }
}

// -----------------------------------------------------------------------------
// ScriptedPrompter

/// Answers prompts from a fixed script, recording every question asked.
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            prompts: RefCell::new(vec![]),
        }
    }

    /// A prompter that must never be asked anything.
    pub fn silent() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    fn next(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("No scripted answer for prompt: {prompt}"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_yes_no(&self, prompt: &str) -> Result<bool> {
        Ok(Confirmation::YesNo.accepts(&self.next(prompt)?))
    }

    fn ask_exact_text(&self, prompt: &str, expected: &str) -> Result<bool> {
        Ok(Confirmation::ExactText(expected.to_string()).accepts(&self.next(prompt)?))
    }

    fn ask_text(&self, prompt: &str) -> Result<String> {
        Ok(self.next(prompt)?.trim().to_string())
    }
}
