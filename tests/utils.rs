#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;

use branchguard::gate::Confirmation;
use branchguard::ops::prompt::Prompter;
use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Runs git in `dir`, failing unless it exits successfully.
pub async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    anyhow::ensure!(status.success(), "git {} failed", args.join(" "));
    Ok(())
}

/// Runs git in `dir` and returns its trimmed stdout.
pub async fn git_output(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await?;
    anyhow::ensure!(output.status.success(), "git {} failed", args.join(" "));
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Creates a git repository with `main` checked out in the given directory.
///
/// The directory should already exist.
pub async fn create_git_repo(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["init", "--initial-branch=main"]).await?;
    git(dir, &["config", "user.name", "Test User"]).await?;
    git(dir, &["config", "user.email", "test@example.com"]).await?;
    git(dir, &["config", "commit.gpgsign", "false"]).await?;
    git(dir, &["config", "tag.gpgsign", "false"]).await?;
    Ok(())
}

/// Creates a bare repository at `remote_dir` and registers it as `origin`.
pub async fn setup_git_remote(dir: &Path, remote_dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(remote_dir).await?;
    git(remote_dir, &["init", "--bare", "--initial-branch=main"]).await?;
    let url = remote_dir.to_string_lossy();
    git(dir, &["remote", "add", "origin", url.as_ref()]).await?;
    Ok(())
}

/// Writes a file and commits it on the current branch.
pub async fn create_commit(
    dir: &Path,
    message: &str,
    filename: &str,
    contents: &str,
) -> anyhow::Result<()> {
    tokio::fs::write(dir.join(filename), contents).await?;
    git(dir, &["add", filename]).await?;
    git(dir, &["commit", "-m", message]).await?;
    Ok(())
}

/// Full hash of a revision.
pub async fn rev_parse(dir: &Path, rev: &str) -> anyhow::Result<String> {
    git_output(dir, &["rev-parse", rev]).await
}

/// Whether `branch` exists locally.
pub async fn has_branch(dir: &Path, branch: &str) -> anyhow::Result<bool> {
    let refname = format!("refs/heads/{branch}");
    let status = Command::new("git")
        .args(["show-ref", "--verify", "--quiet", &refname])
        .current_dir(dir)
        .status()
        .await?;
    Ok(status.success())
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_test_writer()
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).try_init()?;
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}

/// Answers prompts from a fixed script; running out of answers is an error.
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().map(String::from).collect()),
        }
    }

    fn next(&self, prompt: &str) -> anyhow::Result<String> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer for {prompt:?}"))
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_yes_no(&self, prompt: &str) -> anyhow::Result<bool> {
        Ok(Confirmation::YesNo.accepts(&self.next(prompt)?))
    }

    fn ask_exact_text(&self, prompt: &str, expected: &str) -> anyhow::Result<bool> {
        Ok(Confirmation::ExactText(expected.to_string()).accepts(&self.next(prompt)?))
    }

    fn ask_text(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(self.next(prompt)?.trim().to_string())
    }
}
