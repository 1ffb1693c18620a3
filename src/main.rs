use anyhow::Result;
use branchguard::App;
use branchguard::Config;
use branchguard::commands::view::DEFAULT_HISTORY_LENGTH;
use branchguard::ops::git::RealGit;
use branchguard::ops::prompt::TerminalPrompter;
use branchguard::outcome::Scope;
use clap::Parser;
use clap::Subcommand;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Parser)]
#[command(name = "branchguard")]
#[command(about = "Safe branch deletion and staging-to-main promotion for git", long_about = None)]
pub struct Cli {
    /// Remote to operate on (defaults to git config branchguard.remote, then origin)
    #[arg(long, global = true)]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete a branch locally and/or on the remote, with safeguards
    Delete {
        /// Branch to delete
        branch: String,
        /// Which copies of the branch to delete
        #[arg(short, long, value_enum, default_value_t = Scope::Local)]
        scope: Scope,
    },
    /// Merge staging into main (or master) and push it, with safeguards
    Promote,
    /// Show working tree status
    Status,
    /// Show local and remote branches
    Branches,
    /// Show the commit graph
    History {
        /// Number of commits to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LENGTH)]
        count: usize,
    },
    /// Pull the current branch
    Pull,
    /// Create and check out a new branch, then offer to push it
    CreateBranch {
        /// Name of the new branch
        name: String,
    },
    /// Stage and commit all changes, then offer to push
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Merge a branch into another
    Merge {
        /// Branch to merge from
        source: String,
        /// Branch to merge into
        #[arg(long)]
        into: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    if !RealGit::is_available().await {
        eprintln!("'git' executable not found in PATH. Please ensure git is installed.");
        std::process::exit(1);
    }

    let git = RealGit::new();
    let mut config = Config::load(&git).await?;
    if let Some(remote) = cli.remote {
        config.remote = remote;
    }
    let app = App::new(config, git, TerminalPrompter);
    let stdout = &mut std::io::stdout();

    let aborted = match cli.command {
        Some(Commands::Delete { branch, scope }) => {
            app.cmd_delete(scope, &branch, stdout).await?.is_aborted()
        }
        Some(Commands::Promote) => app.cmd_promote(stdout).await?.is_aborted(),
        Some(Commands::Status) => {
            app.cmd_status(stdout).await?;
            false
        }
        Some(Commands::Branches) => {
            app.cmd_branches(stdout).await?;
            false
        }
        Some(Commands::History { count }) => {
            app.cmd_history(count, stdout).await?;
            false
        }
        Some(Commands::Pull) => app.cmd_pull(stdout).await?.is_aborted(),
        Some(Commands::CreateBranch { name }) => {
            app.cmd_create_branch(&name, stdout).await?.is_aborted()
        }
        Some(Commands::Commit { message }) => {
            app.cmd_commit(&message, stdout).await?.is_aborted()
        }
        Some(Commands::Merge { source, into }) => {
            app.cmd_merge(&source, &into, stdout).await?.is_aborted()
        }
        None => {
            app.cmd_menu(stdout).await?;
            false
        }
    };

    if aborted {
        std::process::exit(1);
    }
    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings).
fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}
