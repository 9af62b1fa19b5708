//! backport CLI
//!
//! Finds merged pull requests, checks whether they cherry-pick cleanly onto
//! release branches, and opens cherry-pick PRs after confirmation.

mod cli;

use anyhow::Result;
use backport::cherry_pick::Cancellation;
use backport::config::Settings;
use clap::{Parser, Subcommand};
use cli::{CommandContext, CreateOptions, OutputFormat};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backport")]
#[command(about = "Cherry-pick merged GitHub pull requests onto release branches")]
#[command(version)]
struct Cli {
    /// Repository as owner/repo or a GitHub URL
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Settings file (default: <config dir>/backport/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List PRs merged recently
    List {
        /// Lookback window in days
        #[arg(long)]
        days: Option<i64>,
    },

    /// Check whether a merged PR cherry-picks cleanly onto a branch
    Check {
        /// Merged PR number
        pr: u64,

        /// Target branch
        #[arg(long)]
        target: String,

        /// Branch the PR was expected to merge into
        #[arg(long)]
        base: Option<String>,
    },

    /// Open cherry-pick PRs for a merged PR
    Create {
        /// Merged PR number
        pr: u64,

        /// Target branch (repeatable)
        #[arg(long = "target", required = true)]
        targets: Vec<String>,

        /// Branch the PR was expected to merge into
        #[arg(long)]
        base: Option<String>,

        /// Confirm every conflict-free target without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a PR summary and optionally its diff
    Show {
        /// PR number
        pr: u64,

        /// Include the per-file diff
        #[arg(long)]
        diff: bool,
    },

    /// Check GitHub authentication
    Auth,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "backport=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(repo) = cli.repo {
        settings.repo = Some(repo);
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = Some(timeout);
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    if matches!(cli.command, Commands::Auth) {
        cli::run_auth(&settings, format).await?;
        return Ok(());
    }

    let (handle, mut cancel) = Cancellation::new();
    if let Some(secs) = settings.timeout_secs {
        cancel = cancel.with_timeout(Duration::from_secs(secs));
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let ctx = CommandContext::new(settings, cancel).await?;

    match cli.command {
        Commands::List { days } => cli::run_list(&ctx, days, format).await?,
        Commands::Check { pr, target, base } => {
            cli::run_check(&ctx, pr, &target, base.as_deref(), format).await?;
        }
        Commands::Create {
            pr,
            targets,
            base,
            yes,
        } => {
            let options = CreateOptions {
                pr_number: pr,
                targets,
                base,
                yes,
            };
            cli::run_create(&ctx, options, format).await?;
        }
        Commands::Show { pr, diff } => cli::run_show(&ctx, pr, diff, format).await?,
        Commands::Auth => {}
    }

    Ok(())
}
