//! Source-control gateway
//!
//! Provides the narrow interface to the hosting API that the cherry-pick
//! pipeline needs. No business logic lives behind this trait.

mod detection;
mod factory;
mod github;

pub use detection::{detect_platform, enterprise_host, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{ChangedFile, Commit, PlatformConfig, PullRequest, PullRequestDetails, PullRequestPage};
use async_trait::async_trait;

/// Platform service trait for the operations the pipeline performs on the host
///
/// Implementations report a missing PR or ref as [`Error::NotFound`] so
/// callers can tell absence apart from transport failures.
///
/// [`Error::NotFound`]: crate::error::Error::NotFound
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get a pull request snapshot by number
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequestDetails>;

    /// List the files changed by a pull request
    async fn list_pr_files(&self, pr_number: u64) -> Result<Vec<ChangedFile>>;

    /// List the commits of a pull request in host order (merge commits included)
    async fn list_pr_commits(&self, pr_number: u64) -> Result<Vec<Commit>>;

    /// List one page (1-based) of closed pull requests, most recently updated first
    async fn list_closed_prs(&self, page: u32) -> Result<PullRequestPage>;

    /// Get the commit SHA a branch points at
    async fn get_branch_sha(&self, branch: &str) -> Result<String>;

    /// Create a branch pointing at `sha`, returning the SHA of the new ref
    async fn create_branch(&self, branch: &str, sha: &str) -> Result<String>;

    /// Create a new pull request
    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str)
    -> Result<PullRequest>;

    /// Close a pull request without merging it
    async fn close_pr(&self, pr_number: u64) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
