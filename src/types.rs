//! Core types for backport

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// A pull request as returned by create calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Read-only snapshot of a pull request
///
/// Holds everything the pipeline reads from the host: merge status for
/// eligibility, head ref for probing, author and dates for the generated
/// PR body, and the host-computed mergeable flag when the PR is a probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Current state of the PR
    pub state: PrState,
    /// Login of the PR author (empty if the account was deleted)
    pub author: String,
    /// Head branch name, `None` when the host reports none
    pub head_ref: Option<String>,
    /// Base branch name
    pub base_ref: String,
    /// When the PR was merged; `None` means not merged
    pub merged_at: Option<DateTime<Utc>>,
    /// Merge commit SHA
    pub merge_commit_sha: Option<String>,
    /// When the PR was last updated
    pub updated_at: Option<DateTime<Utc>>,
    /// Web URL for the PR
    pub html_url: String,
    /// Whether PR can be merged (no conflicts); `None` while GitHub computes it
    pub mergeable: Option<bool>,
    /// GitHub's mergeable state descriptor (e.g. `dirty`, `clean`)
    pub mergeable_state: Option<String>,
    /// Lines added
    pub additions: Option<u64>,
    /// Lines deleted
    pub deletions: Option<u64>,
}

impl PullRequestDetails {
    /// Whether the host reports a merge timestamp
    pub const fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

/// A commit belonging to a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA
    pub sha: String,
    /// Parent commit SHAs
    pub parents: Vec<String>,
}

/// A file changed by a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangedFile {
    /// Path of the file
    pub filename: String,
    /// Change status (`added`, `modified`, `removed`, ...)
    pub status: String,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Unified diff hunk, absent for binary or very large files
    pub patch: Option<String>,
}

/// One page of a paginated pull request listing
#[derive(Debug, Clone, Default)]
pub struct PullRequestPage {
    /// Pull requests on this page, in host order
    pub items: Vec<PullRequestDetails>,
    /// Whether the host reported a further page
    pub has_next: bool,
}

/// Host-computed mergeability of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mergeable {
    /// Merges cleanly
    Clean,
    /// Has conflicts
    Conflicting,
    /// Not computed yet
    Unknown,
}

impl From<Option<bool>> for Mergeable {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Clean,
            Some(false) => Self::Conflicting,
            None => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Mergeable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Conflicting => write!(f, "conflicting"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of a cherry-pick conflict check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Whether the commits are considered to conflict with the target
    pub has_conflicts: bool,
    /// Human-readable details, in order
    pub details: Vec<String>,
    /// Number of cherry-pickable commits
    pub commits: usize,
}

/// A pull request merged within the lookback window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPr {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Author login
    pub author: String,
    /// Merge time, RFC 3339
    pub merged_at: String,
    /// Merge commit SHA
    pub merge_sha: String,
}

impl MergedPr {
    /// Build from a snapshot; callers only pass merged PRs
    pub fn from_details(pr: &PullRequestDetails) -> Self {
        Self {
            number: pr.number,
            title: pr.title.clone(),
            author: pr.author.clone(),
            merged_at: pr
                .merged_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            merge_sha: pr.merge_commit_sha.clone().unwrap_or_default(),
        }
    }
}

/// A created cherry-pick pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CherryPickPr {
    /// Number of the new PR
    pub pr_number: u64,
    /// Title of the new PR
    pub title: String,
    /// Web URL of the new PR
    pub url: String,
    /// Head branch of the new PR
    pub branch: String,
}
