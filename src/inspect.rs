//! Read-only views of a single pull request

use crate::cherry_pick::Cancellation;
use crate::error::{Result, ResultExt};
use crate::platform::PlatformService;
use crate::types::{ChangedFile, PrState};
use serde::{Deserialize, Serialize};

/// Summary of a pull request and the files it touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR description, empty when none was given
    pub body: String,
    /// Open, closed or merged
    pub state: PrState,
    /// Author login
    pub author: String,
    /// Names of the changed files, in host order
    pub files: Vec<String>,
    /// Lines added
    pub additions: u64,
    /// Lines removed
    pub deletions: u64,
}

/// Fetch a PR and its changed files
pub async fn fetch_pull_request(
    platform: &dyn PlatformService,
    pr_number: u64,
    cancel: &Cancellation,
) -> Result<PullRequestSummary> {
    let pr = cancel
        .run("fetching PR", platform.get_pr(pr_number))
        .await
        .context(|| format!("failed to get PR #{pr_number}"))?;
    let files = list_files(platform, pr_number, cancel).await?;

    // The single-PR endpoint reports totals; fall back to summing per-file counts
    let additions = pr
        .additions
        .unwrap_or_else(|| files.iter().map(|f| f.additions).sum());
    let deletions = pr
        .deletions
        .unwrap_or_else(|| files.iter().map(|f| f.deletions).sum());

    Ok(PullRequestSummary {
        number: pr.number,
        title: pr.title,
        body: pr.body.unwrap_or_default(),
        state: pr.state,
        author: pr.author,
        files: files.into_iter().map(|f| f.filename).collect(),
        additions,
        deletions,
    })
}

/// Textual diff of a PR assembled from per-file patches
///
/// Files without a patch (binary or too large) are skipped.
pub async fn pull_request_diff(
    platform: &dyn PlatformService,
    pr_number: u64,
    cancel: &Cancellation,
) -> Result<String> {
    let files = list_files(platform, pr_number, cancel).await?;
    Ok(render_diff(&files))
}

/// `File: <name>\n<patch>\n` per patched file, separated by `\n---\n\n`
pub fn render_diff(files: &[ChangedFile]) -> String {
    files
        .iter()
        .filter_map(|f| {
            f.patch
                .as_ref()
                .map(|patch| format!("File: {}\n{patch}\n", f.filename))
        })
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

async fn list_files(
    platform: &dyn PlatformService,
    pr_number: u64,
    cancel: &Cancellation,
) -> Result<Vec<ChangedFile>> {
    cancel
        .run("listing PR files", platform.list_pr_files(pr_number))
        .await
        .context(|| format!("failed to list files for PR #{pr_number}"))
}
