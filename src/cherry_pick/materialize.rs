//! Cherry-pick materialization - effectful operations
//!
//! Turns a confirmed, conflict-free (PR, target) pair into a branch cut from
//! the target tip and a pull request documenting what should be picked onto
//! it. Everything the materializer relies on is re-verified against the host
//! before the first mutation.

use crate::cherry_pick::cancel::Cancellation;
use crate::cherry_pick::commits::cherry_pick_args;
use crate::cherry_pick::confirm::Confirmation;
use crate::cherry_pick::probe::{ProbeSchedule, load_eligible, probe_loaded};
use crate::cherry_pick::request::PickRequest;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{CherryPickPr, Commit, PullRequestDetails};
use tracing::{debug, info, warn};

/// Title of the cherry-pick PR: `[<branch>] <original title>`
pub fn cherry_pick_title(branch: &str, original_title: &str) -> String {
    format!("[{branch}] {original_title}")
}

/// Body of the cherry-pick PR documenting provenance and the manual commands
pub fn cherry_pick_body(
    pr: &PullRequestDetails,
    target: &str,
    branch: &str,
    commits: &[Commit],
) -> String {
    let merged = pr
        .merged_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!(
        "This is a cherry-pick of PR #{number} to {target}.\n\n\
         Original PR: #{number}\n\
         Original Author: @{author}\n\
         Original Merge Date: {merged}\n\
         Commits being cherry-picked: {count}\n\n\
         **Note**: This PR contains only the commits from the original PR (excluding merge commit).\n\
         To cherry-pick manually:\n\
         ```\n\
         git checkout {branch}\n\
         git cherry-pick {shas}\n\
         ```\n",
        number = pr.number,
        author = pr.author,
        count = commits.len(),
        shas = cherry_pick_args(commits),
    )
}

/// Keep cancellation visible; map anything else with `f`
fn unless_cancelled(err: Error, f: impl FnOnce(Error) -> Error) -> Error {
    if err.is_cancelled() { err } else { f(err) }
}

/// Create the cherry-pick branch and pull request for a confirmed pair (EFFECTFUL)
///
/// # Errors
/// - [`Error::NotConfirmed`] when `confirmation` does not cover the pair; no
///   host call is made
/// - [`Error::Conflict`] when the re-run conflict check finds conflicts; no
///   branch or PR is created
/// - [`Error::StaleBranch`] when the branch exists but does not point at the
///   current target tip
pub async fn create_cherry_pick_pr(
    platform: &dyn PlatformService,
    request: &PickRequest,
    confirmation: &Confirmation,
    schedule: &ProbeSchedule,
    cancel: &Cancellation,
) -> Result<CherryPickPr> {
    let pr_number = request.pr_number;
    let target = request.target_branch.as_str();

    if !confirmation.covers(pr_number, target) {
        return Err(Error::NotConfirmed {
            pr_number,
            target: target.to_string(),
        });
    }

    let (pr, commits) = load_eligible(platform, pr_number, cancel).await?;
    if pr.base_ref != request.base_branch {
        warn!(
            pr_number,
            expected = %request.base_branch,
            actual = %pr.base_ref,
            "original PR was merged into a different base branch"
        );
    }

    let report = probe_loaded(platform, request, &pr, commits.len(), schedule, cancel).await?;
    if report.has_conflicts {
        return Err(Error::Conflict {
            pr_number,
            target: target.to_string(),
            detail: report
                .details
                .into_iter()
                .next()
                .unwrap_or_else(|| "Unknown conflicts".to_string()),
        });
    }

    let branch = request.branch_name();
    let target_sha = cancel
        .run("reading target branch", platform.get_branch_sha(target))
        .await
        .map_err(|e| {
            unless_cancelled(e, |e| Error::TargetBranchNotFound {
                branch: target.to_string(),
                message: e.to_string(),
            })
        })?;
    debug!(target_branch = target, sha = %target_sha, "resolved target tip");

    ensure_branch(platform, &branch, target, &target_sha, cancel).await?;

    let title = cherry_pick_title(&branch, &pr.title);
    let body = cherry_pick_body(&pr, target, &branch, &commits);
    let created = cancel
        .run(
            "opening cherry-pick PR",
            platform.create_pr(&branch, target, &title, &body),
        )
        .await
        .map_err(|e| unless_cancelled(e, |e| Error::PullRequestCreation(e.to_string())))?;

    info!(
        pr_number,
        target_branch = target,
        cherry_pick_pr = created.number,
        branch = %branch,
        "opened cherry-pick PR"
    );

    Ok(CherryPickPr {
        pr_number: created.number,
        title: created.title,
        url: created.html_url,
        branch,
    })
}

/// Outcome of materializing every target of a [`Confirmation`]
#[derive(Debug, Default)]
pub struct CherryPickBatch {
    /// PRs opened, in confirmation order
    pub created: Vec<CherryPickPr>,
    /// First target that failed and why; later targets were not attempted
    pub failed: Option<(String, Error)>,
}

/// Open a cherry-pick PR for every confirmed target, in confirmation order
///
/// Stops at the first failure. PRs opened before it are kept in the batch so
/// callers can still report them.
pub async fn create_cherry_pick_prs(
    platform: &dyn PlatformService,
    confirmation: &Confirmation,
    base_branch: Option<&str>,
    schedule: &ProbeSchedule,
    cancel: &Cancellation,
) -> CherryPickBatch {
    let mut batch = CherryPickBatch::default();
    for target in confirmation.targets() {
        let request = PickRequest::new(confirmation.pr_number(), target, base_branch);
        match create_cherry_pick_pr(platform, &request, confirmation, schedule, cancel).await {
            Ok(pr) => batch.created.push(pr),
            Err(e) => {
                warn!(
                    pr_number = request.pr_number,
                    target_branch = target,
                    opened = batch.created.len(),
                    error = %e,
                    "stopping after failed cherry-pick"
                );
                batch.failed = Some((target.to_string(), e));
                break;
            }
        }
    }
    batch
}

/// Create `branch` at `target_sha`, or reuse it if it already points there
async fn ensure_branch(
    platform: &dyn PlatformService,
    branch: &str,
    target: &str,
    target_sha: &str,
    cancel: &Cancellation,
) -> Result<()> {
    let create_err = match cancel
        .run(
            "creating cherry-pick branch",
            platform.create_branch(branch, target_sha),
        )
        .await
    {
        Ok(_) => {
            info!(branch, sha = target_sha, "created cherry-pick branch");
            return Ok(());
        }
        Err(e) if e.is_cancelled() => return Err(e),
        Err(e) => e,
    };

    let existing_sha = match cancel
        .run("reading cherry-pick branch", platform.get_branch_sha(branch))
        .await
    {
        Ok(sha) => sha,
        Err(e) if e.is_cancelled() => return Err(e),
        Err(_) => {
            return Err(Error::BranchCreation {
                branch: branch.to_string(),
                message: create_err.to_string(),
            });
        }
    };

    if existing_sha != target_sha {
        return Err(Error::StaleBranch {
            branch: branch.to_string(),
            target: target.to_string(),
            existing_sha,
            target_sha: target_sha.to_string(),
        });
    }

    warn!(branch, sha = target_sha, "reusing existing cherry-pick branch");
    Ok(())
}
