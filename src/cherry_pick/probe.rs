//! Mergeability probing through a disposable pull request
//!
//! GitHub computes whether a PR merges cleanly, asynchronously, for every
//! open PR. The prober borrows that computation: it opens a throwaway PR from
//! the original PR's head branch into the target branch, polls the mergeable
//! flag a bounded number of times, and closes the throwaway PR again on every
//! path out of the check.

use crate::cherry_pick::cancel::Cancellation;
use crate::cherry_pick::commits::cherry_pickable_commits;
use crate::cherry_pick::request::PickRequest;
use crate::error::{Error, Result, ResultExt};
use crate::platform::PlatformService;
use crate::types::{Commit, ConflictReport, Mergeable, PullRequestDetails};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Title prefix shared by every probe PR
pub const PROBE_TITLE_PREFIX: &str = "[conflict-check]";

/// Upper bound on the probe create and close calls, which ignore cancellation
const PROBE_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded two-step wait for GitHub's mergeability computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    /// Wait before the first check
    pub initial_delay: Duration,
    /// Wait before the second and final check, only taken if the first was inconclusive
    pub recheck_delay: Duration,
}

impl ProbeSchedule {
    /// No waiting at all (tests and hosts that compute synchronously)
    pub const fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            recheck_delay: Duration::ZERO,
        }
    }
}

impl Default for ProbeSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            recheck_delay: Duration::from_secs(2),
        }
    }
}

/// What the host said about the probe PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStatus {
    /// Tri-state mergeable flag
    pub mergeable: Mergeable,
    /// GitHub's mergeable state descriptor, if reported
    pub state: Option<String>,
}

impl From<&PullRequestDetails> for ProbeStatus {
    fn from(pr: &PullRequestDetails) -> Self {
        Self {
            mergeable: Mergeable::from(pr.mergeable),
            state: pr.mergeable_state.clone(),
        }
    }
}

/// Title of the probe PR for a pair
pub fn probe_title(pr_number: u64, target: &str) -> String {
    format!("{PROBE_TITLE_PREFIX} PR #{pr_number} cherry-pick to {target}")
}

fn probe_body(pr_number: u64, target: &str) -> String {
    format!(
        "Temporary PR checking whether the commits of #{pr_number} merge cleanly into `{target}`. \
         It is closed automatically when the check finishes."
    )
}

/// Fetch a PR and its cherry-pickable commits, rejecting unmerged or empty PRs
pub(crate) async fn load_eligible(
    platform: &dyn PlatformService,
    pr_number: u64,
    cancel: &Cancellation,
) -> Result<(PullRequestDetails, Vec<Commit>)> {
    let pr = cancel
        .run("fetching PR", platform.get_pr(pr_number))
        .await
        .context(|| format!("failed to get PR #{pr_number}"))?;

    if !pr.is_merged() {
        return Err(Error::NotMerged(pr_number));
    }

    let all = cancel
        .run("listing PR commits", platform.list_pr_commits(pr_number))
        .await
        .context(|| format!("failed to get commits for PR #{pr_number}"))?;

    let commits = cherry_pickable_commits(&all);
    debug!(
        pr_number,
        total = all.len(),
        pickable = commits.len(),
        "classified PR commits"
    );

    if commits.is_empty() {
        return Err(Error::NoCherryPickableCommits(pr_number));
    }
    Ok((pr, commits))
}

/// Turn the final probe status into a report (PURE)
///
/// An unknown status after both polls counts as conflicting.
pub fn interpret_probe(
    pr_number: u64,
    target: &str,
    status: &ProbeStatus,
    commits: usize,
) -> ConflictReport {
    let details = match status.mergeable {
        Mergeable::Clean => Vec::new(),
        Mergeable::Conflicting => {
            let mut details = vec![format!(
                "PR #{pr_number} commits cannot be cleanly merged into {target}"
            )];
            if let Some(ref state) = status.state {
                details.push(format!("Mergeable state: {state}"));
            }
            details
        }
        Mergeable::Unknown => {
            vec!["Unable to determine mergeability status - assuming conflicts exist".to_string()]
        }
    };

    ConflictReport {
        has_conflicts: status.mergeable != Mergeable::Clean,
        details,
        commits,
    }
}

/// Check whether the commits of a merged PR can land cleanly on the target branch
///
/// If the probe PR cannot be opened (typically because the head branch was
/// deleted after merge) the check reports no conflicts with a caution detail
/// rather than failing.
pub async fn check_cherry_pick_conflicts(
    platform: &dyn PlatformService,
    request: &PickRequest,
    schedule: &ProbeSchedule,
    cancel: &Cancellation,
) -> Result<ConflictReport> {
    let (pr, commits) = load_eligible(platform, request.pr_number, cancel).await?;
    probe_loaded(platform, request, &pr, commits.len(), schedule, cancel).await
}

/// Probe step for a PR that already passed [`load_eligible`]
pub(crate) async fn probe_loaded(
    platform: &dyn PlatformService,
    request: &PickRequest,
    pr: &PullRequestDetails,
    commits: usize,
    schedule: &ProbeSchedule,
    cancel: &Cancellation,
) -> Result<ConflictReport> {
    let pr_number = request.pr_number;
    let target = request.target_branch.as_str();
    let head = pr
        .head_ref
        .as_deref()
        .ok_or(Error::MissingHeadRef(pr_number))?;

    if cancel.is_cancelled() {
        return Err(Error::Cancelled("opening conflict-check PR".to_string()));
    }

    // Once sent, the create runs to completion so the probe number is known
    // and the probe can be closed; polling observes any cancellation.
    let title = probe_title(pr_number, target);
    let body = probe_body(pr_number, target);
    let created = tokio::time::timeout(
        PROBE_CALL_TIMEOUT,
        platform.create_pr(head, target, &title, &body),
    )
    .await
    .unwrap_or_else(|_| {
        Err(Error::Internal(
            "timed out opening conflict-check PR".to_string(),
        ))
    });
    let probe = match created {
        Ok(probe) => probe,
        Err(e) => {
            warn!(pr_number, head = %head, target_branch = target, error = %e, "could not open conflict-check PR");
            return Ok(ConflictReport {
                has_conflicts: false,
                details: vec![format!(
                    "Cannot check conflicts: original PR head branch '{head}' may have been deleted. Proceed with caution."
                )],
                commits,
            });
        }
    };
    info!(pr_number, target_branch = target, probe = probe.number, "opened conflict-check PR");

    let polled = poll_mergeable(platform, probe.number, schedule, cancel).await;
    close_probe(platform, probe.number).await;
    let status = polled?;

    let report = interpret_probe(pr_number, target, &status, commits);
    info!(
        pr_number,
        target_branch = target,
        mergeable = %status.mergeable,
        has_conflicts = report.has_conflicts,
        "conflict check finished"
    );
    Ok(report)
}

/// Initial wait, check, then one shorter wait and a final check if still unknown
async fn poll_mergeable(
    platform: &dyn PlatformService,
    probe_number: u64,
    schedule: &ProbeSchedule,
    cancel: &Cancellation,
) -> Result<ProbeStatus> {
    let fetch = |attempt: u8| async move {
        cancel
            .run("polling conflict-check PR", platform.get_pr(probe_number))
            .await
            .context(|| format!("failed to get conflict-check PR #{probe_number} (check {attempt})"))
    };

    cancel
        .sleep("waiting for mergeability", schedule.initial_delay)
        .await?;
    let status = ProbeStatus::from(&fetch(1).await?);
    if status.mergeable != Mergeable::Unknown {
        return Ok(status);
    }

    debug!(probe = probe_number, "mergeability still computing, rechecking");
    cancel
        .sleep("waiting for mergeability", schedule.recheck_delay)
        .await?;
    Ok(ProbeStatus::from(&fetch(2).await?))
}

/// Best-effort close; failures are logged, never returned
async fn close_probe(platform: &dyn PlatformService, probe_number: u64) {
    match tokio::time::timeout(PROBE_CALL_TIMEOUT, platform.close_pr(probe_number)).await {
        Ok(Ok(())) => debug!(probe = probe_number, "closed conflict-check PR"),
        Ok(Err(e)) => warn!(
            probe = probe_number,
            error = %e,
            "failed to close conflict-check PR; close it manually"
        ),
        Err(_) => warn!(
            probe = probe_number,
            "timed out closing conflict-check PR; close it manually"
        ),
    }
}
