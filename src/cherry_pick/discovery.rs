//! Discovery of recently merged pull requests

use crate::cherry_pick::cancel::Cancellation;
use crate::config::DEFAULT_LOOKBACK_DAYS;
use crate::error::{Result, ResultExt};
use crate::platform::PlatformService;
use crate::types::{MergedPr, PullRequestDetails};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Earliest merge time inside the lookback window; `days <= 0` means the default window
pub fn lookback_cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let days = if days <= 0 { DEFAULT_LOOKBACK_DAYS } else { days };
    now - Duration::days(days)
}

/// Whether `pr` was merged at or after `cutoff`
pub fn merged_since(pr: &PullRequestDetails, cutoff: DateTime<Utc>) -> bool {
    pr.merged_at.is_some_and(|t| t >= cutoff)
}

/// List PRs merged within the last `days` days, most recently updated first
///
/// Closed PRs are walked page by page in descending update order. Walking
/// stops on the last page, or once a page ends with a PR last updated before
/// the cutoff: nothing after it can have been merged inside the window.
pub async fn list_merged_prs(
    platform: &dyn PlatformService,
    days: i64,
    now: DateTime<Utc>,
    cancel: &Cancellation,
) -> Result<Vec<MergedPr>> {
    let cutoff = lookback_cutoff(now, days);
    let mut merged = Vec::new();
    let mut page = 1;

    loop {
        let batch = cancel
            .run("listing closed PRs", platform.list_closed_prs(page))
            .await
            .context(|| format!("failed to list closed PRs (page {page})"))?;

        debug!(page, count = batch.items.len(), has_next = batch.has_next, "fetched closed PRs");

        merged.extend(
            batch
                .items
                .iter()
                .filter(|pr| merged_since(pr, cutoff))
                .map(MergedPr::from_details),
        );

        let past_window = batch
            .items
            .last()
            .and_then(|pr| pr.updated_at)
            .is_some_and(|t| t < cutoff);
        if !batch.has_next || batch.items.is_empty() || past_window {
            break;
        }
        page += 1;
    }

    Ok(merged)
}
