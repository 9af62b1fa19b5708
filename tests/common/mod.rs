//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{CreateBranchCall, CreatePrCall, MockPlatformService};

use backport::types::{ChangedFile, Commit, Platform, PlatformConfig, PrState, PullRequestDetails};
use chrono::{DateTime, TimeZone, Utc};

/// GitHub config for acme/widgets
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        platform: Platform::GitHub,
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

/// A mock host for acme/widgets with `main` and `release-1` branches
pub fn github_mock() -> MockPlatformService {
    let mock = MockPlatformService::with_config(github_config());
    mock.set_branch("main", "main-tip");
    mock.set_branch("release-1", "release-1-tip");
    mock
}

/// Fixed "now" used by discovery tests
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

/// Merged PR into main from `head`
pub fn merged_pr(number: u64, title: &str, head: &str, merged_at: DateTime<Utc>) -> PullRequestDetails {
    PullRequestDetails {
        number,
        title: title.to_string(),
        body: Some(format!("Body of #{number}")),
        state: PrState::Merged,
        author: "octocat".to_string(),
        head_ref: Some(head.to_string()),
        base_ref: "main".to_string(),
        merged_at: Some(merged_at),
        merge_commit_sha: Some(format!("merge{number}")),
        updated_at: Some(merged_at),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        mergeable: None,
        mergeable_state: None,
        additions: Some(10),
        deletions: Some(2),
    }
}

/// Closed-but-unmerged PR
pub fn closed_pr(number: u64, updated_at: DateTime<Utc>) -> PullRequestDetails {
    PullRequestDetails {
        state: PrState::Closed,
        merged_at: None,
        merge_commit_sha: None,
        updated_at: Some(updated_at),
        ..merged_pr(number, &format!("Abandoned #{number}"), &format!("wip-{number}"), updated_at)
    }
}

/// Commit with the given parents
pub fn commit(sha: &str, parents: &[&str]) -> Commit {
    Commit {
        sha: sha.to_string(),
        parents: parents.iter().map(ToString::to_string).collect(),
    }
}

/// Linear history of `count` single-parent commits named `<prefix>1..`
pub fn linear_commits(prefix: &str, count: usize) -> Vec<Commit> {
    (1..=count)
        .map(|i| Commit {
            sha: format!("{prefix}{i}"),
            parents: vec![format!("{prefix}{}", i - 1)],
        })
        .collect()
}

/// Changed file with an optional patch
pub fn changed_file(name: &str, patch: Option<&str>) -> ChangedFile {
    ChangedFile {
        filename: name.to_string(),
        status: "modified".to_string(),
        additions: 1,
        deletions: 1,
        patch: patch.map(ToString::to_string),
    }
}
