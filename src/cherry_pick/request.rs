//! Input for the conflict check and materialization operations

use crate::config::DEFAULT_BASE_BRANCH;

/// A (pull request, target branch) pair to cherry-pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    /// Merged pull request to cherry-pick
    pub pr_number: u64,
    /// Branch the commits should land on
    pub target_branch: String,
    /// Branch the original PR is expected to have merged into
    pub base_branch: String,
}

impl PickRequest {
    /// Build a request; an absent or blank base falls back to `main`
    pub fn new(pr_number: u64, target_branch: impl Into<String>, base_branch: Option<&str>) -> Self {
        let base_branch = base_branch
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BASE_BRANCH)
            .to_string();
        Self {
            pr_number,
            target_branch: target_branch.into(),
            base_branch,
        }
    }

    /// Deterministic name of the branch the cherry-pick PR is opened from
    pub fn branch_name(&self) -> String {
        cherry_pick_branch_name(self.pr_number, &self.target_branch)
    }
}

/// `cherry-pick-<number>-to-<target>`
pub fn cherry_pick_branch_name(pr_number: u64, target_branch: &str) -> String {
    format!("cherry-pick-{pr_number}-to-{target_branch}")
}
