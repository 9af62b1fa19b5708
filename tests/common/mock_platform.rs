//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use backport::error::{Error, Result};
use backport::platform::PlatformService;
use backport::types::{
    ChangedFile, Commit, PlatformConfig, PrState, PullRequest, PullRequestDetails,
    PullRequestPage,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `create_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBranchCall {
    pub branch: String,
    pub sha: String,
}

/// Stateful fake of the GitHub host
///
/// Models just enough of GitHub for the pipeline: pull requests with an
/// open/closed lifecycle, branch refs, commit lists, closed-PR pages and a
/// per-(head, base) queue of mergeable answers. Like GitHub, it refuses a
/// second open PR for the same head and base, a PR whose head or base ref
/// does not exist, and creating a ref that already exists.
///
/// Features:
/// - Auto-incrementing PR numbers for created PRs
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    prs: Mutex<HashMap<u64, PullRequestDetails>>,
    commits: Mutex<HashMap<u64, Vec<Commit>>>,
    files: Mutex<HashMap<u64, Vec<ChangedFile>>>,
    closed_pages: Mutex<Vec<Vec<PullRequestDetails>>>,
    refs: Mutex<HashMap<String, String>>,
    mergeable: Mutex<HashMap<(String, String), VecDeque<Option<bool>>>>,
    mergeable_state: Mutex<HashMap<(String, String), String>>,
    // Call tracking
    calls: Mutex<Vec<String>>,
    get_pr_calls: Mutex<Vec<u64>>,
    list_closed_calls: Mutex<Vec<u32>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    create_branch_calls: Mutex<Vec<CreateBranchCall>>,
    close_pr_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_create_pr: Mutex<Option<String>>,
    error_on_create_pr_head: Mutex<HashMap<String, String>>,
    error_on_get_pr: Mutex<HashMap<u64, String>>,
    error_on_close_pr: Mutex<Option<String>>,
    error_on_create_branch: Mutex<Option<String>>,
    error_on_get_branch: Mutex<HashSet<String>>,
    // Latency injection
    create_pr_latency: Mutex<Option<Duration>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1000),
            prs: Mutex::new(HashMap::new()),
            commits: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            closed_pages: Mutex::new(Vec::new()),
            refs: Mutex::new(HashMap::new()),
            mergeable: Mutex::new(HashMap::new()),
            mergeable_state: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_closed_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            close_pr_calls: Mutex::new(Vec::new()),
            error_on_create_pr: Mutex::new(None),
            error_on_create_pr_head: Mutex::new(HashMap::new()),
            error_on_get_pr: Mutex::new(HashMap::new()),
            error_on_close_pr: Mutex::new(None),
            error_on_create_branch: Mutex::new(None),
            error_on_get_branch: Mutex::new(HashSet::new()),
            create_pr_latency: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make every `create_pr` call fail
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` fail for one head branch only
    pub fn fail_create_pr_with_head(&self, head: &str, msg: &str) {
        self.error_on_create_pr_head
            .lock()
            .unwrap()
            .insert(head.to_string(), msg.to_string());
    }

    /// Make `get_pr` fail for one PR number
    pub fn fail_get_pr_for(&self, pr_number: u64, msg: &str) {
        self.error_on_get_pr
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `close_pr` fail (the PR stays open)
    pub fn fail_close_pr(&self, msg: &str) {
        *self.error_on_close_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_branch` fail without creating anything
    pub fn fail_create_branch(&self, msg: &str) {
        *self.error_on_create_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_branch_sha` fail for one branch
    pub fn fail_get_branch(&self, branch: &str) {
        self.error_on_get_branch
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// Make `create_pr` answer only after `latency`, once the PR already exists
    pub fn delay_create_pr(&self, latency: Duration) {
        *self.create_pr_latency.lock().unwrap() = Some(latency);
    }

    // === Host state setup ===

    /// Store a PR snapshot
    pub fn add_pr(&self, pr: PullRequestDetails) {
        self.prs.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the commits reported for a PR
    pub fn set_commits(&self, pr_number: u64, commits: Vec<Commit>) {
        self.commits.lock().unwrap().insert(pr_number, commits);
    }

    /// Set the changed files reported for a PR
    pub fn set_files(&self, pr_number: u64, files: Vec<ChangedFile>) {
        self.files.lock().unwrap().insert(pr_number, files);
    }

    /// Append a page to the closed-PR listing
    pub fn add_closed_page(&self, page: Vec<PullRequestDetails>) {
        self.closed_pages.lock().unwrap().push(page);
    }

    /// Create or move a branch ref
    pub fn set_branch(&self, branch: &str, sha: &str) {
        self.refs
            .lock()
            .unwrap()
            .insert(branch.to_string(), sha.to_string());
    }

    /// Delete a branch ref
    pub fn delete_branch(&self, branch: &str) {
        self.refs.lock().unwrap().remove(branch);
    }

    /// Queue the mergeable answers for PRs from `head` into `base`
    ///
    /// Each `get_pr` on such a PR consumes one answer; once the queue is
    /// empty the PR reports clean.
    pub fn queue_mergeable(&self, head: &str, base: &str, answers: &[Option<bool>]) {
        self.mergeable
            .lock()
            .unwrap()
            .insert((head.to_string(), base.to_string()), answers.iter().copied().collect());
    }

    /// Set the mergeable state descriptor for PRs from `head` into `base`
    pub fn set_mergeable_state(&self, head: &str, base: &str, state: &str) {
        self.mergeable_state
            .lock()
            .unwrap()
            .insert((head.to_string(), base.to_string()), state.to_string());
    }

    /// Helper to set up a merged PR with its head branch and commits
    pub fn setup_merged_pr(&self, pr: PullRequestDetails, commits: Vec<Commit>) {
        if let Some(ref head) = pr.head_ref {
            self.set_branch(head, &format!("head-{}", pr.number));
        }
        self.set_commits(pr.number, commits);
        self.add_pr(pr);
    }

    /// Close a PR out of band, as a maintainer would in the web UI
    pub fn mark_closed(&self, pr_number: u64) {
        if let Some(pr) = self.prs.lock().unwrap().get_mut(&pr_number) {
            pr.state = PrState::Closed;
        }
    }

    fn insert_pr(&self, head: &str, base: &str, title: &str, body: &str) -> Result<PullRequest> {
        let mut prs = self.prs.lock().unwrap();
        let duplicate = prs.values().any(|pr| {
            pr.state == PrState::Open
                && pr.head_ref.as_deref() == Some(head)
                && pr.base_ref == base
        });
        if duplicate {
            return Err(Error::GitHubApi(format!(
                "Validation Failed: A pull request already exists for {}:{head}",
                self.config.owner
            )));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let html_url = format!(
            "https://github.com/{}/{}/pull/{number}",
            self.config.owner, self.config.repo
        );
        prs.insert(
            number,
            PullRequestDetails {
                number,
                title: title.to_string(),
                body: Some(body.to_string()),
                state: PrState::Open,
                author: "backport-bot".to_string(),
                head_ref: Some(head.to_string()),
                base_ref: base.to_string(),
                merged_at: None,
                merge_commit_sha: None,
                updated_at: None,
                html_url: html_url.clone(),
                mergeable: None,
                mergeable_state: None,
                additions: None,
                deletions: None,
            },
        );

        Ok(PullRequest {
            number,
            html_url,
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        })
    }

    // === Host state inspection ===

    /// Current sha of a branch, if it exists
    pub fn branch_sha(&self, branch: &str) -> Option<String> {
        self.refs.lock().unwrap().get(branch).cloned()
    }

    /// Numbers of open PRs whose title starts with `prefix`
    pub fn open_prs_titled(&self, prefix: &str) -> Vec<u64> {
        let mut open: Vec<u64> = self
            .prs
            .lock()
            .unwrap()
            .values()
            .filter(|pr| pr.state == PrState::Open && pr.title.starts_with(prefix))
            .map(|pr| pr.number)
            .collect();
        open.sort_unstable();
        open
    }

    /// Snapshot of a stored PR
    pub fn pr(&self, pr_number: u64) -> Option<PullRequestDetails> {
        self.prs.lock().unwrap().get(&pr_number).cloned()
    }

    // === Call verification methods ===

    /// Every trait method invoked, in order
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Get all `get_pr` calls
    pub fn get_get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// Get all pages requested from `list_closed_prs`
    pub fn get_list_closed_calls(&self) -> Vec<u32> {
        self.list_closed_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_branch` calls
    pub fn get_create_branch_calls(&self) -> Vec<CreateBranchCall> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    /// Get all `close_pr` calls
    pub fn get_close_pr_calls(&self) -> Vec<u64> {
        self.close_pr_calls.lock().unwrap().clone()
    }

    /// Assert that no conflict-check PR was left open
    pub fn assert_no_open_probes(&self) {
        let open = self.open_prs_titled("[conflict-check]");
        assert!(open.is_empty(), "conflict-check PRs left open: {open:?}");
    }

    /// Assert that the host saw no calls at all
    pub fn assert_untouched(&self) {
        let calls = self.get_calls();
        assert!(calls.is_empty(), "expected no host calls, got {calls:?}");
    }

    /// Assert that nothing but probes were created or mutated
    pub fn assert_no_cherry_pick_side_effects(&self) {
        assert!(
            self.get_create_branch_calls().is_empty(),
            "unexpected branch creation: {:?}",
            self.get_create_branch_calls()
        );
        let non_probe: Vec<_> = self
            .get_create_pr_calls()
            .into_iter()
            .filter(|c| !c.title.starts_with("[conflict-check]"))
            .collect();
        assert!(non_probe.is_empty(), "unexpected PR creation: {non_probe:?}");
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn next_mergeable(&self, head: &str, base: &str) -> Option<bool> {
        self.mergeable
            .lock()
            .unwrap()
            .get_mut(&(head.to_string(), base.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or(Some(true))
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequestDetails> {
        self.record("get_pr");
        self.get_pr_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_get_pr.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let mut pr = self
            .pr(pr_number)
            .ok_or_else(|| Error::NotFound(format!("PR #{pr_number}")))?;

        // Only open PRs get a mergeability computation
        if pr.state == PrState::Open
            && let Some(head) = pr.head_ref.clone()
        {
            let key = (head.clone(), pr.base_ref.clone());
            pr.mergeable = self.next_mergeable(&head, &pr.base_ref);
            pr.mergeable_state = self
                .mergeable_state
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .or_else(|| {
                    Some(
                        match pr.mergeable {
                            Some(true) => "clean",
                            Some(false) => "dirty",
                            None => "unknown",
                        }
                        .to_string(),
                    )
                });
        }
        Ok(pr)
    }

    async fn list_pr_files(&self, pr_number: u64) -> Result<Vec<ChangedFile>> {
        self.record("list_pr_files");
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_pr_commits(&self, pr_number: u64) -> Result<Vec<Commit>> {
        self.record("list_pr_commits");
        self.commits
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("PR #{pr_number}")))
    }

    async fn list_closed_prs(&self, page: u32) -> Result<PullRequestPage> {
        self.record("list_closed_prs");
        self.list_closed_calls.lock().unwrap().push(page);

        let pages = self.closed_pages.lock().unwrap();
        let index = page.saturating_sub(1) as usize;
        Ok(PullRequestPage {
            items: pages.get(index).cloned().unwrap_or_default(),
            has_next: index + 1 < pages.len(),
        })
    }

    async fn get_branch_sha(&self, branch: &str) -> Result<String> {
        self.record("get_branch_sha");
        if self.error_on_get_branch.lock().unwrap().contains(branch) {
            return Err(Error::GitHubApi(format!("cannot read {branch}")));
        }
        self.branch_sha(branch)
            .ok_or_else(|| Error::NotFound(format!("branch {branch}")))
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<String> {
        self.record("create_branch");
        self.create_branch_calls.lock().unwrap().push(CreateBranchCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        if let Some(msg) = self.error_on_create_branch.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        let mut refs = self.refs.lock().unwrap();
        if refs.contains_key(branch) {
            return Err(Error::GitHubApi("Reference already exists".to_string()));
        }
        refs.insert(branch.to_string(), sha.to_string());
        Ok(sha.to_string())
    }

    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str) -> Result<PullRequest> {
        self.record("create_pr");
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_create_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        if let Some(msg) = self.error_on_create_pr_head.lock().unwrap().get(head) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        {
            let refs = self.refs.lock().unwrap();
            if !refs.contains_key(head) {
                return Err(Error::GitHubApi(format!("Validation Failed: head {head} does not exist")));
            }
            if !refs.contains_key(base) {
                return Err(Error::GitHubApi(format!("Validation Failed: base {base} does not exist")));
            }
        }

        let created = self.insert_pr(head, base, title, body)?;
        let latency = *self.create_pr_latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(created)
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        self.record("close_pr");
        self.close_pr_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_close_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        let mut prs = self.prs.lock().unwrap();
        let pr = prs
            .get_mut(&pr_number)
            .ok_or_else(|| Error::NotFound(format!("PR #{pr_number}")))?;
        pr.state = PrState::Closed;
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
