//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    ChangedFile, Commit, Platform, PlatformConfig, PrState, PullRequest, PullRequestDetails,
    PullRequestPage,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size for every listing call (GitHub's maximum)
const PER_PAGE: u8 = 100;

// Raw REST payloads for routes where we only need a handful of fields

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: String,
    #[serde(default)]
    parents: Vec<ParentPayload>,
}

#[derive(Deserialize)]
struct ParentPayload {
    sha: String,
}

#[derive(Deserialize)]
struct FilePayload {
    filename: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    patch: Option<String>,
}

#[derive(Deserialize)]
struct RefPayload {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: &'a str,
}

impl From<CommitPayload> for Commit {
    fn from(payload: CommitPayload) -> Self {
        Self {
            sha: payload.sha,
            parents: payload.parents.into_iter().map(|p| p.sha).collect(),
        }
    }
}

impl From<FilePayload> for ChangedFile {
    fn from(payload: FilePayload) -> Self {
        Self {
            filename: payload.filename,
            status: payload.status,
            additions: payload.additions,
            deletions: payload.deletions,
            patch: payload.patch,
        }
    }
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` targets github.com.
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        let config = PlatformConfig {
            platform: Platform::GitHub,
            owner,
            repo,
            host,
        };
        Self::with_api_base(token, config, &api_base)
    }

    /// Create a service against an explicit API base URL
    pub fn with_api_base(token: &str, config: PlatformConfig, api_base: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn repo_route(&self, suffix: &str) -> String {
        format!(
            "/repos/{}/{}/{suffix}",
            self.config.owner, self.config.repo
        )
    }
}

/// Map a 404 to a `NotFound` naming the resource instead of GitHub's bare message
fn resource_error(err: octocrab::Error, resource: impl FnOnce() -> String) -> Error {
    match Error::from(err) {
        Error::NotFound(_) => Error::NotFound(resource()),
        other => other,
    }
}

/// Helper to convert octocrab PR to our `PullRequestDetails` type
fn details_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequestDetails {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    PullRequestDetails {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        state,
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
        head_ref: Some(pr.head.ref_field.clone()).filter(|r| !r.is_empty()),
        base_ref: pr.base.ref_field.clone(),
        merged_at: pr.merged_at,
        merge_commit_sha: pr.merge_commit_sha.clone(),
        updated_at: pr.updated_at,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        mergeable: pr.mergeable,
        mergeable_state: pr.mergeable_state.as_ref().and_then(mergeable_state_name),
        additions: pr.additions,
        deletions: pr.deletions,
    }
}

/// GitHub's own wire name for a mergeable state (`has_hooks`, `dirty`, ...)
fn mergeable_state_name(state: &octocrab::models::pulls::MergeableState) -> Option<String> {
    match serde_json::to_value(state).ok()? {
        serde_json::Value::String(name) => Some(name),
        _ => None,
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequestDetails> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await
            .map_err(|e| resource_error(e, || format!("PR #{pr_number}")))?;

        let details = details_from_octocrab(&pr);
        debug!(pr_number, state = %details.state, mergeable = ?details.mergeable, "got PR");
        Ok(details)
    }

    async fn list_pr_files(&self, pr_number: u64) -> Result<Vec<ChangedFile>> {
        debug!(pr_number, "listing PR files");
        let route = self.repo_route(&format!("pulls/{pr_number}/files"));
        let mut files = Vec::new();

        for page in 1.. {
            let batch: Vec<FilePayload> = self
                .client
                .get(&route, Some(&PageParams { per_page: PER_PAGE, page }))
                .await
                .map_err(|e| resource_error(e, || format!("PR #{pr_number}")))?;
            let done = batch.len() < usize::from(PER_PAGE);
            files.extend(batch.into_iter().map(ChangedFile::from));
            if done {
                break;
            }
        }

        debug!(pr_number, count = files.len(), "listed PR files");
        Ok(files)
    }

    async fn list_pr_commits(&self, pr_number: u64) -> Result<Vec<Commit>> {
        debug!(pr_number, "listing PR commits");
        let route = self.repo_route(&format!("pulls/{pr_number}/commits"));
        let mut commits = Vec::new();

        for page in 1.. {
            let batch: Vec<CommitPayload> = self
                .client
                .get(&route, Some(&PageParams { per_page: PER_PAGE, page }))
                .await
                .map_err(|e| resource_error(e, || format!("PR #{pr_number}")))?;
            let done = batch.len() < usize::from(PER_PAGE);
            commits.extend(batch.into_iter().map(Commit::from));
            if done {
                break;
            }
        }

        debug!(pr_number, count = commits.len(), "listed PR commits");
        Ok(commits)
    }

    async fn list_closed_prs(&self, page: u32) -> Result<PullRequestPage> {
        debug!(page, "listing closed PRs");
        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Closed)
            .sort(octocrab::params::pulls::Sort::Updated)
            .direction(octocrab::params::Direction::Descending)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await?;

        let listing = PullRequestPage {
            items: result.items.iter().map(details_from_octocrab).collect(),
            has_next: result.next.is_some(),
        };
        debug!(
            page,
            count = listing.items.len(),
            has_next = listing.has_next,
            "listed closed PRs"
        );
        Ok(listing)
    }

    async fn get_branch_sha(&self, branch: &str) -> Result<String> {
        debug!(branch, "getting branch ref");
        let route = self.repo_route(&format!("git/ref/heads/{branch}"));
        let reference: RefPayload = self
            .client
            .get(&route, None::<&()>)
            .await
            .map_err(|e| resource_error(e, || format!("branch {branch}")))?;

        debug!(branch, sha = %reference.object.sha, "got branch ref");
        Ok(reference.object.sha)
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<String> {
        debug!(branch, sha, "creating branch");
        let route = self.repo_route("git/refs");
        let body = CreateRefBody {
            ref_name: format!("refs/heads/{branch}"),
            sha,
        };
        let reference: RefPayload = self.client.post(&route, Some(&body)).await?;

        debug!(branch, "created branch");
        Ok(reference.object.sha)
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "closing PR");
        let route = self.repo_route(&format!("pulls/{pr_number}"));
        let _: serde_json::Value = self
            .client
            .patch(&route, Some(&serde_json::json!({ "state": "closed" })))
            .await
            .map_err(|e| resource_error(e, || format!("PR #{pr_number}")))?;

        debug!(pr_number, "closed PR");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
