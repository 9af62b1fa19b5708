//! Error types for backport

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the cherry-pick pipeline and its platform gateway
#[derive(Debug, Error)]
pub enum Error {
    /// A pull request, branch or other host resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The pull request has no merge timestamp
    #[error("PR #{0} is not merged")]
    NotMerged(u64),

    /// Every commit in the pull request is a merge commit
    #[error("PR #{0} has no commits to cherry-pick")]
    NoCherryPickableCommits(u64),

    /// The pull request reports no head ref to probe with
    #[error("PR #{0} does not have a head ref")]
    MissingHeadRef(u64),

    /// The prober reported conflicts for this pair
    #[error("cannot cherry-pick PR #{pr_number} to {target}: {detail}")]
    Conflict {
        /// Original pull request number
        pr_number: u64,
        /// Target branch
        target: String,
        /// First human-readable conflict detail
        detail: String,
    },

    /// Reading the tip of the target branch failed
    #[error("failed to get target branch {branch}: {message}")]
    TargetBranchNotFound {
        /// Target branch name
        branch: String,
        /// Underlying failure
        message: String,
    },

    /// Creating the cherry-pick branch failed and no existing ref was found
    #[error("failed to create branch {branch}: {message}")]
    BranchCreation {
        /// Cherry-pick branch name
        branch: String,
        /// Host error from the create call
        message: String,
    },

    /// The cherry-pick branch already exists but was not cut from the current target tip
    #[error(
        "branch {branch} already exists at {existing_sha} but {target} is at {target_sha}; delete it or merge its PR first"
    )]
    StaleBranch {
        /// Cherry-pick branch name
        branch: String,
        /// Target branch name
        target: String,
        /// Commit the existing branch points at
        existing_sha: String,
        /// Current tip of the target branch
        target_sha: String,
    },

    /// The host rejected the cherry-pick pull request
    #[error("failed to create cherry-pick PR: {0}")]
    PullRequestCreation(String),

    /// Materialization was attempted without a covering confirmation
    #[error("cherry-pick of PR #{pr_number} to {target} has not been confirmed")]
    NotConfirmed {
        /// Original pull request number
        pr_number: u64,
        /// Target branch
        target: String,
    },

    /// The caller cancelled the operation or its deadline passed
    #[error("{0} cancelled")]
    Cancelled(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Authentication error
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The repository reference could not be parsed as a GitHub repository
    #[error("no supported GitHub repository found (expected owner/repo or a GitHub URL)")]
    NoSupportedRemotes,

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),

    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A lower-level error annotated with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        /// Operation and identifying parameters
        context: String,
        /// Wrapped error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Innermost error, looking through any [`Error::Context`] wrapping
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Whether this error (or the error it wraps) is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled(_))
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
                Self::NotFound(source.message.clone())
            }
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(format!(
                "{} ({})",
                source.message,
                source.status_code.as_u16()
            )),
            _ => Self::GitHubApi(err.to_string()),
        }
    }
}

/// Attach operation context to gateway errors
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a lazily built description of the operation
    fn context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: f(),
            source: Box::new(source),
        })
    }
}
