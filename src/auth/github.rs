//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use octocrab::Octocrab;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// Enterprise host, if any
    pub host: Option<String>,
}

/// Pick a token from the environment using the given lookup
pub fn token_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

/// Get GitHub authentication
///
/// Tries `gh auth token` first, then `GITHUB_TOKEN` and `GH_TOKEN`.
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = token_from_gh_cli(host).await {
        debug!("using token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
            host: host.map(str::to_string),
        });
    }

    if let Some(token) = token_from_env(|var| std::env::var(var).ok()) {
        debug!("using token from environment");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host: host.map(str::to_string),
        });
    }

    Err(Error::Auth(
        "No GitHub token found. Run 'gh auth login' or set GITHUB_TOKEN.".to_string(),
    ))
}

async fn token_from_gh_cli(host: Option<&str>) -> Option<String> {
    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().await.ok()?;
    if !output.status.success() {
        debug!(status = %output.status, "gh auth token failed");
        return None;
    }

    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Verify a token by resolving the authenticated user's login
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let mut builder = Octocrab::builder().personal_token(config.token.clone());
    if let Some(ref h) = config.host {
        builder = builder
            .base_uri(format!("https://{h}/api/v3"))
            .map_err(|e| Error::Auth(e.to_string()))?;
    }
    let client = builder.build().map_err(|e| Error::Auth(e.to_string()))?;

    let user = client
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("token rejected: {e}")))?;

    Ok(user.login)
}
