//! Repository detection from `owner/repo` shorthands and remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SSH_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ssh://)?git@(?P<host>[^:/]+)[:/](?P<path>.+)$").expect("valid regex")
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<owner>[A-Za-z0-9_.-]+)/(?P<repo>[A-Za-z0-9_.-]+)$").expect("valid regex")
});

/// Enterprise host for `host`, or `None` when it names public GitHub
pub fn enterprise_host(host: &str) -> Option<String> {
    let host = host.trim();
    if host.is_empty()
        || host.eq_ignore_ascii_case("github.com")
        || host.eq_ignore_ascii_case("www.github.com")
    {
        None
    } else {
        Some(host.to_string())
    }
}

/// Detect the platform for a host name
///
/// `github.com` is always GitHub. Any other host is treated as GitHub
/// Enterprise only when it matches `enterprise_host` (usually from `GH_HOST`).
pub fn detect_platform(host: &str, enterprise_host: Option<&str>) -> Option<Platform> {
    let host = host.to_ascii_lowercase();
    if host == "github.com" || host == "www.github.com" {
        return Some(Platform::GitHub);
    }
    match enterprise_host {
        Some(h) if h.eq_ignore_ascii_case(&host) => Some(Platform::GitHub),
        _ => None,
    }
}

/// Parse a repository reference into a platform config
///
/// Accepts `owner/repo`, `https://github.com/owner/repo(.git)` and
/// `git@github.com:owner/repo(.git)`. Enterprise hosts are accepted when they
/// match `enterprise_host`.
pub fn parse_repo_info(reference: &str, enterprise_host: Option<&str>) -> Result<PlatformConfig> {
    let trimmed = reference.trim().trim_end_matches('/');

    if let Some(caps) = SHORTHAND.captures(trimmed) {
        return Ok(PlatformConfig {
            platform: Platform::GitHub,
            owner: caps["owner"].to_string(),
            repo: strip_git_suffix(&caps["repo"]).to_string(),
            host: enterprise_host.and_then(self::enterprise_host),
        });
    }

    let (host, path) = if let Some(caps) = SSH_REMOTE.captures(trimmed) {
        (caps["host"].to_string(), caps["path"].to_string())
    } else {
        let url = Url::parse(trimmed).map_err(|_| Error::NoSupportedRemotes)?;
        let host = url.host_str().ok_or(Error::NoSupportedRemotes)?.to_string();
        (host, url.path().trim_start_matches('/').to_string())
    };

    if detect_platform(&host, enterprise_host).is_none() {
        return Err(Error::NoSupportedRemotes);
    }

    let path = strip_git_suffix(path.trim_end_matches('/'));
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let (Some(owner), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::NoSupportedRemotes);
    };

    Ok(PlatformConfig {
        platform: Platform::GitHub,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: self::enterprise_host(&host),
    })
}

fn strip_git_suffix(s: &str) -> &str {
    s.strip_suffix(".git").unwrap_or(s)
}
