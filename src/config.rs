//! Layered settings: defaults, TOML file, environment, then CLI flags

use crate::cherry_pick::ProbeSchedule;
use crate::error::{Error, Result};
use crate::platform::{enterprise_host, parse_repo_info};
use crate::types::PlatformConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the user config dir
const CONFIG_DIR: &str = "backport";

/// Filename for settings
const CONFIG_FILE: &str = "config.toml";

/// Default branch assumed when none is given
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Default lookback window in days
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Probe polling delays
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Wait before the first mergeability check
    pub initial_delay_secs: u64,
    /// Wait before the second (final) check
    pub recheck_delay_secs: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            initial_delay_secs: 3,
            recheck_delay_secs: 2,
        }
    }
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Repository as `owner/repo` or a GitHub URL
    pub repo: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Base branch when a command does not name one
    pub base_branch: String,
    /// Lookback window for `list` when `--days` is not given
    pub lookback_days: i64,
    /// Overall deadline for one command, in seconds
    pub timeout_secs: Option<u64>,
    /// Probe polling delays
    pub probe: ProbeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo: None,
            host: None,
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            timeout_secs: None,
            probe: ProbeSettings::default(),
        }
    }
}

impl Settings {
    /// Default settings file location (`<config_dir>/backport/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load settings from a TOML file
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Overlay environment variables read through `lookup`
    ///
    /// `GITHUB_REPOSITORY` (as set by Actions) wins over `GITHUB_ORG` +
    /// `GITHUB_REPO`. `GH_HOST` selects an Enterprise host and
    /// `BACKPORT_BASE_BRANCH` the default base branch.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(repo) = non_empty("GITHUB_REPOSITORY") {
            self.repo = Some(repo);
        } else if let (Some(org), Some(repo)) = (non_empty("GITHUB_ORG"), non_empty("GITHUB_REPO")) {
            self.repo = Some(format!("{org}/{repo}"));
        }
        if let Some(host) = non_empty("GH_HOST") {
            self.host = enterprise_host(&host);
        }
        if let Some(base) = non_empty("BACKPORT_BASE_BRANCH") {
            self.base_branch = base;
        }
        self
    }

    /// Load from `path` (or the default location) and overlay the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!("{} does not exist", p.display())));
                }
                Self::from_file(p)?
            }
            None => Self::default_path()
                .map(|p| Self::from_file(&p))
                .transpose()?
                .unwrap_or_default(),
        };
        Ok(settings.with_env(|key| std::env::var(key).ok()))
    }

    /// Resolve the repository into a platform config
    pub fn platform_config(&self) -> Result<PlatformConfig> {
        let repo = self.repo.as_deref().ok_or_else(|| {
            Error::Config(
                "no repository configured; pass --repo owner/name or set GITHUB_REPOSITORY"
                    .to_string(),
            )
        })?;
        parse_repo_info(repo, self.host.as_deref())
    }

    /// Probe polling schedule
    pub const fn probe_schedule(&self) -> ProbeSchedule {
        ProbeSchedule {
            initial_delay: Duration::from_secs(self.probe.initial_delay_secs),
            recheck_delay: Duration::from_secs(self.probe.recheck_delay_secs),
        }
    }
}
