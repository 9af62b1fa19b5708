//! Shared command context for CLI commands
//!
//! Extracts the setup shared by every command that talks to GitHub.

use backport::cherry_pick::{Cancellation, PickRequest, ProbeSchedule};
use backport::config::Settings;
use backport::error::Result;
use backport::platform::{PlatformService, create_platform_service};

/// Resolved settings, GitHub client and cancellation for one invocation
pub struct CommandContext {
    /// Layered settings
    pub settings: Settings,
    /// Platform service for the configured repository
    pub platform: Box<dyn PlatformService>,
    /// Probe polling delays
    pub schedule: ProbeSchedule,
    /// Fires on Ctrl-C or when `--timeout` elapses
    pub cancel: Cancellation,
}

impl CommandContext {
    /// Resolve the repository and authenticate
    pub async fn new(settings: Settings, cancel: Cancellation) -> Result<Self> {
        let platform_config = settings.platform_config()?;
        let platform = create_platform_service(&platform_config).await?;
        let schedule = settings.probe_schedule();

        Ok(Self {
            settings,
            platform,
            schedule,
            cancel,
        })
    }

    /// Build a request, defaulting the base branch from settings
    pub fn request(&self, pr_number: u64, target: &str, base: Option<&str>) -> PickRequest {
        PickRequest::new(
            pr_number,
            target,
            base.or(Some(self.settings.base_branch.as_str())),
        )
    }
}
