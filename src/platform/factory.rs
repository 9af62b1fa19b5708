//! Platform service construction

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::{Platform, PlatformConfig};

/// Create a platform service for the configured repository
///
/// Resolves credentials for the repository's host and builds the matching
/// service.
pub async fn create_platform_service(config: &PlatformConfig) -> Result<Box<dyn PlatformService>> {
    match config.platform {
        Platform::GitHub => {
            let auth = get_github_auth(config.host.as_deref()).await?;
            let service = GitHubService::new(
                &auth.token,
                config.owner.clone(),
                config.repo.clone(),
                config.host.clone(),
            )?;
            Ok(Box::new(service))
        }
    }
}
