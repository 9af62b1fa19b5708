//! Auth command - report where the token comes from and who it belongs to

use crate::cli::style::{Stylize, check};
use crate::cli::{OutputFormat, print_json};
use anstream::println;
use backport::auth::{get_github_auth, test_github_auth};
use backport::config::Settings;
use backport::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct AuthOutput {
    login: String,
    source: String,
    host: String,
}

/// Run the auth command
pub async fn run_auth(settings: &Settings, format: OutputFormat) -> Result<()> {
    let config = get_github_auth(settings.host.as_deref()).await?;
    let login = test_github_auth(&config).await?;
    let host = config
        .host
        .clone()
        .unwrap_or_else(|| "github.com".to_string());

    if format == OutputFormat::Json {
        return print_json(&AuthOutput {
            login,
            source: config.source.to_string(),
            host,
        });
    }

    println!(
        "{} Authenticated to {} as {}",
        check(),
        host.emphasis(),
        login.accent()
    );
    println!("{}", format!("   token from {}", config.source).muted());
    Ok(())
}
