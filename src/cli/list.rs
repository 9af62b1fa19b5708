//! List command - PRs merged within the lookback window

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow};
use crate::cli::{OutputFormat, finish_spinner, print_json, spinner};
use anstream::println;
use backport::cherry_pick::list_merged_prs;
use backport::error::Result;
use backport::types::MergedPr;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct ListOutput<'a> {
    prs: &'a [MergedPr],
}

/// Run the list command
pub async fn run_list(ctx: &CommandContext, days: Option<i64>, format: OutputFormat) -> Result<()> {
    let days = days.unwrap_or(ctx.settings.lookback_days);

    let progress = spinner(format, "Fetching merged PRs...".to_string());
    let prs = list_merged_prs(ctx.platform.as_ref(), days, Utc::now(), &ctx.cancel).await;
    finish_spinner(progress);
    let prs = prs?;

    if format == OutputFormat::Json {
        return print_json(&ListOutput { prs: &prs });
    }

    if prs.is_empty() {
        println!("{}", "No merged PRs in the lookback window.".muted());
        return Ok(());
    }

    println!(
        "{} {}",
        "Merged PRs:".emphasis(),
        format!("({})", prs.len()).muted()
    );
    for pr in &prs {
        let short_sha: String = pr.merge_sha.chars().take(7).collect();
        println!(
            "  {} {} {}",
            arrow(),
            format!("#{}", pr.number).accent(),
            pr.title
        );
        println!(
            "      {}",
            format!("@{}  merged {}  {short_sha}", pr.author, pr.merged_at).muted()
        );
    }
    Ok(())
}
