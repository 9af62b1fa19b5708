//! Show command - summary and optional diff of one PR

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow};
use crate::cli::{OutputFormat, finish_spinner, print_json, spinner};
use anstream::println;
use backport::error::Result;
use backport::inspect::{PullRequestSummary, fetch_pull_request, pull_request_diff};
use serde::Serialize;

#[derive(Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    summary: &'a PullRequestSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff: Option<&'a str>,
}

/// Run the show command
pub async fn run_show(
    ctx: &CommandContext,
    pr_number: u64,
    with_diff: bool,
    format: OutputFormat,
) -> Result<()> {
    let progress = spinner(format, format!("Fetching PR #{pr_number}..."));
    let fetched = fetch(ctx, pr_number, with_diff).await;
    finish_spinner(progress);
    let (summary, diff) = fetched?;

    if format == OutputFormat::Json {
        return print_json(&ShowOutput {
            summary: &summary,
            diff: diff.as_deref(),
        });
    }

    println!(
        "{} {}",
        format!("#{}", summary.number).accent(),
        summary.title.emphasis()
    );
    println!(
        "{}",
        format!(
            "@{}  {}  +{} -{}",
            summary.author, summary.state, summary.additions, summary.deletions
        )
        .muted()
    );
    if !summary.body.trim().is_empty() {
        println!();
        println!("{}", summary.body.trim());
    }
    println!();
    println!("{}", format!("Files ({}):", summary.files.len()).emphasis());
    for file in &summary.files {
        println!("  {} {file}", arrow());
    }

    if let Some(diff) = diff {
        println!();
        println!("{diff}");
    }
    Ok(())
}

async fn fetch(
    ctx: &CommandContext,
    pr_number: u64,
    with_diff: bool,
) -> Result<(PullRequestSummary, Option<String>)> {
    let summary = fetch_pull_request(ctx.platform.as_ref(), pr_number, &ctx.cancel).await?;
    let diff = if with_diff {
        Some(pull_request_diff(ctx.platform.as_ref(), pr_number, &ctx.cancel).await?)
    } else {
        None
    };
    Ok((summary, diff))
}
