//! Create command - check, confirm, then open cherry-pick PRs

use crate::cli::check::print_report;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, hyperlink};
use crate::cli::{OutputFormat, finish_spinner, print_json, spinner};
use anstream::println;
use backport::cherry_pick::{Confirmation, check_cherry_pick_conflicts, create_cherry_pick_prs};
use backport::error::{Error, Result};
use backport::types::{CherryPickPr, ConflictReport};
use dialoguer::Confirm;
use serde::Serialize;

/// Options for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Merged PR to cherry-pick
    pub pr_number: u64,
    /// Target branches, in the order given
    pub targets: Vec<String>,
    /// Expected base branch of the original PR
    pub base: Option<String>,
    /// Skip the interactive prompt and confirm every clean target
    pub yes: bool,
}

#[derive(Serialize)]
struct SkippedTarget {
    target: String,
    details: Vec<String>,
}

#[derive(Serialize)]
struct FailedTarget {
    target: String,
    error: String,
}

#[derive(Serialize)]
struct CreateOutput {
    prs: Vec<CherryPickPr>,
    skipped: Vec<SkippedTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed: Option<FailedTarget>,
}

/// Run the create command
pub async fn run_create(
    ctx: &CommandContext,
    options: CreateOptions,
    format: OutputFormat,
) -> Result<()> {
    let pr_number = options.pr_number;
    let base = options.base.as_deref();

    // Check every target before asking anything
    let mut clean = Vec::new();
    let mut skipped = Vec::new();
    for target in &options.targets {
        let request = ctx.request(pr_number, target, base);
        let progress = spinner(
            format,
            format!("Checking PR #{pr_number} against {target}..."),
        );
        let report =
            check_cherry_pick_conflicts(ctx.platform.as_ref(), &request, &ctx.schedule, &ctx.cancel)
                .await;
        finish_spinner(progress);
        let report = report?;

        if format.is_human() {
            print_report(&request, &report);
        }
        if report.has_conflicts {
            skipped.push(SkippedTarget {
                target: target.clone(),
                details: report.details,
            });
        } else {
            clean.push((target.clone(), report));
        }
    }

    if clean.is_empty() {
        if format.is_human() {
            println!("{}", "Nothing to cherry-pick: every target has conflicts.".muted());
            return Ok(());
        }
        return print_json(&CreateOutput {
            prs: Vec::new(),
            skipped,
            failed: None,
        });
    }

    let confirmed = if options.yes {
        clean.into_iter().map(|(target, _)| target).collect()
    } else {
        prompt(pr_number, &clean)?
    };
    if confirmed.is_empty() {
        if format.is_human() {
            println!("{}", "Aborted".muted());
        }
        return Ok(());
    }
    let confirmation = Confirmation::granted(pr_number, confirmed);

    let progress = spinner(
        format,
        format!("Opening cherry-pick PR(s) for #{pr_number}..."),
    );
    let batch = create_cherry_pick_prs(
        ctx.platform.as_ref(),
        &confirmation,
        base.or(Some(ctx.settings.base_branch.as_str())),
        &ctx.schedule,
        &ctx.cancel,
    )
    .await;
    finish_spinner(progress);

    let (failed, error) = match batch.failed {
        Some((target, e)) => (
            Some(FailedTarget {
                target,
                error: e.to_string(),
            }),
            Some(e),
        ),
        None => (None, None),
    };

    if format == OutputFormat::Json {
        print_json(&CreateOutput {
            prs: batch.created,
            skipped,
            failed,
        })?;
    } else {
        for pr in &batch.created {
            println!(
                "{} {} {}",
                check(),
                format!("#{}", pr.pr_number).accent(),
                hyperlink(&pr.title, &pr.url)
            );
        }
        if !batch.created.is_empty() {
            println!();
            println!(
                "{}",
                format!("Opened {} cherry-pick PR(s)", batch.created.len()).success()
            );
        }
    }

    error.map_or(Ok(()), Err)
}

/// Ask once per clean target; only approved targets are returned
fn prompt(pr_number: u64, clean: &[(String, ConflictReport)]) -> Result<Vec<String>> {
    let mut approved = Vec::new();
    for (target, report) in clean {
        let caution = if report.details.is_empty() {
            String::new()
        } else {
            " (conflict check was inconclusive)".to_string()
        };
        let yes = Confirm::new()
            .with_prompt(format!(
                "Open a PR cherry-picking {} commit(s) of #{pr_number} onto {target}{caution}?",
                report.commits
            ))
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?;
        if yes {
            approved.push(target.clone());
        }
    }
    Ok(approved)
}
