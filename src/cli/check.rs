//! Check command - probe whether a merged PR cherry-picks cleanly

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, cross};
use crate::cli::{OutputFormat, finish_spinner, print_json, spinner};
use anstream::println;
use backport::cherry_pick::{PickRequest, check_cherry_pick_conflicts};
use backport::error::Result;
use backport::types::ConflictReport;

/// Run the check command
pub async fn run_check(
    ctx: &CommandContext,
    pr_number: u64,
    target: &str,
    base: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
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

    if format == OutputFormat::Json {
        return print_json(&report);
    }
    print_report(&request, &report);
    Ok(())
}

/// Human-readable conflict report, shared with the create command
pub fn print_report(request: &PickRequest, report: &ConflictReport) {
    let pair = format!("#{} {} {}", request.pr_number, arrow(), request.target_branch);
    if report.has_conflicts {
        println!(
            "{} {} {}",
            cross(),
            pair.accent(),
            "has conflicts".failure()
        );
    } else {
        println!(
            "{} {} {}",
            check(),
            pair.accent(),
            format!("applies cleanly ({} commit(s))", report.commits).success()
        );
    }

    for detail in &report.details {
        let line = format!("   {detail}");
        if report.has_conflicts {
            println!("{}", line.muted());
        } else {
            println!("{}", line.warn());
        }
    }
}
