//! CLI command implementations

mod auth;
mod check;
mod context;
mod create;
mod list;
mod show;
pub mod style;

pub use auth::run_auth;
pub use check::run_check;
pub use context::CommandContext;
pub use create::{CreateOptions, run_create};
pub use list::run_list;
pub use show::run_show;

use backport::error::{Error, Result};
use indicatif::ProgressBar;
use serde::Serialize;
use std::time::Duration;
use style::spinner_style;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Styled text for people
    Human,
    /// One pretty-printed JSON document
    Json,
}

impl OutputFormat {
    /// Whether human-facing output (spinners, prompts' context) should be shown
    pub const fn is_human(self) -> bool {
        matches!(self, Self::Human)
    }
}

/// Write `value` to stdout as JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Internal(format!("failed to serialize output: {e}")))?;
    anstream::println!("{json}");
    Ok(())
}

/// Start a spinner on stderr in human mode
fn spinner(format: OutputFormat, message: String) -> Option<ProgressBar> {
    format.is_human().then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    })
}

/// Clear a spinner started by [`spinner`]
fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}
