//! Terminal styling helpers
//!
//! Colors go through `anstream`, which strips them when stdout is not a
//! terminal or `NO_COLOR` is set.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Success marker
pub const CHECK: &str = "✓";
/// Failure marker
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Headings and names the user should notice
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Secondary information
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Identifiers: PR numbers, branches, counts
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Completed actions
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Something needs attention but nothing failed
    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    /// Failed outcomes
    fn failure(&self) -> String {
        self.red().to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.failure()
}

/// Dimmed bullet arrow
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner used while waiting on GitHub
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Clickable link when the terminal supports OSC 8, plain text otherwise
pub fn hyperlink(text: &str, url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        format!("{text} ({url})")
    }
}
