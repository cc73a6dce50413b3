//! # Console Output
//!
//! Step summaries printed to stdout after a command finishes. Log lines go
//! to stderr through `env_logger`; this module is the human-facing digest.
//!
//! Colors and emoji are used only when the terminal supports them. The
//! usual switches are honoured: `NO_COLOR` (any value) and `CLICOLOR=0`
//! disable them, `CLICOLOR_FORCE=1` forces them on, `TERM=dumb` disables
//! them.

use std::env;

use console::style;

use crate::phases::orchestrator::RunSummary;
use crate::phases::release::{staged_names, ReleaseReport};

/// Whether styled output should be produced.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Detect color support from the environment and the terminal.
    pub fn detect() -> Self {
        Self {
            use_color: Self::detect_color_support(),
        }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Emoji when styled, plain marker otherwise.
    pub fn marker<'a>(&self, emoji: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            emoji
        } else {
            plain
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render a run summary as lines of text.
pub fn format_summary(config: &OutputConfig, title: &str, summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        config.marker("✅", "[OK]"),
        config.heading(title)
    )];

    if summary.built > 0 || summary.synced > 0 {
        lines.push(format!("   shared sources copied: {}", summary.synced));
        lines.push(format!("   sub-builds completed:  {}", summary.built));
    }
    match &summary.combined {
        Some(combined) => {
            lines.push(format!(
                "   bundle: {} ({} sources)",
                combined.bundle.display(),
                combined.sources
            ));
            if let Some(minified) = &combined.minified {
                lines.push(format!("   minified: {}", minified.display()));
            }
        }
        None if summary.built > 0 => {
            lines.push(format!(
                "   {} combined bundle not produced",
                config.marker("⚠️", "[WARN]")
            ));
        }
        None => {}
    }
    lines.push(format!("   fan-out copies:        {}", summary.fanned_out));
    lines.push(format!("   stale dirs removed:    {}", summary.cleaned));
    lines.push(format!("   static assets copied:  {}", summary.assets));
    if summary.reset > 0 {
        lines.push(format!("   versions restored:     {}", summary.reset));
    }
    lines
}

/// Render a release report as lines of text.
pub fn format_release(config: &OutputConfig, report: &ReleaseReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {}",
        config.marker("📦", "[RELEASE]"),
        config.heading("Release staged"),
        report.stamp
    )];
    lines.push(format!("   files staged: {}", report.staged.len()));
    for name in staged_names(report) {
        lines.push(format!("     {}", name));
    }
    for name in &report.skipped {
        lines.push(format!(
            "   {} skipped {} (no package manifest)",
            config.marker("⚠️", "[WARN]"),
            name
        ));
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
