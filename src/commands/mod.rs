//! # CLI Command Implementations
//!
//! One file per subcommand of the `sibling-build` tool. Each exposes an
//! `execute` function that loads the configuration, calls into the
//! `sibling_build` library and prints a summary.
//!
//! None of the commands take arguments. The configuration path comes from
//! `SIBLING_BUILD_CONFIG` when set, otherwise `sibling-build.yaml` in the
//! current directory.

pub mod build;
pub mod cdn;
pub mod cdn_build;
pub mod design;
pub mod next;

use anyhow::{Context, Result};
use std::path::PathBuf;

use sibling_build::config::{self, Config, CONFIG_ENV, CONFIG_FILE};
use sibling_build::output::{self, OutputConfig};
use sibling_build::phases::orchestrator::{self, Collaborators, RunSummary};
use sibling_build::tools::{CommandMinifier, CommandRunner, Minifier};
use sibling_build::version::{BuildStamp, VersionBump};

/// Resolve the configuration file path from the environment.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Load and validate the configuration once per invocation.
pub fn load_config() -> Result<Config> {
    let path = config_path();
    log::debug!("Loading configuration from {}", path.display());
    config::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Run the full build with the process-backed tools, resetting `bump` at
/// the end, and print the summary.
pub fn run_build(config: &Config, bump: VersionBump, title: &str) -> Result<RunSummary> {
    let runner = CommandRunner::new(&config.build);
    let minifier = config.bundle.minifier.as_ref().map(CommandMinifier::new);
    let tools = Collaborators {
        runner: &runner,
        minifier: minifier.as_ref().map(|m| m as &dyn Minifier),
    };

    let summary = orchestrator::execute_build(config, &tools, &BuildStamp::today(), bump)?;
    output::print_lines(&output::format_summary(
        &OutputConfig::detect(),
        title,
        &summary,
    ));
    Ok(summary)
}
