//! # CDN Command Implementation
//!
//! Stages the most recent release set: the newest stamped bundle in the
//! artifact pool plus every project's version-matched artifacts, copied
//! flat into the staging directory.

use anyhow::Result;

use sibling_build::output::{self, OutputConfig};
use sibling_build::phases::orchestrator;

pub fn execute() -> Result<()> {
    let config = super::load_config()?;
    stage(&config)
}

pub(crate) fn stage(config: &sibling_build::config::Config) -> Result<()> {
    let report = orchestrator::execute_release(config)?;
    output::print_lines(&output::format_release(&OutputConfig::detect(), &report));
    Ok(())
}
