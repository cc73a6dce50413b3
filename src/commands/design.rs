//! # Design Command Implementation
//!
//! Refreshes the demo trees from whatever the siblings last built: fan-out,
//! stale directory cleanup and static asset copies. Nothing is rebuilt.

use anyhow::Result;

use sibling_build::output::{self, OutputConfig};
use sibling_build::phases::orchestrator;

pub fn execute() -> Result<()> {
    let config = super::load_config()?;
    let summary = orchestrator::execute_design(&config)?;
    output::print_lines(&output::format_summary(
        &OutputConfig::detect(),
        "Demos refreshed",
        &summary,
    ));
    Ok(())
}
