//! # Build Command Implementation
//!
//! Syncs shared sources, builds every sibling with bounded parallelism,
//! produces the combined bundle and distributes outputs to the demo trees.

use anyhow::Result;

use sibling_build::version::VersionBump;

pub fn execute() -> Result<()> {
    let config = super::load_config()?;
    super::run_build(&config, VersionBump::none(), "Build complete")?;
    Ok(())
}
