//! # CDN Build Command Implementation
//!
//! `build` followed by `cdn`. Release staging only runs when the build
//! succeeded.

use anyhow::Result;

use sibling_build::version::VersionBump;

pub fn execute() -> Result<()> {
    let config = super::load_config()?;
    super::run_build(&config, VersionBump::none(), "Build complete")?;
    super::cdn::stage(&config)
}
