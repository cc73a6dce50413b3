//! # Next Command Implementation
//!
//! A bleeding-edge build. Each project's package version is rewritten to
//! `X.Y.(Z+1)-next.<YYYYMMDDHHMM>` for the duration of the build and
//! restored afterwards, including when the build fails.

use anyhow::Result;

use sibling_build::version::VersionBump;

/// Timestamp appended to the `next` pre-release identifier.
fn next_stamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M").to_string()
}

pub fn execute() -> Result<()> {
    let config = super::load_config()?;
    let bump = VersionBump::apply(&config, &next_stamp())?;
    if bump.is_empty() {
        log::warn!("No package manifest found, building without a version bump");
    } else {
        log::info!("Bumped {} package version(s) for this build", bump.len());
    }
    super::run_build(&config, bump, "Next build complete")?;
    Ok(())
}
