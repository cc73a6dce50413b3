//! Step 5: Cleanup of stale generated example directories
//!
//! Each configured glob is expanded to existing directories, which are
//! removed recursively. Globs matching nothing are skipped.

use log::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::filesystem;
use crate::path::expand_dirs;

/// Remove every directory matched by `patterns`. Returns how many were removed.
pub fn remove_matching(patterns: &[String]) -> Result<usize> {
    let mut removed = 0;
    for pattern in patterns {
        for dir in expand_dirs(pattern)? {
            debug!("Removing {}", dir.display());
            filesystem::remove_dir(&dir)?;
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn execute(config: &Config) -> Result<usize> {
    let removed = remove_matching(&config.cleanup)?;
    info!("Cleanup: {} stale directories removed", removed);
    Ok(removed)
}
