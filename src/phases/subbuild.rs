//! Step 2: Sub-builds
//!
//! Runs every sibling project's own build on a dedicated rayon pool sized by
//! `build.max_parallel`. Sub-builds share no state with each other. The first
//! failure stops scheduling of builds that have not started yet and is
//! returned as the step's error. No timeout is enforced.

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::tools::SubBuildRunner;

/// Run all sub-builds. Returns how many completed.
pub fn execute(config: &Config, runner: &dyn SubBuildRunner) -> Result<usize> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.build.max_parallel)
        .thread_name(|i| format!("sub-build-{}", i))
        .build()
        .map_err(|e| Error::SubBuildFailure {
            project: "*".to_string(),
            message: format!("cannot start worker pool: {}", e),
        })?;

    let progress = ProgressBar::new(config.projects.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} sub-builds {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let result: Result<Vec<()>> = pool.install(|| {
        config
            .projects
            .par_iter()
            .map(|project| {
                info!("{}: build started", project.name);
                let outcome = runner.run(project);
                if outcome.is_ok() {
                    info!("{}: build finished", project.name);
                }
                progress.inc(1);
                outcome
            })
            .collect()
    });

    progress.finish_and_clear();
    result.map(|done| done.len())
}
