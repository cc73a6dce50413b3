//! Orchestrator for coordinated runs
//!
//! This module sequences the steps behind each CLI command. The external
//! collaborators (sub-build runner, minifier) are injected so the same
//! sequencing can run against real tools or test doubles.

use log::{error, warn};

use super::combine::{self, CombinedOutput};
use super::release::{self, ReleaseReport};
use super::{cleanup, dedup, fanout, subbuild};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::tools::{Minifier, SubBuildRunner};
use crate::version::{BuildStamp, VersionBump};

/// External tools used by a build.
pub struct Collaborators<'a> {
    pub runner: &'a dyn SubBuildRunner,
    pub minifier: Option<&'a dyn Minifier>,
}

/// Counts and outputs of a coordinated run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Shared source files rewritten by the sync.
    pub synced: usize,
    /// Sub-builds completed.
    pub built: usize,
    /// Combined build output; `None` when the step was skipped or aborted.
    pub combined: Option<CombinedOutput>,
    /// Files distributed between siblings.
    pub fanned_out: usize,
    /// Stale directories removed.
    pub cleaned: usize,
    /// Static asset files copied.
    pub assets: usize,
    /// Package manifests restored after a version bump.
    pub reset: usize,
}

/// Execute a full build:
///
/// 1. Sync shared sources
/// 2. Run sub-builds (bounded-parallel)
/// 3. Combined build
/// 4. Fan-out
/// 5. Cleanup
/// 6. Static assets
/// 7. Reset `bump`
///
/// The reset runs even when an earlier step failed; the earlier error wins.
/// Step 1 already fails on a missing manifest, so step 3 can only find one
/// missing when a sub-build removed it; that is logged and the run continues
/// without a bundle.
pub fn execute_build(
    config: &Config,
    tools: &Collaborators<'_>,
    stamp: &BuildStamp,
    bump: VersionBump,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let outcome = run_build_steps(config, tools, stamp, &mut summary);

    match (outcome, bump.reset()) {
        (Ok(()), Ok(restored)) => {
            summary.reset = restored;
            Ok(summary)
        }
        (Ok(()), Err(e)) => Err(e),
        (Err(e), Ok(_)) => Err(e),
        (Err(e), Err(reset_err)) => {
            error!("Version reset failed: {}", reset_err);
            Err(e)
        }
    }
}

fn run_build_steps(
    config: &Config,
    tools: &Collaborators<'_>,
    stamp: &BuildStamp,
    summary: &mut RunSummary,
) -> Result<()> {
    summary.synced = dedup::execute(config)?.copied.len();
    summary.built = subbuild::execute(config, tools.runner)?;

    summary.combined = match combine::execute(config, tools.minifier, stamp) {
        Ok(output) => Some(output),
        Err(e @ Error::SourceDirectoryMissing { .. }) => {
            warn!("Combined bundle not produced: {}", e);
            None
        }
        Err(e) => return Err(e),
    };

    refresh_demos(config, summary)
}

/// Execute the demo refresh used by `design`: fan-out, cleanup and static
/// assets, without rebuilding anything.
pub fn execute_design(config: &Config) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    refresh_demos(config, &mut summary)?;
    Ok(summary)
}

fn refresh_demos(config: &Config, summary: &mut RunSummary) -> Result<()> {
    summary.fanned_out = fanout::execute(config)?;
    summary.cleaned = cleanup::execute(config)?;
    summary.assets = fanout::copy_static_assets(config)?;
    Ok(())
}

/// Execute release staging used by `cdn`.
pub fn execute_release(config: &Config) -> Result<ReleaseReport> {
    release::execute(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes a minified output file for each project, like a real build.
    struct FakeBuild {
        fail: Option<String>,
        /// Project whose build deletes its own source manifest.
        drops_manifest: Option<String>,
        calls: Mutex<usize>,
    }

    impl SubBuildRunner for FakeBuild {
        fn run(&self, project: &ProjectConfig) -> Result<()> {
            *self.calls.lock().unwrap() += 1;
            if self.fail.as_deref() == Some(project.name.as_str()) {
                return Err(Error::SubBuildFailure {
                    project: project.name.clone(),
                    message: "boom".to_string(),
                });
            }
            if self.drops_manifest.as_deref() == Some(project.name.as_str()) {
                fs::remove_file(project.root.join("build/config.json")).unwrap();
            }
            let out = project.root.join("build/output");
            fs::create_dir_all(&out).unwrap();
            fs::write(out.join(format!("{}.min.js", project.name)), "built").unwrap();
            Ok(())
        }
    }

    fn fake(fail: Option<&str>) -> FakeBuild {
        FakeBuild {
            fail: fail.map(str::to_string),
            drops_manifest: None,
            calls: Mutex::new(0),
        }
    }

    fn setup(root: &Path, names: &[&str]) -> Config {
        let mut yaml = String::from("projects:\n");
        for name in names {
            let dir = root.join(name);
            fs::create_dir_all(dir.join("src")).unwrap();
            fs::create_dir_all(dir.join("build")).unwrap();
            fs::create_dir_all(dir.join("demo/assets")).unwrap();
            fs::write(dir.join("src/events.js"), format!("events_{}();", name)).unwrap();
            fs::write(dir.join(format!("src/{}.js", name)), format!("{}();", name)).unwrap();
            fs::write(
                dir.join("build/config.json"),
                serde_json::json!({ "src": ["../src/events.js", format!("../src/{}.js", name)] })
                    .to_string(),
            )
            .unwrap();
            fs::write(dir.join("package.json"), "{\n  \"version\": \"1.0.0\"\n}\n").unwrap();
            yaml.push_str(&format!("  - {{ name: {0}, root: {0} }}\n", name));
        }
        yaml.push_str("bundle:\n  name: suite\ncleanup: [\"stale-*\"]\n");
        fs::create_dir_all(root.join("stale-demo")).unwrap();
        crate::config::parse(&yaml, root).unwrap()
    }

    fn stamp() -> BuildStamp {
        BuildStamp::parse("2024.05.06").unwrap()
    }

    #[test]
    fn test_build_runs_all_steps_in_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = setup(root, &["a", "b", "c", "d"]);
        let runner = fake(None);
        let tools = Collaborators {
            runner: &runner,
            minifier: None,
        };

        let summary = execute_build(&config, &tools, &stamp(), VersionBump::none()).unwrap();

        assert_eq!(summary.synced, 3);
        assert_eq!(summary.built, 4);
        assert_eq!(summary.fanned_out, 12);
        assert_eq!(summary.cleaned, 1);
        assert_eq!(summary.reset, 0);

        // The bundle was built from the synchronized tree.
        let combined = summary.combined.unwrap();
        assert_eq!(combined.sources, 5);
        let bundle = fs::read_to_string(combined.bundle).unwrap();
        assert!(bundle.contains("events_a();"));
        assert!(!bundle.contains("events_b();"));

        assert_eq!(
            fs::read_to_string(root.join("d/src/events.js")).unwrap(),
            "events_a();"
        );
        assert!(root.join("a/demo/assets/b.min.js").is_file());
        assert!(!root.join("stale-demo").exists());
    }

    #[test]
    fn test_sub_build_failure_aborts_but_resets_versions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = setup(root, &["a", "b"]);
        let runner = fake(Some("b"));
        let tools = Collaborators {
            runner: &runner,
            minifier: None,
        };

        let bump = VersionBump::apply(&config, "1").unwrap();
        assert!(fs::read_to_string(root.join("a/package.json"))
            .unwrap()
            .contains("1.0.1-next.1"));

        let err = execute_build(&config, &tools, &stamp(), bump).unwrap_err();
        assert!(matches!(err, Error::SubBuildFailure { .. }));

        // Aggregation never ran.
        assert!(!root.join("dist").exists());
        assert!(root.join("stale-demo").exists());
        // Versions restored.
        assert_eq!(
            fs::read_to_string(root.join("a/package.json")).unwrap(),
            "{\n  \"version\": \"1.0.0\"\n}\n"
        );
    }

    #[test]
    fn test_bumped_build_reports_reset() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = setup(root, &["a", "b"]);
        let runner = fake(None);
        let tools = Collaborators {
            runner: &runner,
            minifier: None,
        };

        let bump = VersionBump::apply(&config, "9").unwrap();
        let summary = execute_build(&config, &tools, &stamp(), bump).unwrap();
        assert_eq!(summary.reset, 2);

        let bundle = fs::read_to_string(summary.combined.unwrap().bundle).unwrap();
        assert!(bundle.contains("1.0.1-next.9"));
    }

    #[test]
    fn test_manifest_lost_during_sub_builds_skips_bundle_only() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = setup(root, &["a", "b"]);
        let runner = FakeBuild {
            drops_manifest: Some("b".to_string()),
            ..fake(None)
        };
        let tools = Collaborators {
            runner: &runner,
            minifier: None,
        };

        let summary = execute_build(&config, &tools, &stamp(), VersionBump::none()).unwrap();

        assert_eq!(summary.built, 2);
        assert!(summary.combined.is_none());
        assert!(!root.join("dist").exists());
        // Distribution steps still ran.
        assert_eq!(summary.fanned_out, 2);
        assert_eq!(summary.cleaned, 1);
    }

    #[test]
    fn test_design_skips_builds() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = setup(root, &["a", "b"]);
        fs::create_dir_all(root.join("a/build/output")).unwrap();
        fs::write(root.join("a/build/output/a.min.js"), "old").unwrap();

        let summary = execute_design(&config).unwrap();
        assert_eq!(summary.built, 0);
        assert_eq!(summary.fanned_out, 1);
        assert_eq!(summary.cleaned, 1);
        assert!(summary.combined.is_none());
    }
}
