//! Release staging (`cdn`)
//!
//! Picks the current release set out of the artifact pool and stages it,
//! together with every project's version-tagged artifacts, into a single
//! flat directory.
//!
//! ## Process
//!
//! 1.  **Scan**: list pool files whose names carry a [`BuildStamp`] after
//!     the configured prefix.
//! 2.  **Reference**: the artifact with the latest modification time wins;
//!     equal times fall back to the lexicographically greatest file name.
//! 3.  **Group**: every pooled artifact whose stamp equals the reference's.
//! 4.  **Per project**: read the project's package version and glob
//!     `<root>/<artifacts>/*-<version>*`. A project without a package
//!     manifest contributes nothing and is reported as skipped.
//! 5.  **Stage**: copy the union into the staging directory by base name.
//!     When two selected files share a base name, the first one (pool group
//!     first, then projects in priority order) is staged and the other is
//!     reported with a warning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, ProjectConfig};
use crate::error::{Error, Result};
use crate::filesystem;
use crate::path::{base_name, expand_files};
use crate::project::read_version;
use crate::version::BuildStamp;

/// A timestamp-named file in the artifact pool.
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub stamp: BuildStamp,
    pub modified: SystemTime,
    /// Project whose tree contains the file, if any.
    pub project: Option<String>,
}

/// Outcome of release staging.
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    /// Stamp of the selected release group.
    pub stamp: BuildStamp,
    /// The newest artifact the stamp was taken from.
    pub reference: PathBuf,
    /// Files written into the staging directory.
    pub staged: Vec<PathBuf>,
    /// Projects skipped because their package manifest was missing.
    pub skipped: Vec<String>,
}

/// List pool files named `<prefix><stamp>...`. A missing pool is empty.
pub fn scan_pool(config: &Config) -> Result<Vec<BuildArtifact>> {
    let pool = &config.release.pool;
    let prefix = config.release_prefix();
    let mut artifacts = Vec::new();

    if !pool.is_dir() {
        return Ok(artifacts);
    }

    for entry in WalkDir::new(pool).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to scan '{}': {}", pool.display(), e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(stamp) = BuildStamp::from_file_name(&prefix, &file_name) else {
            continue;
        };
        let metadata = entry.metadata().map_err(|e| Error::Filesystem {
            message: format!("Failed to stat '{}': {}", entry.path().display(), e),
        })?;
        artifacts.push(BuildArtifact {
            project: infer_owner(config, entry.path()),
            path: entry.path().to_path_buf(),
            file_name,
            stamp,
            modified: metadata.modified()?,
        });
    }

    Ok(artifacts)
}

/// Newest artifact; ties on modification time go to the greatest name.
pub fn select_reference(artifacts: &[BuildArtifact]) -> Option<&BuildArtifact> {
    artifacts
        .iter()
        .max_by(|a, b| (a.modified, &a.file_name).cmp(&(b.modified, &b.file_name)))
}

/// Artifacts sharing `stamp`, sorted by file name.
pub fn group<'a>(artifacts: &'a [BuildArtifact], stamp: &BuildStamp) -> Vec<&'a BuildArtifact> {
    let mut matched: Vec<_> = artifacts.iter().filter(|a| &a.stamp == stamp).collect();
    matched.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    matched
}

/// Version-tagged artifacts of `project`, or `None` when the project has no
/// package manifest.
pub fn project_artifacts(config: &Config, project: &ProjectConfig) -> Result<Option<Vec<PathBuf>>> {
    let version = match read_version(project, &config.manifest) {
        Ok(v) => v,
        Err(Error::ManifestMissing { path, .. }) => {
            warn!("{}: {} not found, skipping its artifacts", project.name, path.display());
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let dir = project.root.join(&config.release.artifacts);
    let pattern = format!("*-{}*", glob::Pattern::escape(&version));
    let files = expand_files(&dir, &pattern)?;
    debug!("{}: {} artifact(s) for version {}", project.name, files.len(), version);
    Ok(Some(files))
}

/// Select the current release set and stage it.
pub fn execute(config: &Config) -> Result<ReleaseReport> {
    let artifacts = scan_pool(config)?;
    let reference = select_reference(&artifacts).ok_or_else(|| Error::NoArtifactsFound {
        pool: config.release.pool.clone(),
        prefix: config.release_prefix(),
    })?;
    let stamp = reference.stamp.clone();
    info!("Release stamp {} (from {})", stamp, reference.file_name);

    let mut selected: Vec<PathBuf> = group(&artifacts, &stamp)
        .into_iter()
        .map(|a| a.path.clone())
        .collect();

    let mut skipped = Vec::new();
    for project in &config.projects {
        match project_artifacts(config, project)? {
            Some(files) => selected.extend(files),
            None => skipped.push(project.name.clone()),
        }
    }

    // Staging is flat: the first file selected under a base name wins.
    let staging = &config.release.staging;
    let mut names: HashMap<String, PathBuf> = HashMap::new();
    let mut staged = Vec::new();
    for file in selected {
        let name = base_name(&file);
        if let Some(first) = names.get(&name) {
            if *first != file {
                warn!(
                    "{} not staged: {} already staged from {}",
                    file.display(),
                    name,
                    first.display()
                );
            }
            continue;
        }
        staged.push(filesystem::copy_into(&file, staging)?);
        names.insert(name, file);
    }

    info!(
        "Staged {} file(s) into {}",
        staged.len(),
        staging.display()
    );

    Ok(ReleaseReport {
        stamp,
        reference: reference.path.clone(),
        staged,
        skipped,
    })
}

fn infer_owner(config: &Config, path: &Path) -> Option<String> {
    config
        .projects
        .iter()
        .find(|p| path.starts_with(&p.root))
        .map(|p| p.name.clone())
}

/// Base names of a report's staged files, sorted.
pub fn staged_names(report: &ReleaseReport) -> Vec<String> {
    let mut names: Vec<String> = report.staged.iter().map(|p| base_name(p)).collect();
    names.sort();
    names
}
