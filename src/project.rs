//! # Project Manifest Resolver
//!
//! Each sibling project declares its ordered source files in a JSON manifest
//! (`build/config.json` by default) under a configurable key, and its current
//! version in a package manifest (`package.json`). This module reads both.
//!
//! Manifest entries are relative to the manifest's own directory, so the
//! default `build/config.json` lists sources as `../src/...`. Entries are
//! lexically normalized, must stay inside the project root, and are given a
//! canonical key (see [`crate::path::canonical_key`]) so the same shared file
//! can be recognised across projects.
//!
//! A missing manifest produces [`Error::ManifestMissing`]. Callers decide how
//! fatal that is: source collection stops at the first missing project, while
//! release staging just skips that project's contribution.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::{Config, ManifestConfig, ProjectConfig};
use crate::error::{Error, Result};
use crate::path::{canonical_key, normalize};

/// A source file as declared by a project's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileRef {
    /// Name of the declaring project.
    pub project: String,
    /// Absolute (normalized) location on disk.
    pub path: PathBuf,
    /// Identity across projects, e.g. `src/util/events.js`.
    pub key: String,
}

/// Location of the source manifest of `project`.
pub fn source_manifest_path(project: &ProjectConfig, manifest: &ManifestConfig) -> PathBuf {
    project.root.join(&manifest.sources)
}

/// Location of the package manifest of `project`.
pub fn package_manifest_path(project: &ProjectConfig, manifest: &ManifestConfig) -> PathBuf {
    project.root.join(&manifest.package)
}

/// Read the ordered source list declared by `project`.
pub fn read_sources(
    project: &ProjectConfig,
    manifest: &ManifestConfig,
) -> Result<Vec<SourceFileRef>> {
    let path = source_manifest_path(project, manifest);
    let document = read_json(&project.name, &path)?;
    let root = normalize(&project.root);
    let base = path.parent().unwrap_or(&project.root);

    let entries = lookup(&document, &manifest.key)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::ManifestInvalid {
            path: path.clone(),
            message: format!("expected an array of paths under '{}'", manifest.key),
        })?;

    entries
        .iter()
        .map(|entry| {
            let relative = entry.as_str().ok_or_else(|| Error::ManifestInvalid {
                path: path.clone(),
                message: format!("non-string entry {} under '{}'", entry, manifest.key),
            })?;
            let resolved = normalize(&base.join(relative));
            if !resolved.starts_with(&root) {
                return Err(Error::ManifestInvalid {
                    path: path.clone(),
                    message: format!(
                        "entry '{}' resolves outside project root {}",
                        relative,
                        root.display()
                    ),
                });
            }
            Ok(SourceFileRef {
                project: project.name.clone(),
                key: canonical_key(&root, &resolved),
                path: resolved,
            })
        })
        .collect()
}

/// Read the `version` field of `project`'s package manifest.
pub fn read_version(project: &ProjectConfig, manifest: &ManifestConfig) -> Result<String> {
    let path = package_manifest_path(project, manifest);
    let document = read_json(&project.name, &path)?;

    document
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::ManifestInvalid {
            path,
            message: "missing string field 'version'".to_string(),
        })
}

/// Sources gathered across all projects in priority order.
#[derive(Debug, Clone, Default)]
pub struct SourceCollection {
    /// Every declared source, duplicates included, in priority order.
    pub files: Vec<SourceFileRef>,
    /// The first project whose manifest was missing, with the manifest path.
    /// Collection stops there, so `files` is truncated when this is set.
    pub missing: Option<(String, PathBuf)>,
}

/// Concatenate every project's source list in priority order.
///
/// Stops at the first project without a source manifest; other errors
/// (malformed JSON, bad entries) are returned directly.
pub fn collect_sources(config: &Config) -> Result<SourceCollection> {
    let mut collection = SourceCollection::default();

    for project in &config.projects {
        match read_sources(project, &config.manifest) {
            Ok(files) => {
                log::debug!("{}: {} source files declared", project.name, files.len());
                collection.files.extend(files);
            }
            Err(Error::ManifestMissing { project, path }) => {
                collection.missing = Some((project, path));
                break;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(collection)
}

/// Resolve a dotted key (`concat.src`) inside a JSON document.
fn lookup<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(document, |value, part| value.get(part))
}

fn read_json(project: &str, path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(Error::ManifestMissing {
            project: project.to_string(),
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::ManifestInvalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
