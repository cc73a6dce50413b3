//! # Configuration Schema and Parsing
//!
//! This module defines the structures behind `sibling-build.yaml`, the file
//! that describes the sibling projects, their manifests, and where the
//! combined bundle, release staging, and demo assets live.
//!
//! ## Loading
//!
//! [`load`] reads the primary document and, when it exists, a local override
//! document next to it (`sibling-build.local.yaml` for the default name).
//! The override is merged shallowly: every top-level key it defines replaces
//! the primary document's key wholesale. The merged mapping is deserialized
//! into an immutable [`Config`] that is passed by reference to every phase.
//!
//! Relative paths are resolved against the primary document's directory so
//! the coordinator behaves the same regardless of the current directory.
//!
//! ## Example
//!
//! ```yaml
//! projects:
//!   - name: core
//!     root: ../core
//!   - name: charts
//!     root: ../charts
//! bundle:
//!   name: suite
//!   namespace: suite
//! fanout:
//!   pattern: "*.min.js"
//!   destination: "demo/*/assets"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::path::{normalize, rooted_pattern};

/// Default primary configuration file name.
pub const CONFIG_FILE: &str = "sibling-build.yaml";

/// Environment variable that overrides the primary configuration path.
pub const CONFIG_ENV: &str = "SIBLING_BUILD_CONFIG";

/// One sibling project. Order in [`Config::projects`] is priority order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Short identifier used in logs and error messages.
    pub name: String,
    /// Project root directory.
    pub root: PathBuf,
}

/// Where each project keeps its manifests, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// JSON document listing the project's ordered source files.
    pub sources: PathBuf,
    /// Key in the source manifest holding the ordered array of paths.
    pub key: String,
    /// Package manifest carrying the `version` field.
    pub package: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            sources: PathBuf::from("build/config.json"),
            key: "src".to_string(),
            package: PathBuf::from("package.json"),
        }
    }
}

/// How each project's own build is launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Program run inside `<project>/build`.
    pub command: String,
    /// Arguments passed to `command`.
    pub args: Vec<String>,
    /// Upper bound on simultaneous sub-builds.
    pub max_parallel: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: "grunt".to_string(),
            args: Vec::new(),
            max_parallel: 4,
        }
    }
}

/// External minifier invocation.
///
/// `args` may contain the placeholders `{sources}` (expands to one argument
/// per source file), `{flag}` and `{banner}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinifierConfig {
    pub command: String,
    #[serde(default = "default_minifier_args")]
    pub args: Vec<String>,
}

fn default_minifier_args() -> Vec<String> {
    [
        "{sources}",
        "--compress",
        "--mangle",
        "--define",
        "{flag}=false",
        "--comments",
        "some",
        "--preamble",
        "{banner}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Combined bundle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Base name of the bundle files (`<name>-<date>.js`).
    pub name: String,
    /// Directory the bundles are written to.
    pub output_dir: PathBuf,
    /// License banner template; supports `{name}`, `{version}` and `{date}`.
    pub banner: String,
    /// Namespace whose self-assignment statement is stripped from each file.
    pub namespace: Option<String>,
    /// Compile-time flag forced to `false` before minification.
    pub debug_flag: String,
    /// Minifier to run; the minified bundle is skipped when absent.
    pub minifier: Option<MinifierConfig>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            name: "bundle".to_string(),
            output_dir: PathBuf::from("dist"),
            banner: "/*! {name} v{version} | built {date} */".to_string(),
            namespace: None,
            debug_flag: "DEBUG".to_string(),
            minifier: None,
        }
    }
}

/// What to do when a duplicate shared source differs from its canonical copy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Overwrite the duplicate with the canonical content.
    #[default]
    Overwrite,
    /// Report every diverged duplicate and write nothing.
    Refuse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub on_conflict: ConflictPolicy,
}

/// Release staging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Directory holding timestamp-named bundles.
    pub pool: PathBuf,
    /// File name prefix preceding the timestamp token.
    /// Defaults to `<bundle.name>-`.
    pub prefix: Option<String>,
    /// Directory every selected artifact is copied into.
    pub staging: PathBuf,
    /// Per-project directory (relative to the project root) holding
    /// version-tagged artifacts.
    pub artifacts: PathBuf,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            pool: PathBuf::from("dist"),
            prefix: None,
            staging: PathBuf::from("release"),
            artifacts: PathBuf::from("lib"),
        }
    }
}

/// Fan-out of each project's minified build into its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanoutConfig {
    /// Build output directory relative to each project root.
    pub source: PathBuf,
    /// Glob selecting the files to distribute.
    pub pattern: String,
    /// Asset directory (may be a glob) relative to each receiving project root.
    pub destination: String,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("build/output"),
            pattern: "*.min.js".to_string(),
            destination: "demo/assets".to_string(),
        }
    }
}

/// A (source glob, destination list) pair consumed by the copier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetCopyRule {
    /// Directory the pattern is expanded against.
    pub from: PathBuf,
    /// Glob of files to copy, relative to `from`.
    pub pattern: String,
    /// Destination directories; each entry may itself be a glob.
    pub to: Vec<String>,
}

/// The complete, merged coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sibling projects in priority order (highest first).
    pub projects: Vec<ProjectConfig>,
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub release: ReleaseConfig,
    #[serde(default)]
    pub fanout: FanoutConfig,
    /// Globs naming stale generated directories to remove.
    #[serde(default)]
    pub cleanup: Vec<String>,
    /// Static asset copy rules.
    #[serde(default)]
    pub assets: Vec<AssetCopyRule>,
    /// Directory relative paths were resolved against.
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    /// Prefix preceding the timestamp token in pooled bundle names.
    pub fn release_prefix(&self) -> String {
        self.release
            .prefix
            .clone()
            .unwrap_or_else(|| format!("{}-", self.bundle.name))
    }

    fn resolve_paths(&mut self) {
        let root = self.root.clone();
        for project in &mut self.projects {
            project.root = normalize(&root.join(&project.root));
        }
        self.bundle.output_dir = root.join(&self.bundle.output_dir);
        self.release.pool = root.join(&self.release.pool);
        self.release.staging = root.join(&self.release.staging);
        for pattern in &mut self.cleanup {
            *pattern = rooted_pattern(&root, pattern);
        }
        for rule in &mut self.assets {
            rule.from = root.join(&rule.from);
            for dest in &mut rule.to {
                *dest = rooted_pattern(&root, dest);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.projects.is_empty() {
            return Err(Error::ConfigParse {
                message: "no projects configured".to_string(),
                hint: Some("add at least one entry under 'projects:'".to_string()),
            });
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.name.as_str()) {
                return Err(Error::ConfigParse {
                    message: format!("duplicate project name '{}'", project.name),
                    hint: Some("project names must be unique".to_string()),
                });
            }
        }

        if self.build.max_parallel == 0 {
            return Err(Error::ConfigParse {
                message: "build.max_parallel must be at least 1".to_string(),
                hint: None,
            });
        }

        Ok(())
    }
}

/// Parse a configuration document, resolving relative paths against `root`.
pub fn parse(yaml_content: &str, root: &Path) -> Result<Config> {
    let mapping = parse_mapping(yaml_content)?;
    from_mapping(mapping, root)
}

/// Load the configuration at `path`, merging the local override if present.
pub fn load(path: &Path) -> Result<Config> {
    let primary = read_mapping(path)?;
    let local = local_override_path(path);

    let merged = if local.is_file() {
        log::debug!("Merging local override {}", local.display());
        merge_shallow(primary, read_mapping(&local)?)
    } else {
        primary
    };

    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    from_mapping(merged, &root)
}

/// Path of the local override document belonging to `path`:
/// `sibling-build.yaml` pairs with `sibling-build.local.yaml`.
pub fn local_override_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.local.{}", stem, ext.to_string_lossy()),
        None => format!("{}.local", stem),
    };
    path.with_file_name(name)
}

/// Merge `overrides` into `base`; top-level keys of `overrides` win.
pub fn merge_shallow(mut base: Mapping, overrides: Mapping) -> Mapping {
    for (key, value) in overrides {
        base.insert(key, value);
    }
    base
}

fn read_mapping(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: Some(format!(
            "create {} or point {} at an existing file",
            CONFIG_FILE, CONFIG_ENV
        )),
    })?;
    parse_mapping(&content)
}

fn parse_mapping(yaml_content: &str) -> Result<Mapping> {
    match serde_yaml::from_str::<Value>(yaml_content)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::ConfigParse {
            message: "expected a YAML mapping at the top level".to_string(),
            hint: None,
        }),
    }
}

fn from_mapping(mapping: Mapping, root: &Path) -> Result<Config> {
    let mut config: Config =
        serde_yaml::from_value(Value::Mapping(mapping)).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?;
    config.root = root.to_path_buf();
    config.resolve_paths();
    config.validate()?;
    Ok(config)
}
