//! # Error Handling
//!
//! This module defines the centralized error type for `sibling-build`. It uses
//! `thiserror` to describe every failure mode the coordinator can hit, with
//! enough context (paths, project names, tool names) to act on the message.
//!
//! Only some of these are fatal for a coordinated run:
//!
//! - `ManifestMissing` aborts the operation that needed the project's sources.
//! - `SourceDirectoryMissing` aborts the combined build but leaves the caller
//!   free to continue with fan-out and release staging.
//! - `NoArtifactsFound` aborts release selection.
//! - `SubBuildFailure` aborts the whole run.
//!
//! Content mismatches between shared source files are not errors unless the
//! configured conflict policy asks for them to be (`SourceConflict`).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sibling-build operations
#[derive(Error, Debug)]
pub enum Error {
    /// The coordinator configuration could not be parsed or failed validation.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A project's source manifest or package manifest does not exist.
    #[error("Manifest missing for project '{project}': {}", path.display())]
    ManifestMissing { project: String, path: PathBuf },

    /// A manifest exists but does not have the expected shape.
    #[error("Invalid manifest {}: {message}", path.display())]
    ManifestInvalid { path: PathBuf, message: String },

    /// A project's manifest directory was missing while collecting sources
    /// for the combined build. `collected` is how many files were gathered
    /// before the abort.
    #[error("Source directory missing: {} ({collected} files collected before abort)", path.display())]
    SourceDirectoryMissing { path: PathBuf, collected: usize },

    /// The artifact pool contained nothing to anchor a release timestamp.
    #[error("No artifacts found in {} matching prefix '{prefix}'", pool.display())]
    NoArtifactsFound { pool: PathBuf, prefix: String },

    /// A sibling project's own build process failed.
    #[error("Sub-build failed for project '{project}': {message}")]
    SubBuildFailure { project: String, message: String },

    /// Shared source files diverged and the conflict policy refuses to
    /// overwrite them.
    #[error("Shared source conflict: {} file(s) differ from their canonical copy: {}", files.len(), files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>().join(", "))]
    SourceConflict { files: Vec<PathBuf> },

    /// An external tool (minifier) could not be run or reported failure.
    #[error("External tool '{tool}' failed: {message}")]
    ExternalTool { tool: String, message: String },

    /// An on-disk filesystem operation failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
