//! # Sibling Build Library
//!
//! This library coordinates the build of several sibling libraries that
//! share source files. It is used by the `sibling-build` command-line tool,
//! but every step is available on its own.
//!
//! ## Quick Example
//!
//! ```
//! use sibling_build::phases::CanonicalSourceSet;
//! use sibling_build::project::SourceFileRef;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     SourceFileRef {
//!         project: "core".into(),
//!         path: PathBuf::from("/w/core/src/events.js"),
//!         key: "src/events.js".into(),
//!     },
//!     SourceFileRef {
//!         project: "grid".into(),
//!         path: PathBuf::from("/w/grid/src/events.js"),
//!         key: "src/events.js".into(),
//!     },
//! ];
//!
//! // The first declaration in priority order is canonical.
//! let set = CanonicalSourceSet::from_sources(&files);
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.get("src/events.js").unwrap().project, "core");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: `sibling-build.yaml` plus an optional local
//!   override, merged once into an immutable `Config`.
//! - **Projects (`project`)**: each sibling's ordered source manifest and
//!   package version.
//! - **Canonical keys (`path`)**: the `src/...` fragment that identifies a
//!   shared file regardless of which project's tree holds it.
//! - **Phases (`phases`)**: shared source sync, bounded-parallel sub-builds,
//!   the combined bundle, fan-out, cleanup and release staging.
//! - **External tools (`tools`)**: the sub-build command and the minifier,
//!   behind traits.
//! - **Versions (`version`)**: typed build stamps and the temporary version
//!   bump used by `next`.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod output;
pub mod path;
pub mod phases;
pub mod project;
pub mod tools;
pub mod transform;
pub mod version;

#[cfg(test)]
mod path_proptest;
