//! Step 1: Shared Source Sync
//!
//! Sibling projects embed verbatim copies of some source files (an event
//! dispatch helper, for example). Every copy shares a canonical key, and the
//! copy declared by the highest-priority project is authoritative.
//!
//! ## Process
//!
//! 1.  **Collect**: concatenate every project's declared sources in priority
//!     order. A missing manifest aborts the sync.
//! 2.  **Partition**: the first occurrence of each canonical key is
//!     canonical; later occurrences are duplicate candidates.
//! 3.  **Reconcile**: a duplicate that is missing on disk or whose bytes
//!     differ from the canonical file is overwritten with the canonical
//!     content. Nothing ever flows toward a higher-priority project.
//!
//! With [`ConflictPolicy::Refuse`], diverged duplicates are reported as a
//! [`Error::SourceConflict`] and nothing is written.

use std::path::PathBuf;

use log::{debug, info};

use super::CanonicalSourceSet;
use crate::config::{Config, ConflictPolicy};
use crate::error::{Error, Result};
use crate::filesystem;
use crate::project::{collect_sources, SourceFileRef};

/// Outcome of a sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Duplicate files that were (re)written.
    pub copied: Vec<PathBuf>,
    /// The canonical source set the sync was based on.
    pub canonical: CanonicalSourceSet,
}

#[derive(Debug)]
struct Reconcile {
    from: PathBuf,
    to: PathBuf,
    diverged: bool,
}

/// Sync shared sources across all configured projects.
pub fn execute(config: &Config) -> Result<SyncReport> {
    let collection = collect_sources(config)?;
    if let Some((project, path)) = collection.missing {
        return Err(Error::ManifestMissing { project, path });
    }
    synchronize(&collection.files, config.dedup.on_conflict)
}

/// Reconcile `files` (in priority order) against their canonical copies.
pub fn synchronize(files: &[SourceFileRef], policy: ConflictPolicy) -> Result<SyncReport> {
    let mut canonical = CanonicalSourceSet::new();
    let mut pending = Vec::new();

    for file in files {
        let Some(original) = canonical.insert(file.clone()) else {
            continue;
        };
        // The same physical file declared twice is not a duplicate.
        if original.path == file.path {
            continue;
        }
        if filesystem::same_content(&original.path, &file.path)? {
            continue;
        }
        debug!(
            "{} ({}) differs from canonical copy in {}",
            file.key, file.project, original.project
        );
        pending.push(Reconcile {
            from: original.path,
            to: file.path.clone(),
            diverged: file.path.exists(),
        });
    }

    if policy == ConflictPolicy::Refuse {
        let conflicts: Vec<PathBuf> = pending
            .iter()
            .filter(|r| r.diverged)
            .map(|r| r.to.clone())
            .collect();
        if !conflicts.is_empty() {
            return Err(Error::SourceConflict { files: conflicts });
        }
    }

    let mut copied = Vec::with_capacity(pending.len());
    for item in pending {
        filesystem::copy_file(&item.from, &item.to)?;
        debug!("{} -> {}", item.from.display(), item.to.display());
        copied.push(item.to);
    }

    if copied.is_empty() {
        info!("Shared sources in sync: no files copied");
    } else {
        info!("Shared sources synced: {} file(s) copied", copied.len());
    }

    Ok(SyncReport { copied, canonical })
}
