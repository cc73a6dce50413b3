//! Implementation of the steps of a coordinated sibling build.
//!
//! ## Overview
//!
//! A full `build` runs these steps strictly in order:
//! 1. Shared source sync (`dedup`) - make every duplicate of a shared source
//!    file match the highest-priority project's copy
//! 2. Sub-builds (`subbuild`) - run each project's own build, bounded-parallel
//! 3. Combined build (`combine`) - concatenate and minify the deduplicated sources
//! 4. Fan-out (`fanout`) - copy each project's minified build into its siblings
//! 5. Cleanup (`cleanup`) - remove stale generated example directories
//! 6. Static assets (`fanout::copy_static_assets`)
//! 7. Version reset - restore manifests bumped for a `next` build
//!
//! Release staging (`release`) is a separate step run by `cdn`.
//!
//! Everything after step 2 runs on the calling thread: the combined build
//! must read the synchronized tree, and staging must see every sub-build's
//! output.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::project::SourceFileRef;

pub mod cleanup;
pub mod combine;
pub mod dedup;
pub mod fanout;
pub mod orchestrator;
pub mod release;
pub mod subbuild;

/// Canonical key -> first declaring source, in first-occurrence order.
///
/// Priority follows insertion order, so feeding sources in project priority
/// order makes the highest-priority project's copy canonical.
#[derive(Debug, Clone, Default)]
pub struct CanonicalSourceSet {
    entries: Vec<SourceFileRef>,
    index: HashMap<String, usize>,
}

impl CanonicalSourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from sources already in priority order.
    pub fn from_sources(files: &[SourceFileRef]) -> Self {
        let mut set = Self::new();
        for file in files {
            set.insert(file.clone());
        }
        set
    }

    /// Insert `file` if its key is new. When the key is already present the
    /// canonical entry is returned and `file` is discarded.
    pub fn insert(&mut self, file: SourceFileRef) -> Option<SourceFileRef> {
        if let Some(&i) = self.index.get(&file.key) {
            return Some(self.entries[i].clone());
        }
        self.index.insert(file.key.clone(), self.entries.len());
        self.entries.push(file);
        None
    }

    pub fn get(&self, key: &str) -> Option<&SourceFileRef> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFileRef> {
        self.entries.iter()
    }

    /// Paths of the canonical files, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|f| f.path.clone()).collect()
    }
}
