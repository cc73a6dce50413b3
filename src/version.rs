//! # Build Stamps and Temporary Version Bumps
//!
//! Two kinds of versioning live here.
//!
//! **Build stamps** are the dotted numeric tokens embedded in bundle file
//! names, e.g. `suite-2024.01.02.min.js`. [`BuildStamp`] parses them into
//! numeric segments so that release grouping compares values instead of
//! substrings. A trailing separator left over from the file extension
//! (`2024.01.02.`) is dropped during parsing.
//!
//! **Version bumps** are applied by the `next` command: every project's
//! package manifest version `X.Y.Z` becomes `X.Y.(Z+1)-next.<stamp>` for the
//! duration of the build. [`VersionBump`] remembers the original manifest
//! text so the reset phase can restore it byte for byte.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use regex::Regex;
use semver::{Prerelease, Version};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filesystem;
use crate::project::{package_manifest_path, read_version};

/// A dotted numeric timestamp token such as `2024.01.02`.
///
/// Equality and ordering use the numeric segments; `Display` returns the
/// normalized token as it appeared in the file name.
#[derive(Debug, Clone)]
pub struct BuildStamp {
    text: String,
    parts: Vec<u64>,
}

impl BuildStamp {
    /// Parse a raw token, dropping one trailing `.` separator.
    pub fn parse(token: &str) -> Option<Self> {
        let text = token.strip_suffix('.').unwrap_or(token);
        if text.is_empty() {
            return None;
        }
        let parts = text
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    segment.parse::<u64>().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            text: text.to_string(),
            parts,
        })
    }

    /// Extract the stamp following `prefix` at the start of `file_name`.
    pub fn from_file_name(prefix: &str, file_name: &str) -> Option<Self> {
        let rest = file_name.strip_prefix(prefix)?;
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        Self::parse(&rest[..end])
    }

    /// Stamp for a date, formatted `YYYY.MM.DD`.
    pub fn for_date(date: chrono::NaiveDate) -> Self {
        let text = date.format("%Y.%m.%d").to_string();
        // The format above always yields three numeric segments.
        Self::parse(&text).unwrap_or(Self {
            text,
            parts: Vec::new(),
        })
    }

    /// Stamp for the current local date.
    pub fn today() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for BuildStamp {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for BuildStamp {}

impl Hash for BuildStamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl PartialOrd for BuildStamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BuildStamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl fmt::Display for BuildStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compute the bleeding-edge version for `current`: next patch with a
/// `next.<stamp>` pre-release tag.
pub fn next_version(current: &str, stamp: &str) -> Result<String> {
    let mut version = Version::parse(current)?;
    version.patch += 1;
    version.pre = Prerelease::new(&format!("next.{}", stamp))?;
    version.build = semver::BuildMetadata::EMPTY;
    Ok(version.to_string())
}

/// Replace the first `"version": "..."` field in a JSON document's text,
/// leaving all other formatting untouched.
pub fn replace_version_field(content: &str, version: &str) -> Result<String> {
    let re = Regex::new(r#"("version"\s*:\s*")[^"]*(")"#)?;
    if !re.is_match(content) {
        return Err(Error::Filesystem {
            message: "no \"version\" field to rewrite".to_string(),
        });
    }
    Ok(re
        .replace(content, |caps: &regex::Captures| {
            format!("{}{}{}", &caps[1], version, &caps[2])
        })
        .into_owned())
}

#[derive(Debug, Clone)]
struct BumpedManifest {
    path: PathBuf,
    original: String,
}

/// Package manifests rewritten for a bleeding-edge build.
#[derive(Debug, Default)]
pub struct VersionBump {
    entries: Vec<BumpedManifest>,
}

impl VersionBump {
    /// A bump that touched nothing; resetting it is a no-op.
    pub fn none() -> Self {
        Self::default()
    }

    /// Rewrite every project's package version to its `next` version.
    ///
    /// Projects without a package manifest are skipped with a warning. If a
    /// rewrite fails part way, manifests already rewritten are restored
    /// before the error is returned.
    pub fn apply(config: &Config, stamp: &str) -> Result<Self> {
        let mut bump = Self::none();

        for project in &config.projects {
            let path = package_manifest_path(project, &config.manifest);
            let current = match read_version(project, &config.manifest) {
                Ok(v) => v,
                Err(Error::ManifestMissing { .. }) => {
                    log::warn!("{}: no package manifest, version not bumped", project.name);
                    continue;
                }
                Err(e) => {
                    bump.reset()?;
                    return Err(e);
                }
            };

            let result = std::fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|original| {
                    let next = next_version(&current, stamp)?;
                    let rewritten = replace_version_field(&original, &next)?;
                    filesystem::write(&path, rewritten.as_bytes())?;
                    log::info!("{}: version {} -> {}", project.name, current, next);
                    Ok(original)
                });

            match result {
                Ok(original) => bump.entries.push(BumpedManifest { path, original }),
                Err(e) => {
                    bump.reset()?;
                    return Err(e);
                }
            }
        }

        Ok(bump)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore every rewritten manifest. Returns how many were restored.
    pub fn reset(self) -> Result<usize> {
        let count = self.entries.len();
        for entry in self.entries {
            filesystem::write(&entry.path, entry.original.as_bytes())?;
        }
        Ok(count)
    }
}
