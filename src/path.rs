//! Path utilities: canonical source keys and glob expansion

use std::path::{Component, Path, PathBuf};

use glob::Pattern;

use crate::error::Result;

/// Directory name marking the start of the shared source tree.
pub const SOURCE_ROOT: &str = "src";

/// Compute the canonical key of a source file.
///
/// The key is the path fragment from the first `src` component (taken
/// relative to `project_root`) onward, joined with `/`. Two files in
/// different projects with the same key are the same logical file. Paths
/// without a `src` component use their whole project-relative path.
pub fn canonical_key(project_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(project_root).unwrap_or(path);

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let start = parts.iter().position(|p| p == SOURCE_ROOT).unwrap_or(0);
    parts[start..].join("/")
}

/// Lexically normalize a path, folding `.` and `..` components.
///
/// Manifests commonly reference sources as `../src/...` from the build
/// directory; the files need not exist for their identity to be computed.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Anchor a glob pattern at `root` unless it is already absolute.
///
/// The root is escaped so directory names containing glob metacharacters
/// do not change the meaning of the pattern.
pub fn rooted_pattern(root: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let escaped = Pattern::escape(&root.to_string_lossy());
    if escaped.is_empty() {
        pattern.to_string()
    } else if escaped.ends_with('/') {
        format!("{}{}", escaped, pattern)
    } else {
        format!("{}/{}", escaped, pattern)
    }
}

/// Expand `pattern` relative to `dir` into the regular files it matches,
/// sorted by path. A missing directory yields no matches.
pub fn expand_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = rooted_pattern(dir, pattern);
    let mut files: Vec<PathBuf> = glob::glob(&full)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Expand a (possibly globbed) absolute pattern into existing directories,
/// sorted by path.
pub fn expand_dirs(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Final component of `path` as a string, or an empty string.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
