//! On-disk file helpers shared by the phases
//!
//! Writes here are not transactional: an interrupted copy can leave a
//! partially written destination behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Returns true when both files exist and hold identical bytes.
///
/// A missing `candidate` compares unequal; a missing `reference` is an error.
pub fn same_content(reference: &Path, candidate: &Path) -> Result<bool> {
    let expected = read(reference)?;
    match fs::read(candidate) {
        Ok(actual) => Ok(actual == expected),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Filesystem {
            message: format!("Failed to read '{}': {}", candidate.display(), e),
        }),
    }
}

/// Read a whole file, mapping failures to a filesystem error naming the path.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read '{}': {}", path.display(), e),
    })
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })
}

/// Copy `src` to `dest`, creating parent directories as needed.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    ensure_parent(dest)?;
    fs::copy(src, dest).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to copy '{}' to '{}': {}",
            src.display(),
            dest.display(),
            e
        ),
    })?;
    Ok(())
}

/// Copy `src` into directory `dir`, keeping only its base name.
pub fn copy_into(src: &Path, dir: &Path) -> Result<PathBuf> {
    let name = src.file_name().ok_or_else(|| Error::Filesystem {
        message: format!("'{}' has no file name", src.display()),
    })?;
    let dest = dir.join(name);
    copy_file(src, &dest)?;
    Ok(dest)
}

/// Recursively remove a directory.
pub fn remove_dir(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to remove directory '{}': {}", path.display(), e),
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }
    Ok(())
}
