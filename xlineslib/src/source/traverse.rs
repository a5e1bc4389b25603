//! Filesystem traversal and path deduplication.

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::XlinesError;
use crate::Result;

/// Directory names holding version-control metadata.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr", "_darcs", "CVS"];

/// Check if a directory should be pruned during traversal.
fn is_vcs_dir(name: &str) -> bool {
    VCS_DIRS.contains(&name)
}

/// Return each distinct element once, in order of first occurrence.
pub fn dedup<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    dedup_by(items, |item| item.clone())
}

/// Keep the first element for each distinct key, in order of first occurrence.
fn dedup_by<T, K, I, F>(items: I, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// True when any component of `path` is a version-control directory.
fn within_vcs_dir(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_str().map_or(false, is_vcs_dir))
}

/// Collect every regular file under `origin`.
///
/// A file origin yields just itself. A directory origin is walked
/// recursively, pruning version-control directories; an origin inside
/// version-control metadata yields nothing. Symlinked directories are not
/// descended into. Symlinked files are kept unless their target was already
/// found, so no file is reached twice. Paths are absolute, in discovery
/// order, and unique. Entries that cannot be read are logged and skipped;
/// only a missing origin is an error.
pub fn traverse(origin: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let origin = origin.as_ref();

    if !origin.exists() {
        return Err(XlinesError::PathNotFound(origin.to_path_buf()));
    }
    let root = fs::canonicalize(origin)?;

    if root.is_file() {
        return Ok(vec![root]);
    }

    if within_vcs_dir(&root) {
        tracing::debug!(root = %root.display(), "origin is version-control metadata");
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(&root).follow_links(false).into_iter();
    // (canonical target, discovered path)
    let mut found: Vec<(PathBuf, PathBuf)> = Vec::new();

    for entry in walker.filter_entry(|e| {
        // Always include the root directory
        if e.depth() == 0 {
            return true;
        }
        if e.file_type().is_dir() {
            let name = e.file_name().to_str().unwrap_or("");
            return !is_vcs_dir(name);
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(
                    "read error while examining '{}': {e}",
                    e.path().unwrap_or(root.as_path()).display()
                );
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_file() {
            let path = entry.into_path();
            found.push((path.clone(), path));
        } else if file_type.is_symlink() {
            match linked_file(entry.path()) {
                Ok(Some(target)) => found.push((target, entry.into_path())),
                Ok(None) => tracing::debug!(
                    "not descending into linked directory '{}'",
                    entry.path().display()
                ),
                Err(e) => tracing::warn!(
                    "read error while examining '{}': {e}",
                    entry.path().display()
                ),
            }
        }
    }

    let files: Vec<PathBuf> = dedup_by(found, |(target, _)| target.clone())
        .into_iter()
        .map(|(_, path)| path)
        .collect();

    tracing::debug!(root = %root.display(), found = files.len(), "traversal complete");
    Ok(files)
}

/// Canonical target of a symlink when it resolves to a regular file.
fn linked_file(link: &Path) -> std::io::Result<Option<PathBuf>> {
    if link.metadata()?.is_file() {
        fs::canonicalize(link).map(Some)
    } else {
        Ok(None)
    }
}
