//! Source tree traversal
//!
//! Produces a lazy depth-first sequence of file paths in which all files
//! directly in a directory come before anything inside its subdirectories.
//! Sibling entries are enumerated in name order, files first, so the walk
//! order is stable across runs. Unreadable subtrees surface as error items
//! rather than aborting the traversal.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Sort siblings files-first, then by name
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_file()
        .cmp(&a.file_type().is_file())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Lazily enumerate all files under `root`
///
/// Each item is either a file path or the traversal error for a directory
/// that could not be listed; the iterator continues past errors with the
/// remaining siblings.
pub fn walk_files(root: &Path) -> impl Iterator<Item = walkdir::Result<PathBuf>> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by(files_first)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() => Some(Ok(e.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
}
