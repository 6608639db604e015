// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
/// - Relative input paths are taken as already relative to `root`.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    if path.is_relative() {
        return Some(to_slash(path));
    }

    // Removed files can no longer be canonicalized; fall back to the parent.
    if let (Ok(root_canon), Some(parent), Some(name)) =
        (root.canonicalize(), path.parent(), path.file_name())
    {
        if let Ok(parent_canon) = parent.canonicalize() {
            if let Ok(rel) = parent_canon.join(name).strip_prefix(&root_canon) {
                return Some(to_slash(rel));
            }
        }
    }

    None
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
