// src/watch/watch_set.rs

//! Selection of the directories to register with the OS watcher.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{HotrunError, Result};
use crate::fs::FileSystem;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::IgnoreRules;

/// The concrete watch registration computed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPlan {
    pub dirs: Vec<PathBuf>,
    /// `true` only for the "no rules, watch the whole root" plan.
    pub recursive: bool,
}

impl WatchPlan {
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }
}

/// Compute which directories to watch under `root`.
///
/// Without ignore rules the root is watched recursively. With rules, the
/// tree is walked once: hidden directories and directories matched by any
/// rule are pruned together with their subtrees, and every other directory
/// is watched non-recursively, since a recursive OS watch cannot exclude
/// subtrees.
pub fn compute_watch_dirs(
    fs: &dyn FileSystem,
    root: &Path,
    rules: &IgnoreRules,
) -> Result<WatchPlan> {
    if rules.is_empty() {
        return Ok(WatchPlan {
            dirs: vec![root.to_path_buf()],
            recursive: true,
        });
    }

    let mut dirs = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if dir != root && is_pruned(root, &dir, rules) {
            continue;
        }

        let children = fs
            .subdirs(&dir)
            .map_err(|e| HotrunError::WatchError(format!("walking {:?}: {e:#}", dir)))?;

        dirs.push(dir);
        // Reversed so the stack pops in lexical order.
        stack.extend(children.into_iter().rev());
    }

    debug!(count = dirs.len(), "computed watch directories");
    Ok(WatchPlan {
        dirs,
        recursive: false,
    })
}

fn is_pruned(root: &Path, dir: &Path, rules: &IgnoreRules) -> bool {
    let hidden = dir
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false);
    if hidden {
        debug!(?dir, "skipping hidden directory");
        return true;
    }

    let Some(rel) = relative_str(root, dir) else {
        return false;
    };
    match rules.first_match(&rel) {
        Some(rule) => {
            debug!(dir = %rel, rule = rule.as_str(), "skipping ignored directory");
            true
        }
        None => false,
    }
}
