// src/watch/filter.rs

//! Decides which change events are allowed to trigger a rebuild.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::types::ChangeEvent;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::IgnoreRules;

#[derive(Debug, Clone)]
pub struct EventFilter {
    root: PathBuf,
    source_extension: String,
    generated_artifact: String,
    rules: IgnoreRules,
}

impl EventFilter {
    pub fn new(
        root: impl Into<PathBuf>,
        source_extension: impl Into<String>,
        generated_artifact: impl Into<String>,
        rules: IgnoreRules,
    ) -> Self {
        Self {
            root: root.into(),
            source_extension: source_extension.into(),
            generated_artifact: generated_artifact.into(),
            rules,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// True if this event should reach the debouncer.
    ///
    /// Rejected: non-source extensions, the generated swagger artifact (it is
    /// written by the build itself), and anything an ignore rule matches.
    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        let path = &event.path;

        let ext_ok = path
            .extension()
            .map(|e| e.to_string_lossy() == self.source_extension.as_str())
            .unwrap_or(false);
        if !ext_ok {
            trace!(?path, "not a source file");
            return false;
        }

        let is_artifact = path
            .file_name()
            .map(|n| n.to_string_lossy() == self.generated_artifact.as_str())
            .unwrap_or(false);
        if is_artifact {
            debug!(?path, "ignoring generated artifact");
            return false;
        }

        if self.rules.is_empty() {
            return true;
        }

        let Some(rel) = relative_str(&self.root, path) else {
            debug!(?path, root = ?self.root, "event outside watch root");
            return false;
        };
        if let Some(rule) = self.rules.first_match(&rel) {
            debug!(path = %rel, rule = rule.as_str(), "ignored by reload-ignore rule");
            return false;
        }

        true
    }
}
