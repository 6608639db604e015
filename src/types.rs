use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

/// Kind of filesystem change that reached the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Modify,
    Remove,
    Rename,
}

impl ChangeKind {
    /// Map a raw `notify` event kind. Access and unclassified events carry no
    /// content change and map to `None`.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeKind::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
            EventKind::Modify(_) => Some(ChangeKind::Modify),
            EventKind::Remove(_) => Some(ChangeKind::Remove),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }
}

/// A single file change, as produced by the OS watch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Expand a `notify` event into one `ChangeEvent` per affected path.
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        match ChangeKind::from_notify(&event.kind) {
            Some(kind) => event
                .paths
                .iter()
                .map(|p| ChangeEvent::new(p.clone(), kind))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl std::fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.path.display())
    }
}

/// What to build and how to run it.
///
/// `build_options` and `run_args` are passed through untouched; the
/// supervisor never interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub source_file: PathBuf,
    pub build_options: String,
    pub run_args: String,
    pub swagger: bool,
}

impl BuildTarget {
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            source_file: source_file.into(),
            build_options: String::new(),
            run_args: String::new(),
            swagger: false,
        }
    }

    /// Name of the produced binary: the entry file name without extension.
    pub fn binary_name(&self) -> String {
        stem_of(&self.source_file)
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string())
}
