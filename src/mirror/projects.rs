//! Discovery of the project directories mirrors are written into.

use super::{MirrorError, MirrorKind};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One project directory under the projects root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorTarget {
    pub name: String,
    pub root: PathBuf,
}

impl MirrorTarget {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn document_path(&self, idea_dir: &str, kind: MirrorKind) -> PathBuf {
        self.root.join(idea_dir).join(kind.file_name())
    }
}

/// Immediate, non-hidden subdirectories of `projects_root`, sorted by name.
/// A missing root has no targets.
pub fn discover_targets(projects_root: &Path) -> Result<Vec<MirrorTarget>, MirrorError> {
    let entries = match fs::read_dir(projects_root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(MirrorError::io(projects_root, err)),
    };

    let mut targets: Vec<MirrorTarget> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_dir()))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            (!name.starts_with('.')).then(|| MirrorTarget::new(name, entry.path()))
        })
        .collect();

    targets.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(targets)
}
