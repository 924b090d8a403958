use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum MirrorError {
    /// Read, write, delete or listing failure
    Io { path: PathBuf, source: io::Error },
    /// Document that is not well-formed XML
    Parse { path: PathBuf, message: String },
}

impl MirrorError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        MirrorError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            MirrorError::Io { path, .. } | MirrorError::Parse { path, .. } => path,
        }
    }
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            MirrorError::Parse { path, message } => write!(f, "Malformed document {}: {}", path.display(), message),
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MirrorError::Io { source, .. } => Some(source),
            MirrorError::Parse { .. } => None,
        }
    }
}
