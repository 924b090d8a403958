use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum SshConfigError {
    /// Read, write or delete failure on a file of the tree
    Io { path: PathBuf, source: io::Error },
    /// Input rejected before anything was written
    Validation(ValidationError),
    /// The user's home directory could not be resolved
    HomeDirUnavailable,
}

impl SshConfigError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        SshConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SshConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SshConfigError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            SshConfigError::Validation(err) => write!(f, "{}", err),
            SshConfigError::HomeDirUnavailable => write!(f, "Could not find home directory"),
        }
    }
}

impl Error for SshConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SshConfigError::Io { source, .. } => Some(source),
            SshConfigError::Validation(err) => Some(err),
            SshConfigError::HomeDirUnavailable => None,
        }
    }
}

impl From<ValidationError> for SshConfigError {
    fn from(err: ValidationError) -> Self {
        SshConfigError::Validation(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    InvalidHostName(String),
    InvalidPort(String),
    InvalidProjectName(String),
    InvalidIdentityFile { path: String, reason: String },
    DuplicateHost(String),
    UnknownHost(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is required", field),
            ValidationError::InvalidHostName(name) => write!(f, "Invalid host name '{}'", name),
            ValidationError::InvalidPort(port) => write!(f, "Invalid port '{}'", port),
            ValidationError::InvalidProjectName(name) => write!(f, "Invalid project name '{}'", name),
            ValidationError::InvalidIdentityFile { path, reason } => write!(f, "Invalid identity file {}: {}", path, reason),
            ValidationError::DuplicateHost(name) => write!(f, "Host '{}' already exists", name),
            ValidationError::UnknownHost(name) => write!(f, "Host '{}' not found", name),
        }
    }
}

impl Error for ValidationError {}
