use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    DirectoryCreationError(String),
    ParseError { path: PathBuf, message: String },
    ProfileNotFound(String),
    HomeDirUnavailable,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::DirectoryCreationError(msg) => {
                write!(f, "Failed to create directory: {}", msg)
            }
            ConfigError::ParseError { path, message } => {
                write!(f, "Error parsing configuration file {}: {}", path.display(), message)
            }
            ConfigError::ProfileNotFound(profile) => write!(
                f,
                "Configuration profile '{}' not found. Please ensure the file exists in one of the standard locations.",
                profile
            ),
            ConfigError::HomeDirUnavailable => write!(f, "Failed to get home directory"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::IoError(error)
    }
}
