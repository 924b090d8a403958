//! Logging-related error types

use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum LogError {
    /// Creating the log directory or writing the log file failed
    Io(io::Error),
    /// No home directory to put the default log file in
    HomeDirUnavailable,
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Io(err) => write!(f, "I/O error: {}", err),
            LogError::HomeDirUnavailable => write!(f, "Could not find home directory for the log file"),
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LogError::Io(err) => Some(err),
            LogError::HomeDirUnavailable => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(err: io::Error) -> Self {
        LogError::Io(err)
    }
}
