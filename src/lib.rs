// Imports SSHM specific modules
pub mod args;
pub mod command_path;
pub mod config;
pub mod log;
pub mod mirror;
pub mod probe;
pub mod ssh_config;
pub(crate) mod utils;
pub mod worker;

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Config(config::ConfigError),
    Log(log::LogError),
    SshConfig(ssh_config::SshConfigError),
    Mirror(mirror::MirrorError),
    Worker(worker::WorkerError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(err) => write!(f, "Configuration error: {}", err),
            Error::Log(err) => write!(f, "Logging error: {}", err),
            Error::SshConfig(err) => write!(f, "SSH config error: {}", err),
            Error::Mirror(err) => write!(f, "Mirror error: {}", err),
            Error::Worker(err) => write!(f, "Background task error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

// Implement From for each error type
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<log::LogError> for Error {
    fn from(err: log::LogError) -> Self {
        Error::Log(err)
    }
}

impl From<ssh_config::SshConfigError> for Error {
    fn from(err: ssh_config::SshConfigError) -> Self {
        Error::SshConfig(err)
    }
}

impl From<ssh_config::ValidationError> for Error {
    fn from(err: ssh_config::ValidationError) -> Self {
        Error::SshConfig(ssh_config::SshConfigError::Validation(err))
    }
}

impl From<mirror::MirrorError> for Error {
    fn from(err: mirror::MirrorError) -> Self {
        Error::Mirror(err)
    }
}

impl From<worker::WorkerError> for Error {
    fn from(err: worker::WorkerError) -> Self {
        Error::Worker(err)
    }
}
