//! Configuration file loading
//!
//! Handles:
//! - Searching for config files in multiple locations
//! - Creating default configuration if none exists
//! - Parsing YAML configuration

use super::{Config, ConfigError};
use crate::{log_debug, log_info, log_warn};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const CONFIG_DIR: &str = ".sshm";
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/default.sshm-config.yaml");

pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Locate the configuration for `profile`, creating the default one when no
    /// profile was asked for and nothing exists yet.
    pub fn new(profile: Option<&str>) -> Result<Self, ConfigError> {
        let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirUnavailable)?;
        let search_dirs = Self::search_dirs(&home_dir);
        let file_name = config_file_name(profile);

        if let Some(config_path) = find_config(&search_dirs, &file_name) {
            log_info!("Found config at: {:?}", config_path);
            return Ok(Self { config_path });
        }

        // If a profile was specified but no file found, error out
        if let Some(profile) = profile.filter(|profile| !profile.is_empty()) {
            log_warn!("Configuration profile '{}' not found", profile);
            return Err(ConfigError::ProfileNotFound(profile.to_string()));
        }

        log_warn!("No config file found, creating default configuration");
        let config_path = create_default_config(&home_dir.join(CONFIG_DIR))?;
        Ok(Self { config_path })
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// `~/.sshm`, then `~`, then the working directory.
    fn search_dirs(home_dir: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![home_dir.join(CONFIG_DIR), home_dir.to_path_buf()];
        match env::current_dir() {
            Ok(current_dir) => dirs.push(current_dir),
            Err(err) => log_warn!("Failed to get current directory: {}", err),
        }
        dirs
    }

    /// Load the configuration from the config file
    pub fn load_config(self) -> Result<Config, ConfigError> {
        log_info!("Loading configuration from: {:?}", self.config_path);

        let content = fs::read_to_string(&self.config_path).map_err(|err| {
            log_warn!("Failed to read config file: {}", err);
            ConfigError::IoError(err)
        })?;

        let mut config = parse_config(&content).map_err(|message| {
            log_warn!("Error parsing configuration file: {}", message);
            ConfigError::ParseError {
                path: self.config_path.clone(),
                message,
            }
        })?;
        config.metadata.config_path = self.config_path;
        log_debug!("Parsed configuration successfully");

        Ok(config)
    }
}

/// `sshm-config.yaml`, or `<profile>.sshm-config.yaml` for a named profile.
pub(crate) fn config_file_name(profile: Option<&str>) -> String {
    match profile {
        Some(profile) if !profile.is_empty() => format!("{}.sshm-config.yaml", profile),
        _ => "sshm-config.yaml".to_string(),
    }
}

pub(crate) fn find_config(search_dirs: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    log_debug!("Searching for configuration file...");
    search_dirs.iter().map(|dir| dir.join(file_name)).find(|candidate| {
        log_debug!("Checking: {:?}", candidate);
        candidate.is_file()
    })
}

/// YAML to config; an empty file is the default configuration.
pub(crate) fn parse_config(content: &str) -> Result<Config, String> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yml::from_str::<Config>(content).map_err(|err| err.to_string())
}

/// Write the bundled template into `config_dir`.
pub(crate) fn create_default_config(config_dir: &Path) -> Result<PathBuf, ConfigError> {
    if !config_dir.exists() {
        log_debug!("Creating directory: {:?}", config_dir);
        fs::create_dir_all(config_dir).map_err(|err| ConfigError::DirectoryCreationError(format!("{}: {}", config_dir.display(), err)))?;
    }

    let config_path = config_dir.join(config_file_name(None));
    fs::write(&config_path, DEFAULT_TEMPLATE)?;
    log_info!("Default configuration file created at: {:?}", config_path);

    Ok(config_path)
}

#[cfg(test)]
#[path = "../test/config/loader.rs"]
mod tests;
