use crate::mirror::MirrorSettings;
use crate::ssh_config::{ConfigTree, GatewaySpec, SshConfigError};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub settings: Settings,
    pub ssh: SshSettings,
    pub gateway: GatewaySpec,
    pub mirror: MirrorSettings,
    /// Project names offered when adding a project-scoped host
    pub projects: Vec<String>,
    pub connection_test: ConnectionTestSettings,
    #[serde(skip)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub debug_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SshSettings {
    pub config_path: String,
    pub include_dir: String,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            config_path: "~/.ssh/config".to_string(),
            include_dir: "~/.ssh/conf.d".to_string(),
        }
    }
}

impl SshSettings {
    /// Config tree with `~/` expanded. Fails rather than guessing when the home
    /// directory is unknown.
    pub fn tree(&self) -> Result<ConfigTree, SshConfigError> {
        let home = dirs::home_dir();
        let expand = |path: &str| -> Result<PathBuf, SshConfigError> {
            match path.strip_prefix("~/") {
                Some(rest) => home
                    .as_ref()
                    .map(|home| home.join(rest))
                    .ok_or(SshConfigError::HomeDirUnavailable),
                None => Ok(PathBuf::from(path)),
            }
        };
        Ok(ConfigTree::new(expand(&self.config_path)?, expand(&self.include_dir)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionTestSettings {
    pub timeout_secs: u64,
}

impl Default for ConnectionTestSettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl ConnectionTestSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub config_path: PathBuf, // Path to the loaded configuration file
}
