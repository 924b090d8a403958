mod errors;
mod loader;
mod model;

pub use errors::ConfigError;
pub use loader::ConfigLoader;
pub use model::{Config, ConnectionTestSettings, Metadata, Settings, SshSettings};

/// Find and load the configuration for `profile`.
pub fn load(profile: Option<&str>) -> Result<Config, ConfigError> {
    ConfigLoader::new(profile)?.load_config()
}
