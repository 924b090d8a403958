//! Path helpers for SSH config discovery and expansion.

use std::path::{Path, PathBuf};

/// Expand `~/` to the current user's home directory.
pub fn expand_tilde(path: &str) -> String {
    match dirs::home_dir() {
        Some(home) => expand_tilde_with(path, &home),
        None => path.to_string(),
    }
}

pub(crate) fn expand_tilde_with(path: &str, home: &Path) -> String {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest).to_string_lossy().to_string(),
        None => path.to_string(),
    }
}

/// Get the default SSH config path.
pub fn get_default_ssh_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("config"))
}

/// Get the default directory holding per-project host files.
pub fn get_default_include_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("conf.d"))
}
