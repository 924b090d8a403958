//! Input checks run before anything touches the tree.

use super::model::HostRecord;
use super::path::expand_tilde_with;
use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

// Host names double as file names under the include directory
static HOST_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s*?!/\\#]+$").unwrap());
static PRIVATE_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)-----BEGIN [A-Z0-9 ]*PRIVATE KEY-----.*-----END [A-Z0-9 ]*PRIVATE KEY-----").unwrap());

/// Reject names OpenSSH would read as a pattern or that cannot double as a file name.
pub fn validate_host_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("host name"));
    }
    if name == "." || name == ".." {
        return Err(ValidationError::InvalidHostName(name.to_string()));
    }
    if !HOST_NAME_REGEX.is_match(name) {
        return Err(ValidationError::InvalidHostName(name.to_string()));
    }
    Ok(())
}

pub fn validate_port(port: &str) -> Result<u16, ValidationError> {
    match port.trim().parse::<u16>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValidationError::InvalidPort(port.to_string())),
    }
}

pub fn validate_project_name(project: &str) -> Result<(), ValidationError> {
    if project.trim().is_empty() {
        return Err(ValidationError::EmptyField("project"));
    }
    if project.contains(['/', '\\']) || project == "." || project == ".." {
        return Err(ValidationError::InvalidProjectName(project.to_string()));
    }
    Ok(())
}

/// The identity file must be a readable regular file shaped like a private key.
pub fn validate_identity_file(path: &str, home: &Path) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidIdentityFile {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.trim().is_empty() {
        return Err(ValidationError::EmptyField("identity file"));
    }

    let expanded = expand_tilde_with(path, home);
    let metadata = fs::metadata(&expanded).map_err(|err| invalid(&err.to_string()))?;
    if !metadata.is_file() {
        return Err(invalid("not a regular file"));
    }

    let content = fs::read_to_string(&expanded).map_err(|err| invalid(&err.to_string()))?;
    if !PRIVATE_KEY_REGEX.is_match(&content) {
        return Err(invalid("not a private key"));
    }
    Ok(())
}

/// Fail when `name` is used by a host other than `allow`.
pub fn ensure_name_available(hosts: &[HostRecord], name: &str, allow: Option<&str>) -> Result<(), ValidationError> {
    if allow == Some(name) {
        return Ok(());
    }
    if hosts.iter().any(|host| host.name == name) {
        return Err(ValidationError::DuplicateHost(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../test/ssh_config/validate.rs"]
mod tests;
