//! SSH config domain models.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a host block currently lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceLocation {
    /// Built in memory, not written yet.
    Detached,
    /// A block inside the main config file.
    MainFile { path: PathBuf },
    /// A per-host file under `<include_dir>/<project>/`.
    ProjectFile { project: String, path: PathBuf },
}

impl SourceLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceLocation::Detached => None,
            SourceLocation::MainFile { path } | SourceLocation::ProjectFile { path, .. } => Some(path),
        }
    }

    pub fn project(&self) -> Option<&str> {
        match self {
            SourceLocation::ProjectFile { project, .. } => Some(project),
            _ => None,
        }
    }
}

/// Where a host block should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostScope {
    /// Appended to the main config file.
    TreeWide,
    /// Written to its own file in the project's include subdirectory.
    Project(String),
}

/// One `Host` block of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    /// The block label (remainder of the `Host` line).
    pub name: String,
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub identity_file: Option<String>,
    pub proxy_command: Option<String>,
    /// Jump host name, written as `ProxyJump`.
    pub proxy_via: Option<String>,
    /// Unrecognized directives in file order, keys lowercased.
    pub extra_directives: Vec<(String, String)>,
    pub source: SourceLocation,
}

impl HostRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: None,
            user: None,
            port: None,
            identity_file: None,
            proxy_command: None,
            proxy_via: None,
            extra_directives: Vec::new(),
            source: SourceLocation::Detached,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_identity_file(mut self, identity_file: impl Into<String>) -> Self {
        self.identity_file = Some(identity_file.into());
        self
    }

    pub fn with_proxy_command(mut self, proxy_command: impl Into<String>) -> Self {
        self.proxy_command = Some(proxy_command.into());
        self
    }

    pub fn with_proxy_via(mut self, proxy_via: impl Into<String>) -> Self {
        self.proxy_via = Some(proxy_via.into());
        self
    }

    /// Set any directive by its config keyword. Keywords with a typed field land in it.
    pub fn with_directive(mut self, key: &str, value: impl Into<String>) -> Self {
        self.apply_directive(key, value.into());
        self
    }

    /// Same record under another name, detached from any file.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: SourceLocation::Detached,
            ..self.clone()
        }
    }

    pub(super) fn located_at(mut self, source: SourceLocation) -> Self {
        self.source = source;
        self
    }

    pub(super) fn apply_directive(&mut self, key: &str, value: String) {
        let key = key.to_lowercase();
        match key.as_str() {
            "hostname" => self.hostname = Some(value),
            "user" => self.user = Some(value),
            "port" => self.port = value.parse::<u16>().ok(),
            "identityfile" => self.identity_file = Some(value),
            "proxycommand" => self.proxy_command = Some(value),
            "proxyjump" => self.proxy_via = Some(value),
            _ => self.set_directive(&key, value),
        }
    }

    /// Store an extra directive; a repeated key keeps its position and takes the new value.
    fn set_directive(&mut self, key: &str, value: String) {
        let key = key.to_lowercase();
        match self.extra_directives.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.extra_directives.push((key, value)),
        }
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.extra_directives
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Scope matching the record's current location.
    pub fn scope(&self) -> HostScope {
        match &self.source {
            SourceLocation::ProjectFile { project, .. } => HostScope::Project(project.clone()),
            _ => HostScope::TreeWide,
        }
    }

    /// Get a formatted display string for host details.
    pub fn details(&self) -> String {
        let mut details = Vec::new();

        details.push(format!("Host: {}", self.name));

        if let Some(hostname) = &self.hostname {
            details.push(format!("  Hostname: {}", hostname));
        }
        if let Some(user) = &self.user {
            details.push(format!("  User: {}", user));
        }
        if let Some(port) = &self.port {
            details.push(format!("  Port: {}", port));
        }
        if let Some(identity) = &self.identity_file {
            details.push(format!("  IdentityFile: {}", identity));
        }
        if let Some(command) = &self.proxy_command {
            details.push(format!("  ProxyCommand: {}", command));
        }
        if let Some(proxy) = &self.proxy_via {
            details.push(format!("  ProxyJump: {}", proxy));
        }
        for (key, value) in &self.extra_directives {
            details.push(format!("  {}: {}", key, value));
        }
        if let Some(path) = self.source.path() {
            details.push(format!("  Source: {}", path.display()));
        }

        details.join("\n")
    }
}
