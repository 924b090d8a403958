//! Projection of SSH hosts into per-project IDE metadata documents.
//!
//! Each project under the projects root gets up to three documents in its IDE
//! directory: `sshConfigs.xml`, `webServers.xml` and `deployment.xml`. Entries
//! are keyed by host name. Display names are unique across every project.

mod deployment;
mod document;
mod engine;
mod errors;
mod locks;
mod naming;
mod projects;
mod ssh_configs;
mod web_servers;
mod xml;

pub use engine::{MirrorSync, SyncContext, SyncRequest};
pub use errors::MirrorError;
pub use locks::KeyedLocks;
pub use naming::resolve_unique_name;
pub use projects::{MirrorTarget, discover_targets};
pub use xml::{XmlElement, parse_document, to_document_string};

use crate::ssh_config::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub(crate) const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MirrorKind {
    SshConfigs,
    WebServers,
    Deployment,
}

impl MirrorKind {
    pub const ALL: [MirrorKind; 3] = [MirrorKind::SshConfigs, MirrorKind::WebServers, MirrorKind::Deployment];

    pub fn file_name(&self) -> &'static str {
        match self {
            MirrorKind::SshConfigs => "sshConfigs.xml",
            MirrorKind::WebServers => "webServers.xml",
            MirrorKind::Deployment => "deployment.xml",
        }
    }

    /// Sorted, deduplicated kinds with `Deployment` pulling in `WebServers`.
    pub fn expand(kinds: &[MirrorKind]) -> Vec<MirrorKind> {
        let mut expanded = kinds.to_vec();
        if expanded.contains(&MirrorKind::Deployment) {
            expanded.push(MirrorKind::WebServers);
        }
        expanded.sort();
        expanded.dedup();
        expanded
    }
}

impl fmt::Display for MirrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MirrorKind::SshConfigs => "ssh-configs",
            MirrorKind::WebServers => "web-servers",
            MirrorKind::Deployment => "deployment",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for MirrorKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "ssh" | "ssh-configs" | "sshconfigs" => Ok(MirrorKind::SshConfigs),
            "web" | "web-servers" | "webservers" => Ok(MirrorKind::WebServers),
            "deployment" | "deploy" => Ok(MirrorKind::Deployment),
            other => Err(format!("unknown mirror kind '{}'", other)),
        }
    }
}

/// Where mirrors live and the remote side of the deployment mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    pub projects_root: String,
    pub idea_dir: String,
    pub remote_root: String,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            projects_root: "~/Projects".to_string(),
            idea_dir: ".idea".to_string(),
            remote_root: "/home/dev/backend".to_string(),
        }
    }
}

impl MirrorSettings {
    pub fn projects_root_path(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.projects_root))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorAction {
    /// Entry added or replaced
    Written,
    /// Entry removed, document kept
    Removed,
    /// Last entry removed, document deleted
    Deleted,
    /// Nothing to do for this document
    Unchanged,
    /// Malformed document deleted (and rebuilt when creating)
    Recovered,
}

#[derive(Debug)]
pub struct MirrorOutcome {
    pub project: String,
    pub kind: MirrorKind,
    pub result: Result<MirrorAction, MirrorError>,
}

/// Per-project, per-kind results of one sync operation.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Display name used by a create, `None` for removals
    pub display_name: Option<String>,
    pub outcomes: Vec<MirrorOutcome>,
}

impl SyncReport {
    pub fn failures(&self) -> impl Iterator<Item = &MirrorOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn count(&self, action: MirrorAction) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(&outcome.result, Ok(done) if *done == action))
            .count()
    }
}

#[cfg(test)]
#[path = "../test/mirror/kinds.rs"]
mod tests;
