//! Jump host shared by every project-scoped host.

use super::model::{HostRecord, HostScope};
use super::parser::read_hosts;
use super::writer::upsert;
use super::{ConfigTree, SshConfigError};
use crate::log_info;
use serde::{Deserialize, Serialize};

/// Name and connection constants of the gateway block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySpec {
    pub name: String,
    pub hostname: String,
    pub user: String,
    /// Used when neither an override nor an existing block provides one
    pub identity_file: String,
}

impl Default for GatewaySpec {
    fn default() -> Self {
        Self {
            name: "jumphost".to_string(),
            hostname: "gateway.internal".to_string(),
            user: "gateway".to_string(),
            identity_file: "~/.ssh/id_rsa".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOutcome {
    pub created: bool,
    pub identity_file: String,
}

/// The record written for the gateway.
pub fn gateway_record(spec: &GatewaySpec, identity_file: &str) -> HostRecord {
    HostRecord::new(&spec.name)
        .with_hostname(&spec.hostname)
        .with_user(&spec.user)
        .with_identity_file(identity_file)
}

/// Create the gateway block unless a block with its exact name exists.
///
/// The identity file is the override when given, else the one of a block whose
/// name matches the gateway name ignoring case, else the configured default.
pub fn ensure_gateway(
    tree: &ConfigTree,
    spec: &GatewaySpec,
    identity_override: Option<&str>,
) -> Result<GatewayOutcome, SshConfigError> {
    let hosts = read_hosts(tree)?;

    if let Some(existing) = hosts.iter().find(|host| host.name == spec.name) {
        return Ok(GatewayOutcome {
            created: false,
            identity_file: existing.identity_file.clone().unwrap_or_else(|| spec.identity_file.clone()),
        });
    }

    let identity_file = identity_override
        .map(str::to_string)
        .or_else(|| {
            hosts
                .iter()
                .filter(|host| host.name.eq_ignore_ascii_case(&spec.name))
                .find_map(|host| host.identity_file.clone())
        })
        .unwrap_or_else(|| spec.identity_file.clone());

    upsert(tree, &gateway_record(spec, &identity_file), &HostScope::TreeWide)?;
    log_info!("Created gateway host '{}' with identity {}", spec.name, identity_file);

    Ok(GatewayOutcome {
        created: true,
        identity_file,
    })
}

#[cfg(test)]
#[path = "../test/ssh_config/gateway.rs"]
mod tests;
