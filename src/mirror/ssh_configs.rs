//! `sshConfigs.xml`: SSH connections, keyed by `id` = host name.

use super::xml::XmlElement;
use super::{DEFAULT_SSH_PORT, SyncContext};
use crate::ssh_config::HostRecord;

const COMPONENT: &str = "SshConfigs";
const ENTRY: &str = "sshConfig";

pub(crate) fn empty_document() -> XmlElement {
    XmlElement::new("project").with_attr("version", "4").with_child(
        XmlElement::new("component")
            .with_attr("name", COMPONENT)
            .with_child(XmlElement::new("configs")),
    )
}

pub(crate) fn display_names(root: &XmlElement, host_name: &str) -> Vec<String> {
    root.descendants(ENTRY)
        .into_iter()
        .filter(|entry| entry.attr("id") != Some(host_name))
        .filter_map(|entry| entry.attr("customName"))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn owned_names(root: &XmlElement, host_name: &str) -> Vec<String> {
    root.descendants(ENTRY)
        .into_iter()
        .filter(|entry| entry.attr("id") == Some(host_name))
        .filter_map(|entry| entry.attr("customName"))
        .map(str::to_string)
        .collect()
}

/// `~/` key paths are written with the IDE's home macro.
pub(crate) fn key_path(identity_file: &str) -> String {
    match identity_file.strip_prefix("~/") {
        Some(rest) => format!("$USER_HOME$/{}", rest),
        None => identity_file.to_string(),
    }
}

fn entry(host: &HostRecord, context: &SyncContext) -> XmlElement {
    let mut entry = XmlElement::new(ENTRY)
        .with_attr("host", host.hostname.as_deref().unwrap_or(&host.name))
        .with_attr("id", &host.name);
    if let Some(identity_file) = &host.identity_file {
        entry.set_attr("keyPath", key_path(identity_file));
    }
    entry
        .with_attr("port", host.port.unwrap_or(DEFAULT_SSH_PORT).to_string())
        .with_attr("customName", &context.display_name)
        .with_attr("nameFormat", "CUSTOM")
        .with_attr("username", host.user.as_deref().unwrap_or_default())
        .with_attr("useOpenSSHConfig", "true")
        .with_child(
            XmlElement::new("option")
                .with_attr("name", "customName")
                .with_attr("value", &context.display_name),
        )
}

/// Replace the host's connection with a fresh one.
pub(crate) fn upsert_entry(root: &mut XmlElement, host: &HostRecord, context: &SyncContext) {
    remove_entry(root, &host.name);
    root.child_with_or_insert("component", "name", COMPONENT, || XmlElement::new("component").with_attr("name", COMPONENT))
        .child_or_insert("configs")
        .children
        .push(entry(host, context));
}

pub(crate) fn remove_entry(root: &mut XmlElement, host_name: &str) -> bool {
    root.remove_descendants(ENTRY, &|entry| entry.attr("id") == Some(host_name)) > 0
}

pub(crate) fn entry_count(root: &XmlElement) -> usize {
    root.descendants(ENTRY).len()
}
