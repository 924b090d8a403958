//! `webServers.xml`: SFTP servers, keyed by the `host` of their `fileTransfer`.

use super::xml::XmlElement;
use super::{DEFAULT_SSH_PORT, MirrorSettings, SyncContext};
use crate::ssh_config::HostRecord;

const COMPONENT: &str = "WebServers";
const ENTRY: &str = "webServer";

pub(crate) fn empty_document() -> XmlElement {
    XmlElement::new("project").with_attr("version", "4").with_child(
        XmlElement::new("component")
            .with_attr("name", COMPONENT)
            .with_child(servers_option()),
    )
}

fn servers_option() -> XmlElement {
    XmlElement::new("option").with_attr("name", "servers")
}

fn is_keyed_to(entry: &XmlElement, host_name: &str) -> bool {
    entry
        .child("fileTransfer")
        .is_some_and(|transfer| transfer.attr("host") == Some(host_name))
}

pub(crate) fn display_names(root: &XmlElement, host_name: &str) -> Vec<String> {
    root.descendants(ENTRY)
        .into_iter()
        .filter(|entry| !is_keyed_to(entry, host_name))
        .filter_map(|entry| entry.attr("name"))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn owned_names(root: &XmlElement, host_name: &str) -> Vec<String> {
    root.descendants(ENTRY)
        .into_iter()
        .filter(|entry| is_keyed_to(entry, host_name))
        .filter_map(|entry| entry.attr("name"))
        .map(str::to_string)
        .collect()
}

fn entry(host: &HostRecord, context: &SyncContext, settings: &MirrorSettings) -> XmlElement {
    let advanced = XmlElement::new("advancedOptions").with_child(
        XmlElement::new("advancedOptions")
            .with_attr("dataProtectionLevel", "Private")
            .with_attr("keepAliveTimeout", "0")
            .with_attr("passiveMode", "true")
            .with_attr("shareSSLContext", "true"),
    );

    let transfer = XmlElement::new("fileTransfer")
        .with_attr("rootFolder", &settings.remote_root)
        .with_attr("accessType", "SFTP")
        .with_attr("host", &host.name)
        .with_attr("port", host.port.unwrap_or(DEFAULT_SSH_PORT).to_string())
        .with_attr("sshConfigId", &host.name)
        .with_attr("sshConfig", &context.display_name)
        .with_attr("keyPair", "true")
        .with_child(advanced);

    XmlElement::new(ENTRY)
        .with_attr("id", &context.server_id)
        .with_attr("name", &context.display_name)
        .with_child(transfer)
}

pub(crate) fn upsert_entry(root: &mut XmlElement, host: &HostRecord, context: &SyncContext, settings: &MirrorSettings) {
    remove_entry(root, &host.name);
    root.child_with_or_insert("component", "name", COMPONENT, || XmlElement::new("component").with_attr("name", COMPONENT))
        .child_with_or_insert("option", "name", "servers", servers_option)
        .children
        .push(entry(host, context, settings));
}

pub(crate) fn remove_entry(root: &mut XmlElement, host_name: &str) -> bool {
    root.remove_descendants(ENTRY, &|entry| is_keyed_to(entry, host_name)) > 0
}

pub(crate) fn entry_count(root: &XmlElement) -> usize {
    root.descendants(ENTRY).len()
}
