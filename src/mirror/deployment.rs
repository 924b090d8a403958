//! `deployment.xml`: path mappings, keyed by the display names the host owns
//! in the same project.

use super::xml::XmlElement;
use super::{MirrorSettings, SyncContext};

const COMPONENT: &str = "PublishConfigData";
const ENTRY: &str = "paths";

pub(crate) fn empty_document() -> XmlElement {
    XmlElement::new("project").with_attr("version", "4").with_child(
        component()
            .with_child(
                XmlElement::new("option")
                    .with_attr("name", "confirmBeforeUploading")
                    .with_attr("value", "false"),
            )
            .with_child(XmlElement::new("serverData")),
    )
}

fn component() -> XmlElement {
    XmlElement::new("component")
        .with_attr("name", COMPONENT)
        .with_attr("remoteFilesAllowedToDisappearOnAutoupload", "false")
        .with_attr("confirmBeforeUploading", "false")
        .with_attr("serverName", "")
}

fn is_owned(entry: &XmlElement, owned: &[String]) -> bool {
    entry.attr("name").is_some_and(|name| owned.iter().any(|owned| owned == name))
}

pub(crate) fn display_names(root: &XmlElement, owned: &[String]) -> Vec<String> {
    root.descendants(ENTRY)
        .into_iter()
        .filter(|entry| !is_owned(entry, owned))
        .filter_map(|entry| entry.attr("name"))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn entry(context: &SyncContext, settings: &MirrorSettings) -> XmlElement {
    let mapping = XmlElement::new("mapping")
        .with_attr("deploy", "/")
        .with_attr("local", "$PROJECT_DIR$")
        .with_attr("web", &settings.remote_root);

    XmlElement::new(ENTRY)
        .with_attr("name", &context.display_name)
        .with_child(XmlElement::new("serverdata").with_child(XmlElement::new("mappings").with_child(mapping)))
}

/// Replace the host's mappings and point the component at the new server.
pub(crate) fn upsert_entry(root: &mut XmlElement, owned: &[String], context: &SyncContext, settings: &MirrorSettings) {
    let mut replaced = owned.to_vec();
    replaced.push(context.display_name.clone());
    root.remove_descendants(ENTRY, &|entry| is_owned(entry, &replaced));

    let component = root.child_with_or_insert("component", "name", COMPONENT, component);
    component.set_attr("serverName", &context.display_name);
    component
        .child_or_insert("serverData")
        .children
        .push(entry(context, settings));
}

pub(crate) fn remove_entry(root: &mut XmlElement, owned: &[String]) -> bool {
    let removed = root.remove_descendants(ENTRY, &|entry| is_owned(entry, owned)) > 0;

    let mut reset = false;
    if let Some(component) = root
        .children
        .iter_mut()
        .find(|child| child.name == "component" && child.attr("name") == Some(COMPONENT))
        && component.attr("serverName").is_some_and(|name| owned.iter().any(|owned| owned == name))
    {
        component.set_attr("serverName", "");
        reset = true;
    }

    removed || reset
}

pub(crate) fn entry_count(root: &XmlElement) -> usize {
    root.descendants(ENTRY).len()
}
