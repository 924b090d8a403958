//! SSH config tree reader.

use super::model::{HostRecord, SourceLocation};
use super::{ConfigTree, SshConfigError};
use crate::{log_debug, log_warn, utils};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read every host of the tree: main file first, then the per-project files
/// sorted by project directory and file name. Missing files count as empty.
pub fn read_hosts(tree: &ConfigTree) -> Result<Vec<HostRecord>, SshConfigError> {
    let mut hosts = Vec::new();

    let main_file = tree.main_file();
    if let Some(content) = utils::read_optional(main_file).map_err(|err| SshConfigError::io(main_file, err))? {
        let source = SourceLocation::MainFile {
            path: main_file.to_path_buf(),
        };
        hosts.extend(parse_config_str(&content, &source));
    }

    for (project, path) in list_project_files(tree.include_dir())? {
        if let Some(content) = utils::read_optional(&path).map_err(|err| SshConfigError::io(&path, err))? {
            let source = SourceLocation::ProjectFile { project, path };
            hosts.extend(parse_config_str(&content, &source));
        }
    }

    log_debug!("Read {} host(s) from {}", hosts.len(), main_file.display());
    let duplicates = find_duplicate_names(&hosts);
    if !duplicates.is_empty() {
        log_warn!("Duplicate host names in SSH config tree: {:?}", duplicates);
    }

    Ok(hosts)
}

/// First host with exactly this name.
pub fn find_host(tree: &ConfigTree, name: &str) -> Result<Option<HostRecord>, SshConfigError> {
    Ok(read_hosts(tree)?.into_iter().find(|host| host.name == name))
}

/// Names carried by more than one block, in first-seen order.
pub fn find_duplicate_names(hosts: &[HostRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for host in hosts {
        if !seen.insert(host.name.as_str()) && !duplicates.contains(&host.name) {
            duplicates.push(host.name.clone());
        }
    }
    duplicates
}

/// Parse the host blocks of one file.
pub fn parse_config_str(content: &str, source: &SourceLocation) -> Vec<HostRecord> {
    let mut hosts = Vec::new();
    let mut current: Option<HostRecord> = None;

    for line in content.lines() {
        let trimmed = line.trim();

        // A blank line closes the open block.
        if trimmed.is_empty() {
            if let Some(host) = current.take() {
                hosts.push(host);
            }
            continue;
        }

        if trimmed.starts_with('#') {
            continue;
        }

        let Some((keyword, value)) = split_directive(trimmed) else {
            continue;
        };

        match keyword.as_str() {
            "include" => {}
            "match" => {
                if let Some(host) = current.take() {
                    hosts.push(host);
                }
            }
            "host" => {
                if let Some(host) = current.take() {
                    hosts.push(host);
                }
                current = Some(HostRecord::new(value).located_at(source.clone()));
            }
            _ => {
                if let Some(host) = current.as_mut() {
                    host.apply_directive(&keyword, value.to_string());
                }
            }
        }
    }

    if let Some(host) = current {
        hosts.push(host);
    }

    hosts
}

/// Split a directive into its lowercased keyword and trimmed value.
/// Lines without a value are not directives.
pub(super) fn split_directive(trimmed: &str) -> Option<(String, &str)> {
    let (keyword, value) = trimmed.split_once(char::is_whitespace)?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some((keyword.to_lowercase(), value))
}

/// Host files one level below each project directory, as `(project, path)`.
pub(super) fn list_project_files(include_dir: &Path) -> Result<Vec<(String, PathBuf)>, SshConfigError> {
    let mut files = Vec::new();

    for (project, project_dir) in sorted_entries(include_dir, EntryKind::Directory)? {
        for (_, path) in sorted_entries(&project_dir, EntryKind::File)? {
            files.push((project.clone(), path));
        }
    }

    Ok(files)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
}

fn sorted_entries(dir: &Path, kind: EntryKind) -> Result<Vec<(String, PathBuf)>, SshConfigError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(SshConfigError::io(dir, err)),
    };

    let mut matched = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let wanted = match kind {
            EntryKind::Directory => file_type.is_dir(),
            EntryKind::File => file_type.is_file(),
        };
        if !wanted {
            continue;
        }

        // Hidden entries include the temporaries of an in-flight atomic write.
        if let Ok(file_name) = entry.file_name().into_string()
            && !file_name.starts_with('.')
            && !(kind == EntryKind::File && file_name.ends_with(".tmp"))
        {
            matched.push((file_name, entry.path()));
        }
    }

    matched.sort_by(|left, right| left.0.cmp(&right.0));
    Ok(matched)
}

#[cfg(test)]
#[path = "../test/ssh_config/parser.rs"]
mod tests;
