//! Mutations of the SSH config tree.
//!
//! Every write computes the complete new file content in memory and replaces
//! the file atomically. Unrelated lines are kept byte for byte.

use super::block::{append_block, remove_blocks, serialize_block};
use super::include::normalize_include;
use super::model::{HostRecord, HostScope, SourceLocation};
use super::parser::{list_project_files, read_hosts};
use super::validate::{ensure_name_available, validate_host_name, validate_project_name};
use super::{ConfigTree, SshConfigError, ValidationError};
use crate::{log_debug, log_info, utils};
use std::path::{Path, PathBuf};

/// Write `record` into the tree, replacing every existing block with its name.
pub fn upsert(tree: &ConfigTree, record: &HostRecord, scope: &HostScope) -> Result<HostRecord, SshConfigError> {
    validate_host_name(&record.name)?;
    if let HostScope::Project(project) = scope {
        validate_project_name(project)?;
    }

    let main_file = tree.main_file();
    let original_main = read_text(main_file)?;
    let mut main_content = remove_blocks(&original_main, &record.name).unwrap_or_else(|| original_main.clone());
    let block = serialize_block(record);

    let (source, keep) = match scope {
        HostScope::TreeWide => {
            main_content = append_block(&main_content, &block);
            let source = SourceLocation::MainFile {
                path: main_file.to_path_buf(),
            };
            (source, None)
        }
        HostScope::Project(project) => {
            if let Some(updated) = normalize_include(&main_content, tree, dirs::home_dir().as_deref()) {
                main_content = updated;
            }

            let path = tree.project_host_file(project, &record.name);
            utils::write_atomic(&path, &block).map_err(|err| SshConfigError::io(&path, err))?;
            let source = SourceLocation::ProjectFile {
                project: project.to_lowercase(),
                path: path.clone(),
            };
            (source, Some(path))
        }
    };

    purge_project_files(tree, &record.name, keep.as_deref())?;

    if main_content != original_main {
        utils::write_atomic(main_file, &main_content).map_err(|err| SshConfigError::io(main_file, err))?;
    }

    log_info!("Wrote host '{}' to {}", record.name, source.path().unwrap_or(main_file).display());
    Ok(record.clone().located_at(source))
}

/// Delete every block named `name`. No file is touched when there is none.
pub fn remove(tree: &ConfigTree, name: &str) -> Result<bool, SshConfigError> {
    let main_file = tree.main_file();
    let mut removed = false;

    let original_main = read_text(main_file)?;
    if let Some(updated) = remove_blocks(&original_main, name) {
        utils::write_atomic(main_file, &updated).map_err(|err| SshConfigError::io(main_file, err))?;
        removed = true;
    }

    removed |= purge_project_files(tree, name, None)?;

    if removed {
        log_info!("Removed host '{}'", name);
    } else {
        log_debug!("Host '{}' not present, nothing removed", name);
    }
    Ok(removed)
}

/// Remove a host using the location it was read from.
pub fn remove_host(tree: &ConfigTree, record: &HostRecord) -> Result<bool, SshConfigError> {
    match &record.source {
        SourceLocation::ProjectFile { path, .. } => {
            let removed = utils::remove_if_exists(path).map_err(|err| SshConfigError::io(path, err))?;
            log_info!("Deleted host file {}", path.display());
            Ok(removed)
        }
        SourceLocation::MainFile { .. } | SourceLocation::Detached => remove(tree, &record.name),
    }
}

/// Remove `old_name` and write `record` in its place.
pub fn rename(tree: &ConfigTree, old_name: &str, record: &HostRecord, scope: &HostScope) -> Result<HostRecord, SshConfigError> {
    validate_host_name(&record.name)?;

    let hosts = read_hosts(tree)?;
    if !hosts.iter().any(|host| host.name == old_name) {
        return Err(ValidationError::UnknownHost(old_name.to_string()).into());
    }
    ensure_name_available(&hosts, &record.name, Some(old_name))?;

    remove(tree, old_name)?;
    upsert(tree, record, scope)
}

/// Copy a host under the first free `<name>_copy` name, in the same scope.
pub fn duplicate(tree: &ConfigTree, name: &str) -> Result<HostRecord, SshConfigError> {
    let hosts = read_hosts(tree)?;
    let original = hosts
        .iter()
        .find(|host| host.name == name)
        .ok_or_else(|| ValidationError::UnknownHost(name.to_string()))?;

    let base = format!("{}_copy", name);
    let mut candidate = base.clone();
    let mut counter = 2;
    while hosts.iter().any(|host| host.name == candidate) {
        candidate = format!("{}_{}", base, counter);
        counter += 1;
    }

    upsert(tree, &original.renamed(candidate), &original.scope())
}

/// Make sure the main file includes the per-project host files exactly once.
pub fn ensure_include(tree: &ConfigTree) -> Result<bool, SshConfigError> {
    let main_file = tree.main_file();
    let content = read_text(main_file)?;
    match normalize_include(&content, tree, dirs::home_dir().as_deref()) {
        Some(updated) => {
            utils::write_atomic(main_file, &updated).map_err(|err| SshConfigError::io(main_file, err))?;
            log_info!("Updated Include directive in {}", main_file.display());
            Ok(true)
        }
        None => Ok(false),
    }
}

fn read_text(path: &Path) -> Result<String, SshConfigError> {
    Ok(utils::read_optional(path)
        .map_err(|err| SshConfigError::io(path, err))?
        .unwrap_or_default())
}

/// Strip blocks named `name` from per-project files other than `keep`. A file
/// left without content is deleted, its directory stays.
fn purge_project_files(tree: &ConfigTree, name: &str, keep: Option<&Path>) -> Result<bool, SshConfigError> {
    let mut removed = false;

    let files: Vec<PathBuf> = list_project_files(tree.include_dir())?
        .into_iter()
        .map(|(_, path)| path)
        .filter(|path| Some(path.as_path()) != keep)
        .collect();

    for path in files {
        let content = read_text(&path)?;
        let Some(updated) = remove_blocks(&content, name) else {
            continue;
        };

        if updated.trim().is_empty() {
            utils::remove_if_exists(&path).map_err(|err| SshConfigError::io(&path, err))?;
            log_debug!("Deleted emptied host file {}", path.display());
        } else {
            utils::write_atomic(&path, &updated).map_err(|err| SshConfigError::io(&path, err))?;
        }
        removed = true;
    }

    Ok(removed)
}

#[cfg(test)]
#[path = "../test/ssh_config/writer.rs"]
mod tests;
