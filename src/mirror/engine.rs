//! Create and remove a host's entries in every target project.

use super::locks::KeyedLocks;
use super::naming::resolve_unique_name;
use super::projects::{MirrorTarget, discover_targets};
use super::xml::XmlElement;
use super::{
    MirrorAction, MirrorError, MirrorKind, MirrorOutcome, MirrorSettings, SyncReport, deployment, document, ssh_configs,
    web_servers,
};
use crate::ssh_config::HostRecord;
use crate::utils::lock_recovering;
use crate::{log_debug, log_info, log_warn};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Mutex;
use uuid::Uuid;

/// What a create writes and where.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Wanted display name, suffixed with `_2`, `_3`, ... when taken
    pub display_base: String,
    pub targets: Vec<MirrorTarget>,
    pub kinds: Vec<MirrorKind>,
}

/// Identifiers shared by every document written in one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    pub display_name: String,
    /// `id` of the webServer entry, referenced by nothing else
    pub server_id: String,
}

/// Mirror writer shared by every sync of the process.
///
/// Syncs of one host name run one at a time; different hosts run in parallel
/// and only serialize on the documents they both touch.
#[derive(Debug, Default)]
pub struct MirrorSync {
    settings: MirrorSettings,
    host_locks: KeyedLocks,
    document_locks: KeyedLocks,
    /// Display names picked by in-flight creates, by host name
    reservations: Mutex<HashMap<String, String>>,
}

/// Drops the host's name reservation when the create ends.
struct Reservation<'a> {
    reservations: &'a Mutex<HashMap<String, String>>,
    host_name: String,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        lock_recovering(self.reservations).remove(&self.host_name);
    }
}

impl MirrorSync {
    pub fn new(settings: MirrorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &MirrorSettings {
        &self.settings
    }

    /// Write the host into every target, replacing entries it already has.
    pub fn sync_create(&self, host: &HostRecord, request: &SyncRequest) -> SyncReport {
        let host_lock = self.host_locks.handle(&host.name);
        let _host_guard = lock_recovering(&host_lock);

        let kinds = MirrorKind::expand(&request.kinds);
        let base = match request.display_base.trim() {
            "" => host.name.as_str(),
            base => base,
        };
        let mut report = SyncReport::default();
        let scanned = match self.scanned_targets(&request.targets) {
            Ok(scanned) => scanned,
            Err(err) => {
                // Without the other projects no name can be guaranteed unique.
                for target in &request.targets {
                    for &kind in &kinds {
                        report.outcomes.push(self.outcome(target, kind, Err(replicate(&err))));
                    }
                }
                return report;
            }
        };

        let (context, unreadable, _reservation) = self.reserve_context(&host.name, base, &scanned, &kinds);
        log_info!(
            "Syncing host '{}' as '{}' into {} project(s)",
            host.name,
            context.display_name,
            request.targets.len()
        );
        report.display_name = Some(context.display_name.clone());

        let mut blocked = HashSet::new();
        for (target, kind, err) in unreadable {
            blocked.insert(target.root.clone());
            report.outcomes.push(self.outcome(&target, kind, Err(err)));
        }

        for target in &request.targets {
            if blocked.contains(&target.root) {
                log_warn!("Skipping project '{}': its documents could not be read", target.name);
                continue;
            }
            let owned = self.owned_names(target, &host.name);
            for &kind in &kinds {
                let result = self.create_in(target, kind, host, &owned, &context);
                report.outcomes.push(self.outcome(target, kind, result));
            }
        }

        report
    }

    /// The requested targets followed by every other project under the projects root.
    fn scanned_targets(&self, targets: &[MirrorTarget]) -> Result<Vec<MirrorTarget>, MirrorError> {
        let mut scanned = targets.to_vec();
        for project in discover_targets(&self.settings.projects_root_path())? {
            if !scanned.iter().any(|target| target.root == project.root) {
                scanned.push(project);
            }
        }
        Ok(scanned)
    }

    /// Drop every entry keyed to `host_name` from the targets.
    pub fn sync_remove(&self, host_name: &str, targets: &[MirrorTarget], kinds: &[MirrorKind]) -> SyncReport {
        let host_lock = self.host_locks.handle(host_name);
        let _host_guard = lock_recovering(&host_lock);

        let kinds = MirrorKind::expand(kinds);
        log_info!("Removing host '{}' from {} project(s)", host_name, targets.len());

        let mut report = SyncReport::default();
        for target in targets {
            let owned = self.owned_names(target, host_name);
            for &kind in &kinds {
                let result = self.remove_from(target, kind, host_name, &owned);
                report.outcomes.push(self.outcome(target, kind, result));
            }
        }

        report
    }

    fn outcome(&self, target: &MirrorTarget, kind: MirrorKind, result: Result<MirrorAction, MirrorError>) -> MirrorOutcome {
        if let Err(err) = &result {
            log_warn!("Mirror {} failed for project '{}': {}", kind, target.name, err);
        }
        MirrorOutcome {
            project: target.name.clone(),
            kind,
            result,
        }
    }

    /// Resolve the display name against every scanned project and reserve it
    /// until the returned guard drops. Documents that exist but cannot be read
    /// are returned with their error.
    fn reserve_context(
        &self,
        host_name: &str,
        base: &str,
        scanned: &[MirrorTarget],
        kinds: &[MirrorKind],
    ) -> (SyncContext, Vec<(MirrorTarget, MirrorKind, MirrorError)>, Reservation<'_>) {
        let mut reservations = lock_recovering(&self.reservations);

        let mut taken: HashSet<String> = reservations
            .iter()
            .filter(|(owner, _)| owner.as_str() != host_name)
            .map(|(_, name)| name.clone())
            .collect();
        let mut unreadable = Vec::new();
        for target in scanned {
            let owned = self.owned_names(target, host_name);
            for &kind in kinds {
                match self.inspect(target, kind) {
                    Ok(Some(root)) => taken.extend(match kind {
                        MirrorKind::SshConfigs => ssh_configs::display_names(&root, host_name),
                        MirrorKind::WebServers => web_servers::display_names(&root, host_name),
                        MirrorKind::Deployment => deployment::display_names(&root, &owned),
                    }),
                    Ok(None) => {}
                    Err(err) => unreadable.push((target.clone(), kind, err)),
                }
            }
        }

        let display_name = resolve_unique_name(base, &taken);
        reservations.insert(host_name.to_string(), display_name.clone());
        log_debug!("Resolved display name '{}' for host '{}' ({} taken)", display_name, host_name, taken.len());

        let context = SyncContext {
            display_name,
            server_id: Uuid::new_v4().to_string(),
        };
        let reservation = Reservation {
            reservations: &self.reservations,
            host_name: host_name.to_string(),
        };
        (context, unreadable, reservation)
    }

    /// A document for name collection. Malformed ones count as absent since a
    /// create replaces them anyway; read failures are errors.
    fn inspect(&self, target: &MirrorTarget, kind: MirrorKind) -> Result<Option<XmlElement>, MirrorError> {
        match document::load(&target.document_path(&self.settings.idea_dir, kind)) {
            Err(MirrorError::Parse { path, message }) => {
                log_debug!("Ignoring names of malformed {}: {}", path.display(), message);
                Ok(None)
            }
            result => result,
        }
    }

    /// Display names the host's connection and server entries carry in the target.
    fn owned_names(&self, target: &MirrorTarget, host_name: &str) -> Vec<String> {
        let mut owned = Vec::new();
        if let Some(root) = self.peek(target, MirrorKind::SshConfigs) {
            owned.extend(ssh_configs::owned_names(&root, host_name));
        }
        if let Some(root) = self.peek(target, MirrorKind::WebServers) {
            owned.extend(web_servers::owned_names(&root, host_name));
        }
        owned.sort();
        owned.dedup();
        owned
    }

    /// Read-only look at a document; unreadable or malformed ones count as absent.
    /// Writes to an unreadable document fail on their own.
    fn peek(&self, target: &MirrorTarget, kind: MirrorKind) -> Option<XmlElement> {
        let path = target.document_path(&self.settings.idea_dir, kind);
        match document::load(&path) {
            Ok(root) => root,
            Err(err) => {
                log_debug!("Skipping {} while collecting names: {}", path.display(), err);
                None
            }
        }
    }

    fn create_in(
        &self,
        target: &MirrorTarget,
        kind: MirrorKind,
        host: &HostRecord,
        owned: &[String],
        context: &SyncContext,
    ) -> Result<MirrorAction, MirrorError> {
        let path = target.document_path(&self.settings.idea_dir, kind);
        let document_lock = self.document_locks.handle(&path.to_string_lossy());
        let _document_guard = lock_recovering(&document_lock);

        let (mut root, recovered) = match document::load(&path) {
            Ok(Some(root)) => (root, false),
            Ok(None) => (empty_document(kind), false),
            Err(MirrorError::Parse { path, message }) => {
                log_warn!("Deleting malformed {}: {}", path.display(), message);
                document::delete(&path)?;
                (empty_document(kind), true)
            }
            Err(err) => return Err(err),
        };

        match kind {
            MirrorKind::SshConfigs => ssh_configs::upsert_entry(&mut root, host, context),
            MirrorKind::WebServers => web_servers::upsert_entry(&mut root, host, context, &self.settings),
            MirrorKind::Deployment => deployment::upsert_entry(&mut root, owned, context, &self.settings),
        }
        document::save(&path, &root)?;

        Ok(if recovered {
            MirrorAction::Recovered
        } else {
            MirrorAction::Written
        })
    }

    fn remove_from(
        &self,
        target: &MirrorTarget,
        kind: MirrorKind,
        host_name: &str,
        owned: &[String],
    ) -> Result<MirrorAction, MirrorError> {
        let path = target.document_path(&self.settings.idea_dir, kind);
        let document_lock = self.document_locks.handle(&path.to_string_lossy());
        let _document_guard = lock_recovering(&document_lock);

        let mut root = match document::load(&path) {
            Ok(Some(root)) => root,
            Ok(None) => return Ok(MirrorAction::Unchanged),
            Err(MirrorError::Parse { path, message }) => {
                log_warn!("Deleting malformed {}: {}", path.display(), message);
                document::delete(&path)?;
                return Ok(MirrorAction::Recovered);
            }
            Err(err) => return Err(err),
        };

        let (removed, remaining) = match kind {
            MirrorKind::SshConfigs => (ssh_configs::remove_entry(&mut root, host_name), ssh_configs::entry_count(&root)),
            MirrorKind::WebServers => (web_servers::remove_entry(&mut root, host_name), web_servers::entry_count(&root)),
            MirrorKind::Deployment => (deployment::remove_entry(&mut root, owned), deployment::entry_count(&root)),
        };

        if !removed {
            return Ok(MirrorAction::Unchanged);
        }
        if remaining == 0 {
            document::delete(&path)?;
            return Ok(MirrorAction::Deleted);
        }
        document::save(&path, &root)?;
        Ok(MirrorAction::Removed)
    }
}

/// Same error for another outcome; `io::Error` is not `Clone`.
fn replicate(err: &MirrorError) -> MirrorError {
    match err {
        MirrorError::Io { path, source } => MirrorError::io(path, io::Error::new(source.kind(), source.to_string())),
        MirrorError::Parse { path, message } => MirrorError::Parse {
            path: path.clone(),
            message: message.clone(),
        },
    }
}

fn empty_document(kind: MirrorKind) -> XmlElement {
    match kind {
        MirrorKind::SshConfigs => ssh_configs::empty_document(),
        MirrorKind::WebServers => web_servers::empty_document(),
        MirrorKind::Deployment => deployment::empty_document(),
    }
}

#[cfg(test)]
#[path = "../test/mirror/engine.rs"]
mod tests;
