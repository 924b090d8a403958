use super::{KeyedLocks, MirrorKind, MirrorSettings, resolve_unique_name};
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn deployment_implies_web_servers() {
    assert_eq!(
        MirrorKind::expand(&[MirrorKind::Deployment, MirrorKind::Deployment]),
        vec![MirrorKind::WebServers, MirrorKind::Deployment]
    );
    assert_eq!(MirrorKind::expand(&[MirrorKind::SshConfigs]), vec![MirrorKind::SshConfigs]);
}

#[test]
fn kinds_parse_from_cli_labels() {
    assert_eq!("ssh".parse::<MirrorKind>(), Ok(MirrorKind::SshConfigs));
    assert_eq!("Web-Servers".parse::<MirrorKind>(), Ok(MirrorKind::WebServers));
    assert_eq!("deployment".parse::<MirrorKind>(), Ok(MirrorKind::Deployment));
    assert!("ftp".parse::<MirrorKind>().is_err());
    assert_eq!(MirrorKind::WebServers.file_name(), "webServers.xml");
}

#[test]
fn unique_names_count_up_from_two() {
    let taken: HashSet<String> = ["svc", "svc_2", "svc_4"].iter().map(|name| name.to_string()).collect();
    assert_eq!(resolve_unique_name("api", &taken), "api");
    assert_eq!(resolve_unique_name("svc", &taken), "svc_3");
}

#[test]
fn keyed_locks_share_one_mutex_per_key() {
    let locks = KeyedLocks::new();
    assert!(Arc::ptr_eq(&locks.handle("alpha"), &locks.handle("alpha")));
    assert!(!Arc::ptr_eq(&locks.handle("alpha"), &locks.handle("beta")));
}

#[test]
fn default_settings_point_at_the_usual_layout() {
    let settings = MirrorSettings::default();
    assert_eq!(settings.idea_dir, ".idea");
    assert_eq!(settings.remote_root, "/home/dev/backend");
    assert!(settings.projects_root_path().ends_with("Projects"));
}
