use super::{ConfigLoader, DEFAULT_TEMPLATE, config_file_name, create_default_config, find_config, parse_config};
use crate::config::{Config, ConfigError};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn bundled_template_matches_the_built_in_defaults() {
    let parsed = parse_config(DEFAULT_TEMPLATE).expect("template parses");
    assert_eq!(parsed, Config::default());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let yaml = "settings:\n  debug_mode: true\nprojects:\n  - Funrize\n  - Backoffice\ngateway:\n  name: bastion\n";
    let config = parse_config(yaml).expect("parse");

    assert!(config.settings.debug_mode);
    assert_eq!(config.projects, vec!["Funrize".to_string(), "Backoffice".to_string()]);
    assert_eq!(config.gateway.name, "bastion");
    assert_eq!(config.gateway.user, "gateway");
    assert_eq!(config.ssh.include_dir, "~/.ssh/conf.d");
    assert_eq!(config.mirror.idea_dir, ".idea");
    assert_eq!(config.connection_test.timeout(), Duration::from_secs(10));
}

#[test]
fn empty_file_is_the_default_configuration() {
    assert_eq!(parse_config("\n").expect("parse"), Config::default());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(parse_config("settings:\n  debug: true\n").is_err());
    assert!(parse_config("colors: {}\n").is_err());
}

#[test]
fn profile_selects_the_file_name() {
    assert_eq!(config_file_name(None), "sshm-config.yaml");
    assert_eq!(config_file_name(Some("")), "sshm-config.yaml");
    assert_eq!(config_file_name(Some("work")), "work.sshm-config.yaml");
}

#[test]
fn search_stops_at_the_first_directory_holding_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir_all(&first).expect("create first");
    fs::create_dir_all(&second).expect("create second");
    fs::write(second.join("sshm-config.yaml"), "").expect("write second");

    let dirs: Vec<PathBuf> = vec![first.clone(), second.clone()];
    assert_eq!(find_config(&dirs, "sshm-config.yaml"), Some(second.join("sshm-config.yaml")));

    fs::write(first.join("sshm-config.yaml"), "").expect("write first");
    assert_eq!(find_config(&dirs, "sshm-config.yaml"), Some(first.join("sshm-config.yaml")));
    assert_eq!(find_config(&dirs, "work.sshm-config.yaml"), None);
}

#[test]
fn default_config_is_written_and_loads() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_dir = dir.path().join(".sshm");

    let path = create_default_config(&config_dir).expect("create default");
    assert_eq!(path, config_dir.join("sshm-config.yaml"));

    let config = ConfigLoader::from_path(&path).load_config().expect("load");
    assert_eq!(config.metadata.config_path, path);
    assert_eq!(config.mirror.remote_root, "/home/dev/backend");
}

#[test]
fn parse_errors_carry_the_file_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.sshm-config.yaml");
    fs::write(&path, "settings: [unterminated\n").expect("write");

    match ConfigLoader::from_path(&path).load_config() {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
