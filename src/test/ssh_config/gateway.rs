use super::{GatewayOutcome, GatewaySpec, ensure_gateway};
use crate::ssh_config::{ConfigTree, read_hosts};
use std::fs;
use tempfile::TempDir;

fn temp_tree() -> (TempDir, ConfigTree) {
    let dir = tempfile::tempdir().expect("temp dir");
    let tree = ConfigTree::new(dir.path().join("config"), dir.path().join("conf.d"));
    (dir, tree)
}

#[test]
fn creates_gateway_once_on_an_empty_tree() {
    let (_dir, tree) = temp_tree();
    let spec = GatewaySpec::default();

    let first = ensure_gateway(&tree, &spec, None).expect("first call");
    assert_eq!(
        first,
        GatewayOutcome {
            created: true,
            identity_file: "~/.ssh/id_rsa".to_string()
        }
    );
    assert_eq!(
        fs::read_to_string(tree.main_file()).expect("read config"),
        "Host jumphost\n    HostName gateway.internal\n    User gateway\n    IdentityFile ~/.ssh/id_rsa\n"
    );

    let second = ensure_gateway(&tree, &spec, Some("~/.ssh/other")).expect("second call");
    assert!(!second.created);
    assert_eq!(second.identity_file, "~/.ssh/id_rsa");
    assert_eq!(read_hosts(&tree).expect("read hosts").len(), 1);
}

#[test]
fn override_wins_over_the_default() {
    let (_dir, tree) = temp_tree();
    let outcome = ensure_gateway(&tree, &GatewaySpec::default(), Some("~/.ssh/id_work")).expect("ensure");
    assert!(outcome.created);
    assert_eq!(outcome.identity_file, "~/.ssh/id_work");
}

#[test]
fn reuses_identity_of_a_differently_spelled_gateway() {
    let (_dir, tree) = temp_tree();
    fs::write(tree.main_file(), "Host JumpHost\n    IdentityFile ~/.ssh/id_legacy\n").expect("seed config");

    let outcome = ensure_gateway(&tree, &GatewaySpec::default(), None).expect("ensure");
    assert!(outcome.created);
    assert_eq!(outcome.identity_file, "~/.ssh/id_legacy");

    let names: Vec<String> = read_hosts(&tree).expect("read hosts").into_iter().map(|host| host.name).collect();
    assert_eq!(names, vec!["JumpHost".to_string(), "jumphost".to_string()]);
}

#[test]
fn uses_configured_constants() {
    let (_dir, tree) = temp_tree();
    let spec = GatewaySpec {
        name: "bastion".to_string(),
        hostname: "10.1.0.1".to_string(),
        user: "ops".to_string(),
        identity_file: "~/.ssh/id_ops".to_string(),
    };

    ensure_gateway(&tree, &spec, None).expect("ensure");
    let hosts = read_hosts(&tree).expect("read hosts");
    assert_eq!(hosts[0].name, "bastion");
    assert_eq!(hosts[0].hostname.as_deref(), Some("10.1.0.1"));
    assert_eq!(hosts[0].user.as_deref(), Some("ops"));
    assert_eq!(hosts[0].identity_file.as_deref(), Some("~/.ssh/id_ops"));
}
