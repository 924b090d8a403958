use super::{duplicate, ensure_include, remove, remove_host, rename, upsert};
use crate::ssh_config::{
    ConfigTree, HostRecord, HostScope, SourceLocation, SshConfigError, ValidationError, find_duplicate_names, find_host,
    read_hosts,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn temp_tree() -> (TempDir, ConfigTree) {
    let dir = tempfile::tempdir().expect("temp dir");
    let tree = ConfigTree::new(dir.path().join("config"), dir.path().join("conf.d"));
    (dir, tree)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

fn project(name: &str) -> HostScope {
    HostScope::Project(name.to_string())
}

#[test]
fn upsert_replaces_existing_block() {
    let (_dir, tree) = temp_tree();

    upsert(&tree, &HostRecord::new("alpha").with_hostname("a.example").with_port(2222), &HostScope::TreeWide)
        .expect("first upsert");
    upsert(&tree, &HostRecord::new("alpha").with_hostname("a.example").with_port(22), &HostScope::TreeWide)
        .expect("second upsert");

    let hosts = read_hosts(&tree).expect("read hosts");
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].port, Some(22));
    assert_eq!(read(tree.main_file()), "Host alpha\n    HostName a.example\n    Port 22\n");
}

#[test]
fn upsert_keeps_unrelated_content_byte_for_byte() {
    let (_dir, tree) = temp_tree();
    let existing = "# managed by hand\nServerAliveInterval 30\n\nHost beta\n  hostname   b.example\n  USER root\n";
    fs::write(tree.main_file(), existing).expect("seed config");

    let written = upsert(&tree, &HostRecord::new("alpha").with_hostname("a.example"), &HostScope::TreeWide)
        .expect("upsert");

    assert_eq!(
        read(tree.main_file()),
        format!("{existing}\nHost alpha\n    HostName a.example\n")
    );
    assert_eq!(
        written.source,
        SourceLocation::MainFile {
            path: tree.main_file().to_path_buf()
        }
    );
}

#[test]
fn upsert_and_remove_keep_neighbouring_comments_and_match_sections() {
    let (_dir, tree) = temp_tree();
    let existing = "Host alpha\n    HostName old.example\n\nMatch host *.corp\n    User corp\n\n# production database\nHost db\n    HostName d.example\n";
    fs::write(tree.main_file(), existing).expect("seed config");

    upsert(&tree, &HostRecord::new("alpha").with_hostname("a.example"), &HostScope::TreeWide).expect("upsert");
    assert_eq!(
        read(tree.main_file()),
        "Match host *.corp\n    User corp\n\n# production database\nHost db\n    HostName d.example\n\nHost alpha\n    HostName a.example\n"
    );

    assert!(remove(&tree, "alpha").expect("remove"));
    assert_eq!(
        read(tree.main_file()),
        "Match host *.corp\n    User corp\n\n# production database\nHost db\n    HostName d.example\n"
    );
}

#[test]
fn project_upsert_writes_host_file_and_include() {
    let (_dir, tree) = temp_tree();
    fs::write(tree.main_file(), "Host beta\n    HostName b.example\n").expect("seed config");

    let record = HostRecord::new("alpha").with_hostname("a.example").with_proxy_via("jumphost");
    let written = upsert(&tree, &record, &project("Funrize")).expect("upsert");

    let host_file = tree.project_host_file("funrize", "alpha");
    assert_eq!(read(&host_file), "Host alpha\n    HostName a.example\n    ProxyJump jumphost\n");
    assert_eq!(
        read(tree.main_file()),
        "Include conf.d/*/*\n\nHost beta\n    HostName b.example\n"
    );
    assert_eq!(written.source.project(), Some("funrize"));

    upsert(&tree, &record, &project("Funrize")).expect("second upsert");
    assert_eq!(read(tree.main_file()).matches("Include").count(), 1);
}

#[test]
fn moving_a_host_between_scopes_leaves_one_block() {
    let (_dir, tree) = temp_tree();

    upsert(&tree, &HostRecord::new("alpha").with_user("one"), &HostScope::TreeWide).expect("tree-wide");
    upsert(&tree, &HostRecord::new("alpha").with_user("two"), &project("x")).expect("project x");
    upsert(&tree, &HostRecord::new("alpha").with_user("three"), &project("y")).expect("project y");

    let hosts = read_hosts(&tree).expect("read hosts");
    assert!(find_duplicate_names(&hosts).is_empty());
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].user.as_deref(), Some("three"));
    assert!(!tree.project_host_file("x", "alpha").exists());
    assert!(tree.project_dir("x").is_dir());
    assert_eq!(read(tree.main_file()), "Include conf.d/*/*\n");
}

#[test]
fn upsert_rejects_invalid_input_without_writing() {
    let (_dir, tree) = temp_tree();

    let err = upsert(&tree, &HostRecord::new("web *"), &HostScope::TreeWide).expect_err("invalid name");
    assert!(matches!(err, SshConfigError::Validation(ValidationError::InvalidHostName(_))));
    let err = upsert(&tree, &HostRecord::new("alpha"), &project("../up")).expect_err("invalid project");
    assert!(matches!(err, SshConfigError::Validation(ValidationError::InvalidProjectName(_))));
    assert!(!tree.main_file().exists());
}

#[test]
fn removing_unknown_host_touches_nothing() {
    let (_dir, tree) = temp_tree();
    let content = "Host beta\n    HostName b.example\n";
    fs::write(tree.main_file(), content).expect("seed config");
    let before = fs::metadata(tree.main_file()).and_then(|meta| meta.modified()).expect("mtime");

    assert!(!remove(&tree, "alpha").expect("remove"));

    assert_eq!(read(tree.main_file()), content);
    let after = fs::metadata(tree.main_file()).and_then(|meta| meta.modified()).expect("mtime");
    assert_eq!(before, after);
}

#[test]
fn remove_deletes_emptied_project_file_but_keeps_directory() {
    let (_dir, tree) = temp_tree();
    upsert(&tree, &HostRecord::new("alpha"), &project("funrize")).expect("upsert");

    assert!(remove(&tree, "alpha").expect("remove"));
    assert!(!tree.project_host_file("funrize", "alpha").exists());
    assert!(tree.project_dir("funrize").is_dir());
    assert_eq!(find_host(&tree, "alpha").expect("find"), None);
}

#[test]
fn remove_host_uses_the_source_location() {
    let (_dir, tree) = temp_tree();
    upsert(&tree, &HostRecord::new("main-host"), &HostScope::TreeWide).expect("tree-wide");
    let project_host = upsert(&tree, &HostRecord::new("proj-host"), &project("funrize")).expect("project");

    assert!(remove_host(&tree, &project_host).expect("remove project host"));
    let main_host = find_host(&tree, "main-host").expect("find").expect("main host present");
    assert!(remove_host(&tree, &main_host).expect("remove main host"));

    assert!(read_hosts(&tree).expect("read hosts").is_empty());
    assert_eq!(read(tree.main_file()), "Include conf.d/*/*\n");
}

#[test]
fn rename_moves_the_block_and_rejects_taken_names() {
    let (_dir, tree) = temp_tree();
    upsert(&tree, &HostRecord::new("alpha").with_port(2200), &HostScope::TreeWide).expect("alpha");
    upsert(&tree, &HostRecord::new("beta"), &HostScope::TreeWide).expect("beta");

    let err = rename(&tree, "alpha", &HostRecord::new("beta"), &HostScope::TreeWide).expect_err("taken");
    assert!(matches!(err, SshConfigError::Validation(ValidationError::DuplicateHost(_))));
    let err = rename(&tree, "ghost", &HostRecord::new("gamma"), &HostScope::TreeWide).expect_err("unknown");
    assert!(matches!(err, SshConfigError::Validation(ValidationError::UnknownHost(_))));

    let renamed = rename(&tree, "alpha", &HostRecord::new("gamma").with_port(2200), &HostScope::TreeWide)
        .expect("rename");
    assert_eq!(renamed.name, "gamma");

    let names: Vec<String> = read_hosts(&tree).expect("read hosts").into_iter().map(|host| host.name).collect();
    assert_eq!(names, vec!["beta".to_string(), "gamma".to_string()]);
}

#[test]
fn duplicate_picks_the_next_free_copy_name_in_the_same_scope() {
    let (_dir, tree) = temp_tree();
    upsert(&tree, &HostRecord::new("alpha").with_user("deploy"), &project("funrize")).expect("alpha");

    let first = duplicate(&tree, "alpha").expect("first copy");
    let second = duplicate(&tree, "alpha").expect("second copy");

    assert_eq!(first.name, "alpha_copy");
    assert_eq!(second.name, "alpha_copy_2");
    assert_eq!(second.user.as_deref(), Some("deploy"));
    assert!(tree.project_host_file("funrize", "alpha_copy_2").is_file());
}

#[test]
fn ensure_include_is_idempotent() {
    let (_dir, tree) = temp_tree();
    fs::write(tree.main_file(), "Host beta\n").expect("seed config");

    assert!(ensure_include(&tree).expect("first"));
    assert!(!ensure_include(&tree).expect("second"));
    assert_eq!(read(tree.main_file()), "Include conf.d/*/*\n\nHost beta\n");
}
