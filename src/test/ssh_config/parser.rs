use super::{find_duplicate_names, find_host, list_project_files, parse_config_str, read_hosts};
use crate::ssh_config::{ConfigTree, HostRecord, SourceLocation};
use std::fs;
use std::path::Path;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

fn main_source() -> SourceLocation {
    SourceLocation::MainFile {
        path: "/tmp/config".into(),
    }
}

#[test]
fn parses_well_known_and_extra_directives() {
    let content = "Host app\n    HostName 10.0.0.10\n    User deploy\n    Port 2200\n    IdentityFile ~/.ssh/id_app\n    ProxyCommand nc %h %p\n    ForwardAgent yes\n    ProxyJump jumphost\n";
    let hosts = parse_config_str(content, &main_source());

    assert_eq!(hosts.len(), 1);
    let host = &hosts[0];
    assert_eq!(host.name, "app");
    assert_eq!(host.hostname.as_deref(), Some("10.0.0.10"));
    assert_eq!(host.user.as_deref(), Some("deploy"));
    assert_eq!(host.port, Some(2200));
    assert_eq!(host.identity_file.as_deref(), Some("~/.ssh/id_app"));
    assert_eq!(host.proxy_command.as_deref(), Some("nc %h %p"));
    assert_eq!(host.proxy_via.as_deref(), Some("jumphost"));
    assert_eq!(host.extra_directives, vec![("forwardagent".to_string(), "yes".to_string())]);
    assert_eq!(host.source, main_source());
}

#[test]
fn keys_match_case_insensitively() {
    let hosts = parse_config_str("HOST app\n  HOSTNAME example.com\n  user root\n", &main_source());
    assert_eq!(hosts[0].name, "app");
    assert_eq!(hosts[0].hostname.as_deref(), Some("example.com"));
    assert_eq!(hosts[0].user.as_deref(), Some("root"));
}

#[test]
fn skips_comments_includes_globals_and_single_token_lines() {
    let content = "Include conf.d/*/*\nServerAliveInterval 30\n# comment\nHost app\n    # nested comment\n    Compression\n    Port notanumber\n    User deploy\n";
    let hosts = parse_config_str(content, &main_source());

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].port, None);
    assert_eq!(hosts[0].user.as_deref(), Some("deploy"));
    assert!(hosts[0].extra_directives.is_empty());
}

#[test]
fn blank_line_closes_the_open_block() {
    let content = "Host first\n    User one\n\n    User stray\nHost second\n    User two\n";
    let hosts = parse_config_str(content, &main_source());

    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0].user.as_deref(), Some("one"));
    assert_eq!(hosts[1].name, "second");
    assert_eq!(hosts[1].user.as_deref(), Some("two"));
}

#[test]
fn repeated_extra_directive_keeps_position_and_last_value() {
    let content = "Host app\n    LocalForward 8080 localhost:80\n    Compression yes\n    LocalForward 9090 localhost:90\n";
    let hosts = parse_config_str(content, &main_source());

    assert_eq!(
        hosts[0].extra_directives,
        vec![
            ("localforward".to_string(), "9090 localhost:90".to_string()),
            ("compression".to_string(), "yes".to_string()),
        ]
    );
    assert_eq!(hosts[0].directive("LocalForward"), Some("9090 localhost:90"));
}

#[test]
fn reads_main_file_then_projects_in_sorted_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let tree = ConfigTree::new(dir.path().join("config"), dir.path().join("conf.d"));

    write_file(tree.main_file(), "Include conf.d/*/*\n\nHost main\n    HostName main.example\n");
    write_file(&tree.project_host_file("zeta", "zhost"), "Host zhost\n    HostName z.example\n");
    write_file(&tree.project_host_file("alpha", "bhost"), "Host bhost\n    HostName b.example\n");
    write_file(&tree.project_host_file("alpha", "ahost"), "Host ahost\n    HostName a.example\n");
    write_file(&tree.project_dir("alpha").join(".ahost.123.tmp"), "Host ghost\n");

    let hosts = read_hosts(&tree).expect("read hosts");
    let names: Vec<&str> = hosts.iter().map(|host| host.name.as_str()).collect();
    assert_eq!(names, vec!["main", "ahost", "bhost", "zhost"]);
    assert_eq!(hosts[1].source.project(), Some("alpha"));
    assert_eq!(hosts[1].source.path(), Some(tree.project_host_file("alpha", "ahost").as_path()));
}

#[test]
fn missing_tree_reads_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let tree = ConfigTree::new(dir.path().join("config"), dir.path().join("conf.d"));

    assert!(read_hosts(&tree).expect("read hosts").is_empty());
    assert!(list_project_files(tree.include_dir()).expect("list").is_empty());
    assert_eq!(find_host(&tree, "anything").expect("find"), None);
}

#[test]
fn reports_duplicate_names_once() {
    let hosts = vec![
        HostRecord::new("a"),
        HostRecord::new("b"),
        HostRecord::new("a"),
        HostRecord::new("a"),
    ];
    assert_eq!(find_duplicate_names(&hosts), vec!["a".to_string()]);
}

#[test]
fn match_section_closes_the_open_block() {
    let content = "Host alpha\n    User a\nMatch host *.corp\n    User corp\n";
    let hosts = parse_config_str(content, &main_source());

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].user.as_deref(), Some("a"));
}
