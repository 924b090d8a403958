use super::{DebugLogger, create_private_directory, open_private_append_file, should_flush};
use crate::log::LogLevel;
use std::fs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[test]
fn flushes_on_size_or_severity() {
    assert!(!should_flush(LogLevel::Debug, 512));
    assert!(!should_flush(LogLevel::Info, 512));
    assert!(should_flush(LogLevel::Info, 16 * 1024));
    assert!(should_flush(LogLevel::Warning, 1));
    assert!(should_flush(LogLevel::Error, 1));
}

#[test]
fn warnings_reach_the_file_without_an_explicit_flush() {
    let root = tempfile::tempdir().expect("temp dir");
    let log_path = root.path().join("logs").join("sshm.log");
    let logger = DebugLogger::new();
    logger.set_log_path(log_path.clone());

    logger.log(LogLevel::Debug, "scanning projects").expect("log debug");
    logger.log(LogLevel::Warning, "skipping project y").expect("log warning");

    let contents = fs::read_to_string(&log_path).expect("read log");
    assert!(contents.contains("[DEBUG] scanning projects"));
    assert!(contents.ends_with("[WARN] skipping project y\n"));
}

#[cfg(unix)]
#[test]
fn private_directory_and_file_permissions_are_restrictive() {
    let root = tempfile::tempdir().expect("temp dir");
    let log_dir = root.path().join("logs");
    let log_path = log_dir.join("sshm.log");

    create_private_directory(&log_dir).expect("create private log directory");
    let _file = open_private_append_file(&log_path).expect("create private log file");

    let dir_mode = fs::metadata(&log_dir).expect("directory metadata").permissions().mode() & 0o777;
    let file_mode = fs::metadata(&log_path).expect("file metadata").permissions().mode() & 0o777;

    assert_eq!(dir_mode, 0o700);
    assert_eq!(file_mode, 0o600);
}
