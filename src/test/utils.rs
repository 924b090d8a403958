use super::{read_optional, remove_if_exists, write_atomic};
use std::fs;

#[test]
fn missing_file_reads_as_none() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert_eq!(read_optional(&dir.path().join("absent")).expect("read"), None);
}

#[test]
fn atomic_write_creates_parents_and_leaves_no_temp_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let target = dir.path().join("conf.d").join("funrize").join("alpha");

    write_atomic(&target, "Host alpha\n").expect("first write");
    write_atomic(&target, "Host alpha\n    Port 22\n").expect("second write");

    assert_eq!(fs::read_to_string(&target).expect("read back"), "Host alpha\n    Port 22\n");
    let entries: Vec<_> = fs::read_dir(target.parent().expect("parent"))
        .expect("list dir")
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["alpha".to_string()]);
}

#[test]
fn remove_if_exists_reports_whether_a_file_was_deleted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("doc.xml");
    fs::write(&path, "<project/>").expect("write");

    assert!(remove_if_exists(&path).expect("remove existing"));
    assert!(!remove_if_exists(&path).expect("remove missing"));
}
