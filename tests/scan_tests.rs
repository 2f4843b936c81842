// Tests for directory tree scanning

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use specular::sync::{scan_tree, EntryKind, ScanPolicy};

#[test]
fn test_scan_records_files_and_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
    fs::write(dir.path().join("top.txt"), b"12345").unwrap();
    fs::write(dir.path().join("sub/leaf.txt"), b"abc").unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot[Path::new("sub")].kind, EntryKind::Directory);
    assert_eq!(snapshot[Path::new("sub/inner")].kind, EntryKind::Directory);
    assert_eq!(snapshot[Path::new("top.txt")].kind, EntryKind::File);
    assert_eq!(snapshot[Path::new("top.txt")].size, 5);
    assert_eq!(snapshot[Path::new("sub/leaf.txt")].size, 3);
}

#[test]
fn test_scan_keys_are_relative_to_the_root() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/b.txt"), b"x").unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    assert!(snapshot.keys().all(|key| key.is_relative()));
    assert!(snapshot.contains_key(Path::new("a/b.txt")));
}

#[test]
fn test_scan_empty_directory_yields_empty_snapshot() {
    let dir = tempdir().unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    assert!(snapshot.is_empty());
}

#[test]
fn test_scan_includes_hidden_entries() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".config")).unwrap();
    fs::write(dir.path().join(".config/settings"), b"hidden").unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    assert!(snapshot.contains_key(Path::new(".config")));
    assert!(snapshot.contains_key(Path::new(".config/settings")));
}

#[test]
fn test_scan_directories_have_zero_size() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    assert_eq!(snapshot[Path::new("sub")].size, 0);
}

#[test]
fn test_scan_missing_root_aborts() {
    let dir = tempdir().unwrap();

    let result = scan_tree(&dir.path().join("does_not_exist"), ScanPolicy::Abort);

    assert!(result.is_err());
}

#[test]
fn test_scan_missing_root_with_skip_policy_yields_empty_snapshot() {
    let dir = tempdir().unwrap();

    let snapshot = scan_tree(&dir.path().join("does_not_exist"), ScanPolicy::Skip).unwrap();

    assert!(snapshot.is_empty());
}

#[cfg(unix)]
#[test]
fn test_scan_records_symlink_without_following_it() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::create_dir(outside.path().join("pointed_at")).unwrap();
    fs::write(outside.path().join("pointed_at/secret.txt"), b"x").unwrap();
    std::os::unix::fs::symlink(outside.path().join("pointed_at"), dir.path().join("link"))
        .unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    // The link itself appears as a non-directory node; its target's
    // children are never visited.
    assert_eq!(snapshot[Path::new("link")].kind, EntryKind::File);
    assert!(!snapshot.contains_key(Path::new("link/secret.txt")));
}

#[cfg(unix)]
#[test]
fn test_scan_records_dangling_symlink() {
    let dir = tempdir().unwrap();
    std::os::unix::fs::symlink("/no/such/target", dir.path().join("dangling")).unwrap();

    let snapshot = scan_tree(dir.path(), ScanPolicy::Abort).unwrap();

    assert_eq!(snapshot[Path::new("dangling")].kind, EntryKind::File);
}
