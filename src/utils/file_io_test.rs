use std::io::Write;

use crate::file_io::create_fresh_dir;
use crate::file_io::create_log_file;
use crate::file_io::create_temp_base_dir;
use crate::file_io::remove_dir_all_blocking;
use crate::file_io::remove_dir_all_if_exists;
use crate::test_utils::enable_logger;
use crate::Error;

/// Passed: "<tmp>/base/coord0" where "<tmp>/base" does not exist
/// Expected: both directories created
#[test]
fn test_create_fresh_dir_creates_missing_parents() {
    enable_logger();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("base").join("coord0");

    create_fresh_dir(&path).unwrap();

    assert!(path.is_dir());
}

#[test]
fn test_create_fresh_dir_rejects_existing_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("coord0");
    std::fs::create_dir(&path).unwrap();

    match create_fresh_dir(&path) {
        Err(Error::EnvironmentConflict { path: conflict }) => assert_eq!(conflict, path),
        other => panic!("expected EnvironmentConflict, got {:?}", other),
    }
}

#[test]
fn test_create_fresh_dir_rejects_existing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("daemon0");
    std::fs::write(&path, b"stale").unwrap();

    assert!(matches!(create_fresh_dir(&path), Err(Error::EnvironmentConflict { .. })));
}

#[test]
fn test_create_log_file_truncates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("runner.log");
    std::fs::write(&path, b"previous run output").unwrap();

    let mut file = create_log_file(&path).unwrap();
    file.write_all(b"new").unwrap();
    drop(file);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn test_create_temp_base_dir_outlives_handle() {
    let path = create_temp_base_dir("hyperdex-test-").unwrap();

    assert!(path.is_dir());
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("hyperdex-test-")));

    std::fs::remove_dir_all(&path).unwrap();
}

#[tokio::test]
async fn test_remove_dir_all_if_exists_is_tolerant() {
    let temp_dir = tempfile::tempdir().unwrap();
    let base = temp_dir.path().join("base");
    std::fs::create_dir_all(base.join("coord0")).unwrap();
    std::fs::write(base.join("coord0").join("runner.log"), b"log").unwrap();

    assert!(remove_dir_all_if_exists(&base).await.unwrap());
    assert!(!base.exists());

    // already gone counts as success
    assert!(!remove_dir_all_if_exists(&base).await.unwrap());
}

#[test]
fn test_remove_dir_all_blocking_is_tolerant() {
    let temp_dir = tempfile::tempdir().unwrap();
    let base = temp_dir.path().join("base");
    std::fs::create_dir_all(base.join("daemon0")).unwrap();

    assert!(remove_dir_all_blocking(&base).unwrap());
    assert!(!base.exists());
    assert!(!remove_dir_all_blocking(&base).unwrap());
}

/// Passed: a regular file where the base directory should be
/// Expected: an I/O error, not silent success
#[test]
fn test_remove_dir_all_blocking_rejects_a_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let base = temp_dir.path().join("base");
    std::fs::write(&base, b"not a directory").unwrap();

    assert!(matches!(remove_dir_all_blocking(&base), Err(Error::Io(_))));
}
