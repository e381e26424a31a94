// tests/directory_preparation.rs

use std::path::Path;

use n8n_launcher::errors::LauncherError;
use n8n_launcher::fs::RealFileSystem;
use n8n_launcher::fs::mock::MockFileSystem;
use n8n_launcher::prepare::{DATABASE_DIR, LOGS_DIR, REPORTS_DIR, prepare_directories};
use n8n_launcher_test_utils::init_tracing;

const ALL: [&str; 3] = [DATABASE_DIR, LOGS_DIR, REPORTS_DIR];

#[test]
fn creates_missing_directories_on_disk() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join(LOGS_DIR)).unwrap();

    let created = prepare_directories(&RealFileSystem, root.path(), &ALL).unwrap();

    assert_eq!(
        created,
        vec![root.path().join(DATABASE_DIR), root.path().join(REPORTS_DIR)]
    );
    for dir in ALL {
        assert!(root.path().join(dir).is_dir());
    }
}

#[test]
fn second_run_is_a_no_op() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    let first = prepare_directories(&RealFileSystem, root.path(), &ALL).unwrap();
    let second = prepare_directories(&RealFileSystem, root.path(), &ALL).unwrap();

    assert_eq!(first.len(), 3);
    assert!(second.is_empty());
}

#[test]
fn creates_nested_data_folder_recursively() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("render/project/src");

    prepare_directories(&RealFileSystem, &data, &[DATABASE_DIR]).unwrap();
    assert!(data.join(DATABASE_DIR).is_dir());
}

#[test]
fn file_in_the_way_is_a_preparation_error() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join(DATABASE_DIR), b"oops").unwrap();

    match prepare_directories(&RealFileSystem, root.path(), &ALL) {
        Err(LauncherError::DirectoryPreparation { path, .. }) => {
            assert_eq!(path, root.path().join(DATABASE_DIR));
        }
        Err(e) => panic!("Expected DirectoryPreparation error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn permission_denied_is_surfaced_with_path() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_dir("/srv/data");
    fs.deny_writes_under("/srv/data");

    let err = prepare_directories(&fs, Path::new("/srv/data"), &ALL).unwrap_err();

    match err {
        LauncherError::DirectoryPreparation { path, source } => {
            assert_eq!(path, Path::new("/srv/data/database"));
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
        }
        e => panic!("Expected DirectoryPreparation error, got: {:?}", e),
    }
    // Fails fast: nothing after the first failure is attempted.
    assert_eq!(fs.create_calls().len(), 1);
}

#[test]
fn existing_directories_are_not_recreated() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_dir("/srv/data/database");
    fs.add_dir("/srv/data/logs");

    let created = prepare_directories(&fs, Path::new("/srv/data"), &ALL).unwrap();
    assert_eq!(created, vec![Path::new("/srv/data/generated-reports").to_path_buf()]);

    let again = prepare_directories(&fs, Path::new("/srv/data"), &ALL).unwrap();
    assert!(again.is_empty());
    assert_eq!(fs.create_calls().len(), 1);
}

#[test]
fn mock_file_blocks_directory() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/srv/data/logs");

    let err = prepare_directories(&fs, Path::new("/srv/data"), &[LOGS_DIR]).unwrap_err();
    assert!(matches!(err, LauncherError::DirectoryPreparation { .. }));
    assert!(fs.create_calls().is_empty());
}
