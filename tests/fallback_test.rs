mod common;

use common::atmsim;
use predicates::prelude::*;
use tempfile::tempdir;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("--db-path")
        .arg(dir.path().join("some_db"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("System: ONLINE"))
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to the JSON state file."));

    assert!(state.exists());
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");
    let db_path = dir.path().join("test_db");

    atmsim(&state)
        .arg("--db-path")
        .arg(&db_path)
        .arg("customer")
        .write_stdin("Alice\n1234\n2\n100\n0\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());

    atmsim(&state)
        .arg("--db-path")
        .arg(&db_path)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice,100.00,1"))
        .stdout(predicate::str::contains("ngaa,100.00,0"));

    assert!(!state.exists());
}

#[test]
fn test_db_path_conflicts_with_ephemeral() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .args(["--ephemeral", "--db-path"])
        .arg(dir.path().join("db"))
        .arg("status")
        .assert()
        .failure();
}
