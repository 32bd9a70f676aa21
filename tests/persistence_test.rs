mod common;

use atmsim::domain::ports::StateStore;
use atmsim::infrastructure::json_file::JsonFileStateStore;
use common::{atmsim, customer_script};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_balance_survives_restart() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("nested").join("atm_state.json");

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("Carol", "2468", &["2", "150", "0"]))
        .assert()
        .success();

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("carol", "2468", &["1", "0"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Carol!"))
        .stdout(predicate::str::contains("Current balance: €150.00"));
}

#[tokio::test]
async fn test_saved_file_always_contains_protected_account() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("Dave", "1357", &["2", "10", "0"]))
        .assert()
        .success();

    // Drop every account from the file; the next load restores ngaa
    let store = JsonFileStateStore::new(&state);
    let mut snapshot = store.load().await.unwrap();
    snapshot.accounts.clear();
    store.save(&snapshot).await.unwrap();

    let raw = std::fs::read_to_string(&state).unwrap();
    assert!(!raw.contains("ngaa"));

    atmsim(&state)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("ngaa,100.00,0"))
        .stdout(predicate::str::contains("Dave").not());

    let raw = std::fs::read_to_string(&state).unwrap();
    assert!(raw.contains("\"ngaa\""));
}

#[test]
fn test_corrupt_state_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");
    std::fs::write(&state, "{ this is not json").unwrap();

    atmsim(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cash: €5000.00"));

    let raw = std::fs::read_to_string(&state).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["paper"], 4);
    assert_eq!(value["firmware"], "1.0.0");
}

#[test]
fn test_ephemeral_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .args(["--ephemeral", "customer"])
        .write_stdin(customer_script("Erin", "1111", &["2", "40", "0"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully deposited €40.00"));

    assert!(!state.exists());
}

#[test]
fn test_invalid_field_does_not_drop_accounts() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");
    std::fs::write(
        &state,
        r#"{"cash":"5000","paper":4,"ink":4,"firmware":"2.0",
            "accounts":[{"owner":"Alice","pin":"1234","balance":"900","transactions":[]}]}"#,
    )
    .unwrap();

    atmsim(&state)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice,900.00,0"))
        .stdout(predicate::str::contains("ngaa,100.00,0"));

    atmsim(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Firmware: 1.0.0"));
}
