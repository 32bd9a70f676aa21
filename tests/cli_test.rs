mod common;

use common::{atmsim, customer_script};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_status_on_fresh_machine() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- ATM STATUS ---"))
        .stdout(predicate::str::contains("System: ONLINE"))
        .stdout(predicate::str::contains("Usage: IDLE"))
        .stdout(predicate::str::contains("Cash: €5000.00"))
        .stdout(predicate::str::contains("Paper: 4 sheets"))
        .stdout(predicate::str::contains("Ink: 4 units"))
        .stdout(predicate::str::contains("Firmware: 1.0.0"));

    assert!(state.exists());
}

#[test]
fn test_customer_deposit_and_withdraw() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("Alice", "1234", &["2", "100", "3", "30", "4", "0"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("[+] Registered new account: Alice"))
        .stdout(predicate::str::contains("Successfully deposited €100.00"))
        .stdout(predicate::str::contains(
            "Desired amount reached. Please collect your cash: €30.00",
        ))
        .stdout(predicate::str::contains("Withdraw: €30.00 | Balance: €70.00"));

    atmsim(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cash: €5070.00"))
        .stdout(predicate::str::contains("Paper: 3 sheets"));
}

#[test]
fn test_customer_rejections() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("Alice", "12", &[]))
        .assert()
        .success()
        .stdout(predicate::str::contains("[!] PIN must be exactly 4 digits."));

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("ngaa", "0000", &[]))
        .assert()
        .success()
        .stdout(predicate::str::contains("[!] Incorrect PIN."));

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("ngaa", "2006", &["3", "500", "0"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, ngaa!"))
        .stdout(predicate::str::contains("[!] Insufficient funds"));
}

#[test]
fn test_technician_maintenance() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("technician")
        .write_stdin("TECH1\n123\n4\n20\n6\n1.x\n6\n1.2.3\n3\n1000\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[+] Paper refilled: 20 sheets"))
        .stdout(predicate::str::contains("[!] Invalid firmware format"))
        .stdout(predicate::str::contains("[+] Firmware updated to 1.2.3"))
        .stdout(predicate::str::contains("[+] Cash collected: €1000.00"))
        .stdout(predicate::str::contains("Logging out..."));

    atmsim(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cash: €4000.00"))
        .stdout(predicate::str::contains("Paper: 24 sheets"))
        .stdout(predicate::str::contains("Firmware: 1.2.3"));
}

#[test]
fn test_technician_bad_credentials() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("technician")
        .write_stdin("TECH1\n999\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[!] Invalid technician credentials."))
        .stdout(predicate::str::contains("TECHNICIAN PANEL").not());
}

#[test]
fn test_classic_generation_keeps_firmware() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .args(["--generation", "classic", "technician"])
        .write_stdin("TECH1\n123\n6\n2.0.0\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[!] Firmware is fixed on this machine generation.",
        ));

    atmsim(&state)
        .env("ATMSIM_GENERATION", "classic")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Firmware: 1.0.0"));
}

#[test]
fn test_main_menu_round_trip() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .write_stdin("1\nBob\n4321\n2\n25\n0\n5\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- ATM ---"))
        .stdout(predicate::str::contains("Successfully deposited €25.00"))
        .stdout(predicate::str::contains("Invalid option."))
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn test_statement_and_report_exports() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .arg("customer")
        .write_stdin(customer_script("Alice", "1234", &["2", "80", "3", "20", "0"]))
        .assert()
        .success();

    atmsim(&state)
        .args(["statement", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("timestamp,type,amount,balance\n"))
        .stdout(predicate::str::contains(",Deposit,80.00,80.00"))
        .stdout(predicate::str::contains(",Withdraw,20.00,60.00"));

    atmsim(&state)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("owner,balance,transactions"))
        .stdout(predicate::str::contains("ngaa,100.00,0"))
        .stdout(predicate::str::contains("Alice,60.00,2"))
        .stdout(predicate::str::contains("1234").not());
}

#[test]
fn test_statement_for_unknown_owner_fails() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("atm_state.json");

    atmsim(&state)
        .args(["statement", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No account found for nobody."));
}
