#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use std::path::Path;

/// The `atmsim` binary pointed at `state_file`, isolated from the caller's environment.
pub fn atmsim(state_file: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("atmsim"));
    cmd.env_remove("ATMSIM_STATE_FILE")
        .env_remove("ATMSIM_GENERATION")
        .env_remove("RUST_LOG")
        .arg("--state-file")
        .arg(state_file);
    cmd
}

/// Lines for a customer session run through the `customer` subcommand.
pub fn customer_script(name: &str, pin: &str, actions: &[&str]) -> String {
    let mut script = format!("{name}\n{pin}\n");
    for action in actions {
        script.push_str(action);
        script.push('\n');
    }
    script
}
