//! End-to-end tests for the riji binary covering the offline commands.
//!
//! The insights/today/daemon commands need the remote API and are covered
//! by the orchestrator and refresh integration tests instead.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

// Helper function to set up a test Command instance
fn set_up_command(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("riji").unwrap();
    cmd.env_clear()
        .env("HOME", "/tmp")
        .env("RIJI_DIR", data_dir.path());
    cmd
}

#[test]
#[serial]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&temp_dir);

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("insights"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
#[serial]
fn test_cli_list_empty() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&temp_dir);

    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("目前還沒有日記"));
}

#[test]
#[serial]
fn test_cli_add_then_list() {
    let temp_dir = TempDir::new().unwrap();

    let mut add = set_up_command(&temp_dir);
    add.args(["add", "今天天氣很好", "--date", "20250310"]);
    add.assert()
        .success()
        .stdout(predicate::str::contains("20250310"));

    let mut list = set_up_command(&temp_dir);
    list.arg("list");
    list.assert()
        .success()
        .stdout(predicate::str::contains("今天天氣很好"));
}

#[test]
#[serial]
fn test_cli_add_rejects_bad_date() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&temp_dir);

    cmd.args(["add", "text", "--date", "03/10/2025"]);
    cmd.assert().failure();
}

#[test]
#[serial]
fn test_cli_show_unknown_id_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&temp_dir);

    cmd.args(["show", "not-a-uuid"]);
    cmd.assert().failure();
}
