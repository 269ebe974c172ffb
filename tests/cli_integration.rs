//! CLI smoke tests
//!
//! Verifies argument surface and failure behavior of the binary without
//! touching the network.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_flags() {
    let mut cmd = Command::cargo_bin("meshchain-bot").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--data-file"))
        .stdout(predicate::str::contains("--proxy-file"))
        .stdout(predicate::str::contains("--once"));
}

#[test]
fn version_prints_name() {
    let mut cmd = Command::cargo_bin("meshchain-bot").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("meshchain-bot"));
}

#[test]
fn missing_credential_file_fails() {
    let mut cmd = Command::cargo_bin("meshchain-bot").unwrap();
    cmd.args(["--once", "--data-file", "/nonexistent/data.txt"])
        .assert()
        .failure();
}

#[test]
fn malformed_credential_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.txt");
    std::fs::write(&data_file, "this-is-not-a-credential\n").unwrap();

    let mut cmd = Command::cargo_bin("meshchain-bot").unwrap();
    cmd.args(["--once", "--data-file"])
        .arg(&data_file)
        .assert()
        .failure();
}
