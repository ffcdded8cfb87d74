//! CLI integration tests for the employee-gateway binary
//!
//! These tests run the compiled binary and check argument handling and
//! configuration errors. None of them start the server.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[allow(deprecated)]
fn gateway_cmd() -> Command {
    Command::cargo_bin("employee-gateway").expect("Failed to find employee-gateway binary")
}

#[test]
fn test_help_flag() {
    gateway_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Resilient facade over a rate-limited upstream employee service",
        ))
        .stdout(predicate::str::contains("--backend-url"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_flag() {
    gateway_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_config_file_fails() {
    gateway_cmd()
        .args(["--config", "/nonexistent/gateway.toml", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn test_invalid_config_value_fails() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    writeln!(file, "[backend]\nretry_backoff_ms = 9000\nmax_backoff_ms = 10").unwrap();

    gateway_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("-q")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration value"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    gateway_cmd().args(["-q", "-v"]).assert().failure();
}

#[test]
fn test_unknown_flag_fails() {
    gateway_cmd().arg("--definitely-not-a-flag").assert().failure();
}
