// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Integration tests for the cscore CLI
//!
//! These tests verify CLI commands work correctly end-to-end using the
//! assert_cmd crate pattern. Tests that need the engine are ignored unless
//! libcscore is installed.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::env;

/// Helper to create a Command for the cscore binary
/// Uses CSCORE_BIN environment variable if set, otherwise the cargo-built binary
fn cscore_cmd() -> Command {
    let mut cmd = match env::var("CSCORE_BIN") {
        Ok(bin_path) => Command::new(bin_path),
        Err(_) => Command::cargo_bin("cscore").unwrap(),
    };

    // Explicitly pass the library search path for engine testing
    if let Ok(ld_library_path) = env::var("LD_LIBRARY_PATH") {
        cmd.env("LD_LIBRARY_PATH", ld_library_path);
    }

    cmd
}

/// A command that can never load the engine
fn cscore_cmd_without_library() -> Command {
    let mut cmd = cscore_cmd();
    cmd.env("CSCORE_LIBRARY", "/nonexistent/libcscore.so");
    cmd
}

// =============================================================================
// Basic CLI Tests (No Engine Required)
// =============================================================================

#[test]
fn test_cli_help() {
    cscore_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cscore CLI"))
        .stdout(predicate::str::contains("cameras"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("props"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_cli_version() {
    cscore_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cscore"));
}

#[test]
fn test_serve_help() {
    cscore_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MJPEG"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--resolution"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_watch_help() {
    cscore_cmd()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--events"))
        .stdout(predicate::str::contains("--immediate"));
}

#[test]
fn test_library_override_argument_is_not_a_cli_argument() {
    cscore_cmd()
        .args(["-cscore:/nonexistent/libcscore.so", "--help"])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_non_utf8_argument_is_reported() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    cscore_cmd_without_library()
        .arg("props")
        .arg(OsString::from_vec(b"/dev/vid\xffeo0".to_vec()))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_missing_subcommand() {
    cscore_cmd().assert().failure().code(2);
}

#[test]
fn test_serve_invalid_resolution() {
    cscore_cmd_without_library()
        .args(["serve", "--resolution", "1920"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid resolution format"));
}

#[test]
fn test_serve_invalid_format() {
    cscore_cmd_without_library()
        .args(["serve", "--format", "h264"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_serve_missing_config() {
    cscore_cmd_without_library()
        .args(["serve", "--config", "/nonexistent/camera.json"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_props_invalid_assignment() {
    cscore_cmd_without_library()
        .args(["props", "0", "--set", "brightness"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("name=value"));
}

#[test]
fn test_watch_unknown_event_kind() {
    cscore_cmd_without_library()
        .args(["watch", "--events", "source-created,bogus"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_missing_library_exit_code() {
    cscore_cmd_without_library()
        .arg("cameras")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("could not be loaded"));
}

// =============================================================================
// Engine Tests (Require libcscore)
// =============================================================================

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_info_json() {
    let output = cscore_cmd()
        .args(["--json", "info"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let info: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(info["hostname"].is_string());
    assert!(info["interfaces"].is_array());
    assert!(info["sources"].is_array());
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_cameras_json() {
    let output = cscore_cmd()
        .args(["--json", "cameras"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let cameras: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(cameras.is_array());
}
