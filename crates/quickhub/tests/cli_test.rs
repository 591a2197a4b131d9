//! Integration tests for the `quickhub` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live hub.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `quickhub` binary with env isolation.
///
/// Clears all `HC3_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn quickhub_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("quickhub");
    cmd.env("HOME", "/tmp/quickhub-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/quickhub-cli-test-nonexistent")
        .env_remove("HC3_HOST")
        .env_remove("HC3_USER")
        .env_remove("HC3_PASSWORD")
        .env_remove("HC3_PROTOCOL")
        .env_remove("HC3_INSECURE")
        .env_remove("HC3_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = quickhub_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    quickhub_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("QuickApps")
            .and(predicate::str::contains("apps"))
            .and(predicate::str::contains("files"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_completions_generate() {
    quickhub_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quickhub"));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_apps_list_rejects_unknown_sort_column() {
    let output = quickhub_cmd()
        .args(["apps", "list", "--sort", "bogus"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("modified"), "expected column hint:\n{text}");
}

#[test]
fn test_unconfigured_apps_list_fails_with_config_help() {
    let output = quickhub_cmd().args(["apps", "list"]).output().unwrap();
    assert_ne!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(
        text.contains("HC3_HOST"),
        "expected config guidance in output:\n{text}"
    );
}

// ── Config commands (no hub needed) ─────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    quickhub_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_config_fails() {
    let output = quickhub_cmd().args(["config", "show"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
