//! Integration tests for the `opsdeck` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! exit codes, and offline flag management, all without a live console.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `opsdeck` binary with env isolation.
///
/// Clears all `OPSDECK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn opsdeck_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("opsdeck");
    cmd.env("HOME", "/tmp/opsdeck-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/opsdeck-cli-test-nonexistent")
        .env_remove("OPSDECK_PROFILE")
        .env_remove("OPSDECK_CONSOLE")
        .env_remove("OPSDECK_TOKEN")
        .env_remove("OPSDECK_OUTPUT")
        .env_remove("OPSDECK_INSECURE")
        .env_remove("OPSDECK_TIMEOUT")
        .env_remove("OPSDECK_USERNAME")
        .env_remove("OPSDECK_PASSWORD");
    cmd
}

/// Same isolation, but config directories point at `dir`.
fn opsdeck_cmd_in(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = opsdeck_cmd();
    cmd.env("HOME", dir).env("XDG_CONFIG_HOME", dir);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Minimal config with one token-auth profile named `default`.
fn write_config(dir: &std::path::Path) {
    let config_dir = dir.join("opsdeck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
            default_profile = "default"

            [profiles.default]
            console = "https://ops.example.com"
            token = "test-token"
        "#,
    )
    .unwrap();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = opsdeck_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    opsdeck_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("operations console")
            .and(predicate::str::contains("notifications"))
            .and(predicate::str::contains("contracts"))
            .and(predicate::str::contains("rules"))
            .and(predicate::str::contains("comparisons")),
    );
}

#[test]
fn test_version_flag() {
    opsdeck_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("opsdeck"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    opsdeck_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    opsdeck_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    opsdeck_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases and exit codes ──────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = opsdeck_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_list_without_config_exits_with_config_code() {
    let output = opsdeck_cmd()
        .args(["notifications", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected config exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration") || text.contains("config"),
        "Expected config error:\n{text}"
    );
    // The error should point at the fix.
    assert!(
        text.contains("opsdeck login"),
        "Expected login hint:\n{text}"
    );
}

#[test]
fn test_list_without_credentials_exits_with_auth_code() {
    let output = opsdeck_cmd()
        .args(["--console", "https://ops.example.com", "contracts", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("credentials"),
        "Expected credentials error:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = opsdeck_cmd()
        .args(["--output", "invalid", "notifications", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly; the failure should be about
    // missing console config, not about argument parsing.
    let output = opsdeck_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "notifications",
            "list",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected config exit code");
    let text = combined_output(&output);
    assert!(
        !text.contains("Usage"),
        "Flags should have parsed cleanly:\n{text}"
    );
}

#[test]
fn test_subcommand_aliases_parse() {
    // `n ls` is `notifications list`; it must get as far as the config
    // lookup rather than dying as an unrecognized subcommand.
    let output = opsdeck_cmd().args(["n", "ls"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration"),
        "Expected config error, not a parse error:\n{text}"
    );
}

#[test]
fn test_comparisons_run_requires_both_systems() {
    let output = opsdeck_cmd().args(["comparisons", "run"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("--source") && text.contains("--target"),
        "Expected missing-argument error:\n{text}"
    );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_notifications_subcommands_exist() {
    opsdeck_cmd()
        .args(["notifications", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("read"))
                .and(predicate::str::contains("read-all"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_contracts_subcommands_exist() {
    opsdeck_cmd()
        .args(["contracts", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("edit"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_rules_subcommands_exist() {
    opsdeck_cmd()
        .args(["rules", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("enable"))
                .and(predicate::str::contains("disable"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_comparisons_subcommands_exist() {
    opsdeck_cmd()
        .args(["comparisons", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("run"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_flags_subcommands_exist() {
    opsdeck_cmd()
        .args(["flags", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show").and(predicate::str::contains("set")));
}

// ── Offline flag management ─────────────────────────────────────────

#[test]
fn test_flags_show_without_config_uses_defaults() {
    // `flags show` works offline and renders the baked-in defaults
    // (every section on) when no config file exists.
    opsdeck_cmd()
        .args(["--output", "plain", "flags", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("notifications-tray=on")
                .and(predicate::str::contains("contract-editing=on"))
                .and(predicate::str::contains("security-rules=on"))
                .and(predicate::str::contains("comparisons=on")),
        );
}

#[test]
fn test_flags_set_persists_to_profile() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());

    opsdeck_cmd_in(dir.path())
        .args(["flags", "set", "contract-editing", "off"])
        .assert()
        .success();

    let saved =
        std::fs::read_to_string(dir.path().join("opsdeck").join("config.toml")).unwrap();
    assert!(
        saved.contains("contract-editing = false"),
        "Expected persisted flag in config:\n{saved}"
    );
    assert!(
        saved.contains("notifications-tray = true"),
        "Other flags should keep their values:\n{saved}"
    );

    // The change is visible to the next invocation.
    opsdeck_cmd_in(dir.path())
        .args(["--output", "plain", "flags", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("contract-editing=off")
                .and(predicate::str::contains("comparisons=on")),
        );
}

#[test]
fn test_flags_set_unknown_flag_exits_with_validation_code() {
    let output = opsdeck_cmd()
        .args(["flags", "set", "bogus", "on"])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(6),
        "Expected validation exit code"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("unknown flag") && text.contains("contract-editing"),
        "Expected the valid flag names in the error:\n{text}"
    );
}

#[test]
fn test_flags_set_without_profile_exits_with_config_code() {
    let output = opsdeck_cmd()
        .args(["flags", "set", "comparisons", "off"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected config exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("default"),
        "Expected the missing profile name:\n{text}"
    );
}
