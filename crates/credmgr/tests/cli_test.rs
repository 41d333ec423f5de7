//! Integration tests for the `credmgr` CLI binary.
//!
//! Argument parsing, help output, completions, error exit codes, and a few
//! end-to-end runs against a mock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `credmgr` binary with env isolation.
///
/// Clears all `CREDMGR_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn credmgr_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("credmgr");
    cmd.env("HOME", "/tmp/credmgr-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/credmgr-cli-test-nonexistent")
        .env("CREDMGR_CONFIG", "/tmp/credmgr-cli-test-nonexistent/config.toml")
        .env_remove("CREDMGR_PROFILE")
        .env_remove("CREDMGR_SERVER")
        .env_remove("CREDMGR_TOKEN")
        .env_remove("CREDMGR_OUTPUT")
        .env_remove("CREDMGR_INSECURE")
        .env_remove("CREDMGR_TIMEOUT")
        .env_remove("CREDMGR_USERNAME")
        .env_remove("CREDMGR_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = credmgr_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    credmgr_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("credentials")
            .and(predicate::str::contains("identity-providers"))
            .and(predicate::str::contains("service-providers")),
    );
}

#[test]
fn test_version_flag() {
    credmgr_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credmgr"));
}

#[test]
fn test_entity_subcommands_exist() {
    credmgr_cmd()
        .args(["sp", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("patch"))
                .and(predicate::str::contains("delete")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    credmgr_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    credmgr_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("credmgr"));
}

// ── Error handling ──────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = credmgr_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("frobnicate"));
}

#[test]
fn test_list_without_config_or_server() {
    let output = credmgr_cmd().args(["credentials", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Configuration file not found"));
}

#[test]
fn test_unknown_profile() {
    let output = credmgr_cmd()
        .args(["--profile", "nope", "idp", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Profile 'nope' not found"));
}

#[test]
fn test_connection_refused_exit_code() {
    let output = credmgr_cmd()
        .args(["--server", "http://127.0.0.1:1", "--timeout", "5", "idp", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Could not connect"));
}

#[test]
fn test_delete_requires_yes_without_tty() {
    let output = credmgr_cmd()
        .args(["--server", "http://127.0.0.1:1", "credentials", "delete", "5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[test]
fn test_debug_log_masks_password_flag() {
    let output = credmgr_cmd()
        .args(["-vv", "--server", "http://127.0.0.1:1", "credentials", "create"])
        .args(["--profile-name", "p", "--password", "hunter2-secret"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dispatching command"), "{stderr}");
    assert!(!stderr.contains("hunter2-secret"), "{stderr}");
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_set_then_show_redacts_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        r#"
        default_profile = "lab"

        [profiles.lab]
        server = "http://localhost:8080"
        auth_mode = "token"
        token = "very-secret-token"
        "#,
    )
    .unwrap();

    credmgr_cmd()
        .env("CREDMGR_CONFIG", &config)
        .args(["config", "set", "timeout", "12"])
        .assert()
        .success();

    credmgr_cmd()
        .env("CREDMGR_CONFIG", &config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("timeout = 12")
                .and(predicate::str::contains("token = \"****\""))
                .and(predicate::str::contains("very-secret-token").not()),
        );
}

#[test]
fn test_config_use_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let output = credmgr_cmd()
        .env("CREDMGR_CONFIG", dir.path().join("config.toml"))
        .args(["config", "use", "missing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Profile 'missing' not found"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/identity-providers"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "2")
                .set_body_json(json!([
                    { "id": 1, "name": "okta" },
                    { "id": 2, "name": "azure" }
                ])),
        )
        .mount(&server)
        .await;

    let output = credmgr_cmd()
        .args(["--server", &server.uri(), "--token", "t0ken", "-o", "json"])
        .args(["identity-providers", "list"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[1]["name"], "azure");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_missing_record_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/service-providers/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "status": 404
        })))
        .mount(&server)
        .await;

    let output = credmgr_cmd()
        .args(["--server", &server.uri(), "sp", "get", "99"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("service-providers list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes_refreshes_listing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/identity-providers/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/identity-providers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "0")
                .set_body_json(json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    credmgr_cmd()
        .args(["--server", &server.uri(), "-y", "idp", "delete", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted identity provider 5"));
}
