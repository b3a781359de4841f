mod common;

use std::net::TcpListener;

use common::GroupdeskTest;

/// A base URL nothing is listening on
fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ============================================================================
// Config command tests
// ============================================================================

#[test]
fn test_config_show_defaults() {
    let gd = GroupdeskTest::new();

    let output = gd.run_success(&["config", "show"]);
    assert!(output.contains("Configuration"));
    assert!(output.contains("http://localhost:8080"));
    assert!(output.contains("not configured"));
}

#[test]
fn test_config_set_and_get() {
    let gd = GroupdeskTest::new();

    gd.run_success(&["config", "set", "base_url", "https://admin.example.com/api/"]);
    gd.run_success(&["config", "set", "page_size", "10"]);

    let url = gd.run_success(&["config", "get", "base_url"]);
    assert_eq!(url.trim(), "https://admin.example.com/api");
    let size = gd.run_success(&["config", "get", "page_size"]);
    assert_eq!(size.trim(), "10");

    let saved = gd.read_config().unwrap();
    assert!(saved.contains("page_size: 10"));
}

#[test]
fn test_config_token_is_masked() {
    let gd = GroupdeskTest::new();

    let set = gd.run_success(&["config", "set", "auth.token", "abcdef123456"]);
    assert!(!set.contains("abcdef123456"));

    let got = gd.run_success(&["config", "get", "auth.token"]);
    assert_eq!(got.trim(), "ab...56");

    let shown = gd.run_success(&["config", "show", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(json["auth"]["token_configured"], true);
}

#[test]
fn test_config_rejects_bad_values() {
    let gd = GroupdeskTest::new();

    let stderr = gd.run_failure(&["config", "set", "page_size", "0"]);
    assert!(stderr.contains("page_size"));

    let stderr = gd.run_failure(&["config", "set", "base_url", "ftp://example.com"]);
    assert!(stderr.contains("http"));

    let stderr = gd.run_failure(&["config", "set", "colour", "blue"]);
    assert!(stderr.contains("unknown config key"));

    assert!(gd.read_config().is_none());
}

#[test]
fn test_config_get_unset_token() {
    let gd = GroupdeskTest::new();
    let stderr = gd.run_failure(&["config", "get", "auth.token"]);
    assert!(stderr.contains("not set"));
}

#[test]
fn test_env_overrides_base_url() {
    let gd = GroupdeskTest::new();
    gd.write_config("base_url: http://from-file:1\n");

    let output = gd
        .command()
        .env("GROUPDESK_BASE_URL", "http://from-env:2")
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["base_url"], "http://from-env:2");
}

// ============================================================================
// Group and request commands without a backend
// ============================================================================

#[test]
fn test_delete_requires_force_when_not_interactive() {
    let gd = GroupdeskTest::new();
    let stderr = gd.run_failure(&["groups", "delete", "1"]);
    assert!(stderr.contains("--force"));
}

#[test]
fn test_unreachable_backend_reports_transport_failure() {
    let gd = GroupdeskTest::new();
    gd.write_config(&format!("base_url: {}\ntimeout: 2\n", dead_base_url()));

    let stderr = gd.run_failure(&["groups", "ls"]);
    assert!(stderr.contains("could not connect"));

    let stderr = gd.run_failure(&["requests", "ls"]);
    assert!(stderr.contains("could not connect"));
}

#[test]
fn test_create_validates_before_sending() {
    let gd = GroupdeskTest::new();
    gd.write_config(&format!("base_url: {}\n", dead_base_url()));

    let stderr = gd.run_failure(&["groups", "create", "Wealth", "--path", "/w", "-d", "  "]);
    assert!(stderr.contains("Group description is required."));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let gd = GroupdeskTest::new();
    let output = gd.run_success(&["completions", "bash"]);
    assert!(output.contains("_groupdesk"));
}

#[test]
fn test_completions_zsh() {
    let gd = GroupdeskTest::new();
    let output = gd.run_success(&["completions", "zsh"]);
    assert!(output.contains("#compdef groupdesk"));
}
