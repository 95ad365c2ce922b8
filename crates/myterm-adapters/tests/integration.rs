//! Integration tests for the myterm-adapters crate.
//!
//! These spawn real processes, so they are limited to Unix hosts where
//! `sh`, `true` and `false` are always present.

#![cfg(unix)]

use myterm_adapters::{Adapter, AdapterError, BrowserAdapter, ShellAdapter, ShellOutput};
use serde_json::json;

async fn connected_shell(dir: &std::path::Path) -> ShellAdapter {
    let mut shell = ShellAdapter::new("shell", dir).with_timeout(5);
    shell.connect().await.unwrap();
    shell
}

// ═══════════════════════════════════════════════════════════════════════
//  Shell passthrough
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let shell = connected_shell(dir.path()).await;

    let output = shell.run("echo hello").await.unwrap();
    assert_eq!(output.stdout, "hello\n");
    assert!(output.stderr.is_empty());
    assert!(output.success());
}

#[tokio::test]
async fn non_zero_exit_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let shell = connected_shell(dir.path()).await;

    let output = shell.run("echo oops >&2; exit 3").await.unwrap();
    assert_eq!(output.exit_code, 3);
    assert_eq!(output.stderr, "oops\n");
    assert!(!output.success());
}

#[tokio::test]
async fn runs_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
    let shell = connected_shell(dir.path()).await;

    let output = shell.run("ls").await.unwrap();
    assert!(output.stdout.contains("marker.txt"));
}

#[tokio::test]
async fn slow_command_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = ShellAdapter::new("shell", dir.path()).with_timeout(1);
    shell.connect().await.unwrap();

    let result = shell.run("sleep 5").await;
    assert!(matches!(result, Err(AdapterError::Timeout { seconds: 1, .. })));
}

#[tokio::test]
async fn tool_output_deserializes_to_shell_output() {
    let dir = tempfile::tempdir().unwrap();
    let shell = connected_shell(dir.path()).await;

    let value = shell
        .execute_tool("shell_execute", json!({"command": "printf abc"}))
        .await
        .unwrap();
    let output: ShellOutput = serde_json::from_value(value).unwrap();
    assert_eq!(output.stdout, "abc");
    assert_eq!(output.command, "printf abc");
}

// ═══════════════════════════════════════════════════════════════════════
//  Browser launch
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn launcher_success_and_failure() {
    let ok = BrowserAdapter::new("browser").with_launcher("true", Vec::new());
    ok.open("https://example.com").await.unwrap();

    let failing = BrowserAdapter::new("browser").with_launcher("false", Vec::new());
    let result = failing.open("https://example.com").await;
    assert!(matches!(result, Err(AdapterError::ExecutionFailed { .. })));
}

#[tokio::test]
async fn launcher_receives_url_as_last_argument() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("url.txt");
    let script = format!("printf %s \"$1\" > {}", sink.display());

    let mut browser = BrowserAdapter::new("browser")
        .with_launcher("sh", vec!["-c".into(), script, "launcher".into()]);
    browser.connect().await.unwrap();
    browser
        .execute_tool("browser_open", json!({"url": "https://docs.rs"}))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(sink).unwrap(), "https://docs.rs");
}
