//! Browser adapter -- hand a URL to the desktop's default browser.
//!
//! The platform launcher (`open` on macOS, `cmd /C start` on Windows,
//! `xdg-open` elsewhere) is spawned with the URL as its last argument and
//! awaited, so a launcher that is missing or exits non-zero surfaces as an
//! error instead of failing silently.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::{AdapterError, Result};
use crate::traits::{Adapter, AdapterType, HealthStatus, string_param};

/// Name of the single tool this adapter exposes.
pub const BROWSER_OPEN: &str = "browser_open";

/// How long to wait for the launcher process to hand off.
const LAUNCH_TIMEOUT_SECS: u64 = 10;

/// Launcher program and leading arguments for the current platform.
fn default_launcher() -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open".into(), Vec::new())
    } else if cfg!(windows) {
        // `start` is a cmd builtin; the empty string is the window title.
        ("cmd".into(), vec!["/C".into(), "start".into(), String::new()])
    } else {
        ("xdg-open".into(), Vec::new())
    }
}

/// Default-browser launch adapter.
pub struct BrowserAdapter {
    id: String,
    program: String,
    args: Vec<String>,
    connected: bool,
}

impl BrowserAdapter {
    /// Create a browser adapter using the platform launcher.
    pub fn new(id: impl Into<String>) -> Self {
        let (program, args) = default_launcher();
        Self {
            id: id.into(),
            program,
            args,
            connected: false,
        }
    }

    /// Replace the launcher program; the URL is appended after `args`.
    pub fn with_launcher(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.program = program.into();
        self.args = args;
        self
    }

    /// Open `url` in the default browser.
    pub async fn open(&self, url: &str) -> Result<()> {
        debug!(program = %self.program, url = url, "launching browser");

        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AdapterError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let status = tokio::time::timeout(Duration::from_secs(LAUNCH_TIMEOUT_SECS), child.wait())
            .await
            .map_err(|_| AdapterError::Timeout {
                seconds: LAUNCH_TIMEOUT_SECS,
                reason: format!("browser launcher `{}` did not return", self.program),
            })??;

        if !status.success() {
            warn!(program = %self.program, code = ?status.code(), "browser launcher failed");
            return Err(AdapterError::ExecutionFailed {
                tool_name: BROWSER_OPEN.into(),
                reason: format!("`{}` exited with {status}", self.program),
            });
        }

        info!(url = url, "opened in browser");
        Ok(())
    }
}

#[async_trait]
impl Adapter for BrowserAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Browser
    }

    async fn connect(&mut self) -> Result<()> {
        info!(id = %self.id, launcher = %self.program, "browser adapter connected");
        self.connected = true;
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        if self.connected {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<Value> {
        if !self.connected {
            return Err(AdapterError::NotConnected {
                adapter_id: self.id.clone(),
            });
        }
        if name != BROWSER_OPEN {
            return Err(AdapterError::ToolNotFound {
                adapter_id: self.id.clone(),
                tool_name: name.to_string(),
            });
        }
        let url = string_param(&params, BROWSER_OPEN, "url")?;
        self.open(url).await?;
        Ok(json!({ "url": url, "opened": true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_launcher_is_platform_specific() {
        let (program, _) = default_launcher();
        if cfg!(target_os = "linux") {
            assert_eq!(program, "xdg-open");
        }
        assert!(!program.is_empty());
    }

    #[tokio::test]
    async fn health_follows_connection() {
        let mut adapter = BrowserAdapter::new("browser-test");
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Unhealthy);
        adapter.connect().await.unwrap();
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn missing_url_is_invalid() {
        let mut adapter = BrowserAdapter::new("browser-test");
        adapter.connect().await.unwrap();
        let result = adapter.execute_tool(BROWSER_OPEN, json!({"link": "x"})).await;
        assert!(matches!(result, Err(AdapterError::InvalidParams { .. })));
    }

    #[tokio::test]
    async fn missing_launcher_fails_to_spawn() {
        let mut adapter = BrowserAdapter::new("browser-test")
            .with_launcher("myterm-no-such-launcher", Vec::new());
        adapter.connect().await.unwrap();
        let result = adapter
            .execute_tool(BROWSER_OPEN, json!({"url": "https://example.com"}))
            .await;
        assert!(matches!(result, Err(AdapterError::Spawn { .. })));
    }

    #[tokio::test]
    async fn refuses_before_connect() {
        let adapter = BrowserAdapter::new("browser-test");
        let result = adapter
            .execute_tool(BROWSER_OPEN, json!({"url": "https://example.com"}))
            .await;
        assert!(matches!(result, Err(AdapterError::NotConnected { .. })));
    }
}
