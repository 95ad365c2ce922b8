//! Shell adapter: run an unrecognized command line through the platform
//! shell and capture what it prints.
//!
//! Commands go through `sh -c` (or `cmd /C` on Windows) with stdin closed,
//! in a fixed working directory, under a timeout. Stdout and stderr are
//! captured separately and each is capped at [`MAX_OUTPUT_BYTES`].

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AdapterError, Result};
use crate::traits::{Adapter, AdapterType, HealthStatus, string_param};

/// Name of the single tool this adapter exposes.
pub const SHELL_EXECUTE: &str = "shell_execute";

/// Default command timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Cap on captured bytes per stream.
pub const MAX_OUTPUT_BYTES: usize = 64 * 1024;

const TRUNCATION_MARKER: &str = "\n[... output truncated]";

#[cfg(windows)]
const SHELL: [&str; 2] = ["cmd", "/C"];
#[cfg(not(windows))]
const SHELL: [&str; 2] = ["sh", "-c"];

/// Captured result of one shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    pub command: String,
    /// `-1` when the process was killed by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Lossy UTF-8 view of one captured stream, capped at [`MAX_OUTPUT_BYTES`].
fn capture(raw: &[u8]) -> (String, bool) {
    if raw.len() <= MAX_OUTPUT_BYTES {
        return (String::from_utf8_lossy(raw).into_owned(), false);
    }
    let mut text = String::from_utf8_lossy(&raw[..MAX_OUTPUT_BYTES]).into_owned();
    text.push_str(TRUNCATION_MARKER);
    (text, true)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Shell passthrough adapter.
pub struct ShellAdapter {
    id: String,
    working_dir: PathBuf,
    timeout: Duration,
    connected: bool,
}

impl ShellAdapter {
    pub fn new(id: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            working_dir: working_dir.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connected: false,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Run `command` and capture its output.
    ///
    /// A non-zero exit status is reported in [`ShellOutput::exit_code`], not
    /// as an error. Exceeding the timeout kills the child.
    pub async fn run(&self, command: &str) -> Result<ShellOutput> {
        let [program, flag] = SHELL;
        debug!(command, cwd = %self.working_dir.display(), "running shell command");

        let child = tokio::process::Command::new(program)
            .arg(flag)
            .arg(command)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AdapterError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let Ok(waited) = tokio::time::timeout(self.timeout, child.wait_with_output()).await else {
            warn!(command, timeout_secs = self.timeout_secs(), "shell command timed out");
            return Err(AdapterError::Timeout {
                seconds: self.timeout_secs(),
                reason: format!("`{command}` was killed"),
            });
        };
        let output = waited?;

        let (stdout, stdout_truncated) = capture(&output.stdout);
        let (stderr, stderr_truncated) = capture(&output.stderr);
        let result = ShellOutput {
            command: command.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
            stdout_truncated,
            stderr_truncated,
        };
        debug!(exit_code = result.exit_code, "shell command finished");
        Ok(result)
    }
}

#[async_trait]
impl Adapter for ShellAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Shell
    }

    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        info!(id = %self.id, cwd = %self.working_dir.display(), "shell adapter ready");
        Ok(())
    }

    /// Connected and able to run a no-op command.
    async fn health_check(&self) -> Result<HealthStatus> {
        if !self.connected {
            return Ok(HealthStatus::Unhealthy);
        }
        Ok(match self.run("exit 0").await {
            Ok(check) if check.success() => HealthStatus::Healthy,
            _ => HealthStatus::Degraded,
        })
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<Value> {
        if !self.connected {
            return Err(AdapterError::NotConnected {
                adapter_id: self.id.clone(),
            });
        }
        if name != SHELL_EXECUTE {
            return Err(AdapterError::ToolNotFound {
                adapter_id: self.id.clone(),
                tool_name: name.to_string(),
            });
        }
        let command = string_param(&params, SHELL_EXECUTE, "command")?;
        Ok(serde_json::to_value(self.run(command).await?)?)
    }
}
