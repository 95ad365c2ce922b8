//! The [`Adapter`] trait and the types it exchanges.
//!
//! An adapter wraps one OS facility behind named tools taking and returning
//! JSON, so the kernel can hold shell and browser handles (or test fakes)
//! as `Box<dyn Adapter>` without knowing which is which.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdapterError, Result};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Which OS facility an adapter wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    Shell,
    Browser,
}

impl AdapterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Browser => "browser",
        }
    }
}

impl fmt::Display for AdapterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Adapter::health_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    /// Connected, but a test run of the backing program failed.
    Degraded,
    /// Not connected.
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract a required string field from tool parameters.
pub(crate) fn string_param<'a>(params: &'a Value, tool_name: &str, field: &str) -> Result<&'a str> {
    params
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::InvalidParams {
            tool_name: tool_name.to_string(),
            reason: format!("missing required string field `{field}`"),
        })
}

// ---------------------------------------------------------------------------
// Core trait
// ---------------------------------------------------------------------------

/// An OS facility exposed as named JSON tools.
///
/// Implementations refuse [`Adapter::execute_tool`] with
/// [`AdapterError::NotConnected`] until [`Adapter::connect`] has run.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn id(&self) -> &str;

    fn adapter_type(&self) -> AdapterType;

    async fn connect(&mut self) -> Result<()>;

    async fn health_check(&self) -> Result<HealthStatus>;

    /// Run the named tool; unknown names fail with
    /// [`AdapterError::ToolNotFound`].
    async fn execute_tool(&self, name: &str, params: Value) -> Result<Value>;
}
