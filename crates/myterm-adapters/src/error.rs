//! Adapter error types.

/// Unified error type for myterm adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    // -- Tool dispatch ------------------------------------------------------
    /// `execute_tool` was called before `connect`.
    #[error("adapter `{adapter_id}` is not connected")]
    NotConnected { adapter_id: String },

    /// The adapter has no tool by this name.
    #[error("adapter `{adapter_id}` has no tool `{tool_name}`")]
    ToolNotFound {
        adapter_id: String,
        tool_name: String,
    },

    /// A required parameter is missing or has the wrong type.
    #[error("bad parameters for `{tool_name}`: {reason}")]
    InvalidParams { tool_name: String, reason: String },

    // -- Child processes ----------------------------------------------------
    /// The program could not be started at all.
    #[error("cannot start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure.
    #[error("`{tool_name}` failed: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    /// The program did not finish in time and was killed.
    #[error("timed out after {seconds}s: {reason}")]
    Timeout { seconds: u64, reason: String },

    // -- Wrapped ------------------------------------------------------------
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A tool result could not be converted to or from JSON.
    #[error("json error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, AdapterError>;
