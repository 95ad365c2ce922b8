//! Kernel error types.
//!
//! Session and dispatcher APIs surface errors through [`KernelError`]. Errors
//! from the lower crates are wrapped transparently so the dispatcher can
//! match on the original variant when rendering a reply.

use myterm_adapters::AdapterError;
use myterm_calc::CalcError;
use myterm_store::StoreError;
use myterm_vault::VaultError;

/// Unified error type for the myterm kernel.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    // -- Command errors -----------------------------------------------------
    /// A command was invoked with missing or malformed arguments.
    #[error("usage: {usage}")]
    InvalidInput { usage: String },

    // -- Session errors -----------------------------------------------------
    /// The session is locked; only a PIN unlock is accepted.
    #[error("session is locked")]
    SessionLocked,

    /// No account is logged in.
    #[error("not logged in")]
    NotAuthenticated,

    /// `lock` or `clearpin` was requested but the account has no PIN.
    #[error("no PIN set")]
    NoPinSet,

    /// The login retry policy has been used up; the session is terminated.
    #[error("too many failed login attempts")]
    LoginAttemptsExhausted,

    /// The unlock retry policy has been used up; the session is terminated.
    #[error("too many failed unlock attempts")]
    UnlockAttemptsExhausted,

    /// The requested operation is not valid in the current session state.
    #[error("cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    // -- Wrapped errors -----------------------------------------------------
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Reading an interactive answer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl KernelError {
    pub(crate) fn usage(usage: &str) -> Self {
        Self::InvalidInput {
            usage: usage.to_string(),
        }
    }
}

/// Convenience alias used throughout the kernel crate.
pub type Result<T> = std::result::Result<T, KernelError>;
