//! Vault error types.
//!
//! All credential store operations surface errors through [`VaultError`].
//! Authentication failures are deliberately coarse: an unknown username and a
//! wrong password both map to [`VaultError::InvalidCredentials`].

/// Unified error type for the account credential store.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    // -- Input errors -------------------------------------------------------
    /// A username or password was empty or otherwise malformed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    // -- Account errors -----------------------------------------------------
    /// An account with this username already exists.
    #[error("account already exists: {username}")]
    DuplicateAccount { username: String },

    /// The username is unknown or the password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An [`AccountRef`](crate::AccountRef) points at an account that is no
    /// longer present in the accounts record.
    #[error("account not found: {username}")]
    AccountNotFound { username: String },

    // -- PIN errors ---------------------------------------------------------
    /// The supplied PIN does not match the stored PIN hash.
    #[error("incorrect PIN")]
    IncorrectPin,

    /// The new PIN is not 4 to 8 decimal digits.
    #[error("invalid PIN: use 4-8 digits")]
    InvalidPin,

    // -- Underlying errors --------------------------------------------------
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;
