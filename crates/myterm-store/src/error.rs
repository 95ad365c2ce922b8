//! Error types for the myterm-store crate.
//!
//! All workspace operations return [`StoreError`] via [`StoreResult`].
//! Uses `thiserror` for ergonomic, zero-cost error definitions.

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the account workspace.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A category name or entry title cannot be used as a file name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The category directory does not exist.
    #[error("category not found: {category}")]
    CategoryNotFound { category: String },

    /// The category still holds entries and cannot be removed.
    #[error("category not empty: {category}")]
    CategoryNotEmpty { category: String },

    /// No entry with this (normalized) title exists in the category.
    #[error("entry not found: {category}/{title}")]
    EntryNotFound { category: String, title: String },

    /// The alias is not defined.
    #[error("alias not found: {alias}")]
    AliasNotFound { alias: String },

    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
