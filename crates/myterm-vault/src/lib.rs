//! Account credential store for myterm.
//!
//! This crate owns the global accounts record: a single JSON document mapping
//! each username to its password hash and optional PIN hash. It knows nothing
//! about workspaces or sessions; callers receive an [`AccountRef`] on
//! successful registration or authentication and pass it back for PIN
//! management.
//!
//! # Modules
//!
//! - [`crypto`] -- SHA-256 secret hashing and PIN format validation.
//! - [`store`] -- JSON-backed account CRUD.
//! - [`error`] -- Unified error types.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use myterm_vault::AccountStore;
//!
//! # fn example() -> myterm_vault::Result<()> {
//! let accounts = AccountStore::open("/home/me/.mypersonalterminal/users.json")?;
//!
//! let alice = accounts.register("alice", "hunter2")?;
//! accounts.set_pin(&alice, None, Some("1234"))?;
//!
//! let again = accounts.authenticate("alice", "hunter2")?;
//! assert!(accounts.verify_pin(&again, "1234")?);
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod store;

// Re-export the most commonly used types at the crate root for convenience.
pub use error::{Result, VaultError};
pub use store::{AccountRecord, AccountRef, AccountStore, validate_username};
