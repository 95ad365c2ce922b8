//! JSON-backed account credential store.
//!
//! The [`AccountStore`] owns the path of the global accounts record
//! (`users.json`). The record is a single JSON object:
//!
//! ```json
//! {
//!   "alice": { "password_hash": "5e88…", "pin_hash": null }
//! }
//! ```
//!
//! Every operation re-reads the whole file, and every mutation rewrites it.
//! There is no caching and no locking: one process is assumed to own the file
//! at a time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto;
use crate::error::{Result, VaultError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A persisted account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// SHA-256 hex digest of the password.
    pub password_hash: String,

    /// SHA-256 hex digest of the PIN. `None` means the account cannot lock.
    #[serde(default)]
    pub pin_hash: Option<String>,
}

/// Proof that an account was registered or authenticated in this process.
///
/// Only the credential store hands these out, so holding one means the
/// caller went through [`AccountStore::register`] or
/// [`AccountStore::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRef {
    username: String,
}

impl AccountRef {
    /// The account's unique username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

type AccountMap = BTreeMap<String, AccountRecord>;

// ---------------------------------------------------------------------------
// AccountStore
// ---------------------------------------------------------------------------

/// Credential store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    /// Open (or prepare) the accounts record at `path`.
    ///
    /// The parent directory is created if missing; the file itself is only
    /// written on the first registration.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "account store ready");
        Ok(Self { path })
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // -- Account lifecycle --------------------------------------------------

    /// Create a new account with a hashed password and no PIN.
    ///
    /// Leading and trailing whitespace is stripped from the username.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidInput`] if the username or password is
    /// empty or the username is not a single path component, or
    /// [`VaultError::DuplicateAccount`] if the username is taken.
    pub fn register(&self, username: &str, password: &str) -> Result<AccountRef> {
        let username = username.trim();
        validate_username(username)?;
        if password.is_empty() {
            return Err(VaultError::InvalidInput {
                reason: "password cannot be empty".into(),
            });
        }

        let mut accounts = self.load()?;
        if accounts.contains_key(username) {
            return Err(VaultError::DuplicateAccount {
                username: username.to_string(),
            });
        }

        accounts.insert(
            username.to_string(),
            AccountRecord {
                password_hash: crypto::hash_secret(password),
                pin_hash: None,
            },
        );
        self.save(&accounts)?;

        tracing::info!(username = username, "account registered");
        Ok(AccountRef {
            username: username.to_string(),
        })
    }

    /// Check a username/password pair.
    ///
    /// Attempt throttling is the caller's job; this method only compares
    /// hashes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidCredentials`] if the username is unknown
    /// or the password hash does not match.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AccountRef> {
        let username = username.trim();
        let accounts = self.load()?;

        match accounts.get(username) {
            Some(record) if crypto::verify_secret(password, &record.password_hash) => {
                tracing::info!(username = username, "account authenticated");
                Ok(AccountRef {
                    username: username.to_string(),
                })
            }
            _ => {
                tracing::warn!(username = username, "authentication failed");
                Err(VaultError::InvalidCredentials)
            }
        }
    }

    /// Fetch the stored record for an account.
    pub fn record(&self, account: &AccountRef) -> Result<AccountRecord> {
        self.load()?
            .remove(account.username())
            .ok_or_else(|| VaultError::AccountNotFound {
                username: account.username.clone(),
            })
    }

    /// List all registered usernames in lexicographic order.
    pub fn list_accounts(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }

    /// Returns `true` if no account has been registered yet.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load()?.is_empty())
    }

    // -- PIN management -----------------------------------------------------

    /// Returns `true` if the account has a PIN and can therefore lock.
    pub fn has_pin(&self, account: &AccountRef) -> Result<bool> {
        Ok(self.record(account)?.pin_hash.is_some())
    }

    /// Compare `pin` against the account's PIN hash.
    ///
    /// Always `false` when the account has no PIN.
    pub fn verify_pin(&self, account: &AccountRef, pin: &str) -> Result<bool> {
        Ok(self
            .record(account)?
            .pin_hash
            .is_some_and(|hash| crypto::verify_secret(pin, &hash)))
    }

    /// Set, change or clear the account's PIN.
    ///
    /// When a PIN already exists, `old_pin` must match it. `new_pin = None`
    /// clears the PIN.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::IncorrectPin`] if a PIN exists and `old_pin` is
    /// missing or wrong, and [`VaultError::InvalidPin`] if `new_pin` is not
    /// 4 to 8 decimal digits. Nothing is written on error.
    pub fn set_pin(
        &self,
        account: &AccountRef,
        old_pin: Option<&str>,
        new_pin: Option<&str>,
    ) -> Result<()> {
        let mut accounts = self.load()?;
        let record = accounts
            .get_mut(account.username())
            .ok_or_else(|| VaultError::AccountNotFound {
                username: account.username.clone(),
            })?;

        if let Some(current) = &record.pin_hash {
            let matches = old_pin.is_some_and(|old| crypto::verify_secret(old, current));
            if !matches {
                tracing::warn!(username = %account, "PIN change rejected: incorrect old PIN");
                return Err(VaultError::IncorrectPin);
            }
        }

        record.pin_hash = match new_pin {
            Some(pin) if crypto::is_valid_pin(pin) => Some(crypto::hash_secret(pin)),
            Some(_) => return Err(VaultError::InvalidPin),
            None => None,
        };
        let cleared = record.pin_hash.is_none();
        self.save(&accounts)?;

        tracing::info!(username = %account, cleared = cleared, "PIN updated");
        Ok(())
    }

    // -- Internal helpers ---------------------------------------------------

    /// Read the whole accounts record. A missing file is an empty record.
    fn load(&self) -> Result<AccountMap> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(AccountMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AccountMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the whole accounts record.
    fn save(&self, accounts: &AccountMap) -> Result<()> {
        let json = serde_json::to_string_pretty(accounts)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Check that a username can name the account's workspace directory: a
/// single path component that is neither `.` nor `..`.
///
/// # Errors
///
/// Returns [`VaultError::InvalidInput`] describing the problem.
pub fn validate_username(username: &str) -> Result<()> {
    let reason = if username.is_empty() {
        "username cannot be empty"
    } else if username == "." || username == ".." {
        "username cannot be `.` or `..`"
    } else if username.contains(['/', '\\']) {
        "username cannot contain path separators"
    } else {
        return Ok(());
    };
    Err(VaultError::InvalidInput {
        reason: reason.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, AccountStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::open(dir.path().join("users.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn register_and_authenticate() {
        let (_dir, store) = test_store();

        let account = store.register("alice", "hunter2").unwrap();
        assert_eq!(account.username(), "alice");

        let again = store.authenticate("alice", "hunter2").unwrap();
        assert_eq!(again, account);
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let (_dir, store) = test_store();
        store.register("alice", "hunter2").unwrap();

        let result = store.authenticate("alice", "hunter3");
        assert!(matches!(result, Err(VaultError::InvalidCredentials)));
    }

    #[test]
    fn unknown_user_is_invalid_credentials() {
        let (_dir, store) = test_store();
        let result = store.authenticate("nobody", "pw");
        assert!(matches!(result, Err(VaultError::InvalidCredentials)));
    }

    #[test]
    fn duplicate_username_rejected() {
        let (_dir, store) = test_store();
        store.register("alice", "one").unwrap();

        let result = store.register("alice", "two");
        assert!(matches!(result, Err(VaultError::DuplicateAccount { .. })));
    }

    #[test]
    fn empty_username_or_password_rejected() {
        let (_dir, store) = test_store();
        assert!(matches!(
            store.register("   ", "pw"),
            Err(VaultError::InvalidInput { .. })
        ));
        assert!(matches!(
            store.register("bob", ""),
            Err(VaultError::InvalidInput { .. })
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn path_like_usernames_rejected() {
        let (_dir, store) = test_store();
        for name in ["..", ".", "../../escaped", "a/b", "a\\b", " .. "] {
            assert!(
                matches!(store.register(name, "pw"), Err(VaultError::InvalidInput { .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(store.is_empty().unwrap());
        store.register("a.b", "pw").unwrap();
    }

    #[test]
    fn new_account_has_no_pin() {
        let (_dir, store) = test_store();
        let account = store.register("alice", "pw").unwrap();
        assert!(!store.has_pin(&account).unwrap());
        assert!(!store.verify_pin(&account, "1234").unwrap());
    }

    #[test]
    fn set_change_and_clear_pin() {
        let (_dir, store) = test_store();
        let account = store.register("alice", "pw").unwrap();

        store.set_pin(&account, None, Some("1234")).unwrap();
        assert!(store.verify_pin(&account, "1234").unwrap());

        // Changing requires the old PIN.
        let result = store.set_pin(&account, Some("9999"), Some("5678"));
        assert!(matches!(result, Err(VaultError::IncorrectPin)));
        let result = store.set_pin(&account, None, Some("5678"));
        assert!(matches!(result, Err(VaultError::IncorrectPin)));
        assert!(store.verify_pin(&account, "1234").unwrap());

        store.set_pin(&account, Some("1234"), Some("5678")).unwrap();
        assert!(store.verify_pin(&account, "5678").unwrap());

        store.set_pin(&account, Some("5678"), None).unwrap();
        assert!(!store.has_pin(&account).unwrap());
    }

    #[test]
    fn invalid_new_pin_leaves_record_untouched() {
        let (_dir, store) = test_store();
        let account = store.register("alice", "pw").unwrap();

        for bad in ["123", "123456789", "12ab"] {
            let result = store.set_pin(&account, None, Some(bad));
            assert!(matches!(result, Err(VaultError::InvalidPin)), "{bad}");
        }
        assert!(!store.has_pin(&account).unwrap());
    }

    #[test]
    fn record_is_persisted_as_hashes() {
        let (_dir, store) = test_store();
        let account = store.register("alice", "hunter2").unwrap();
        store.set_pin(&account, None, Some("1234")).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            json["alice"]["password_hash"],
            crypto::hash_secret("hunter2").as_str()
        );
        assert_eq!(json["alice"]["pin_hash"], crypto::hash_secret("1234").as_str());
        assert!(!raw.contains("hunter2"));
    }

    #[test]
    fn list_accounts_is_sorted() {
        let (_dir, store) = test_store();
        store.register("carol", "pw").unwrap();
        store.register("alice", "pw").unwrap();
        assert_eq!(store.list_accounts().unwrap(), vec!["alice", "carol"]);
    }
}
