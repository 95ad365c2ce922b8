//! Integration tests for the myterm-vault crate.
//!
//! These tests exercise the account lifecycle against a real `users.json`
//! on disk, including reopening the store from a second handle.

use myterm_vault::{AccountStore, VaultError};

fn open_in(dir: &tempfile::TempDir) -> AccountStore {
    AccountStore::open(dir.path().join("nested").join("users.json")).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
//  Account lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn register_then_authenticate_from_fresh_handle() {
    let dir = tempfile::tempdir().unwrap();

    open_in(&dir).register("alice", "correct horse").unwrap();

    // A second handle sees the persisted account.
    let store = open_in(&dir);
    let account = store.authenticate("alice", "correct horse").unwrap();
    assert_eq!(account.username(), "alice");

    let result = store.authenticate("alice", "battery staple");
    assert!(matches!(result, Err(VaultError::InvalidCredentials)));
}

#[test]
fn username_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_in(&dir);

    let account = store.register("  alice  ", "pw").unwrap();
    assert_eq!(account.username(), "alice");
    assert!(store.authenticate("alice", "pw").is_ok());
    assert!(matches!(
        store.register("alice", "other"),
        Err(VaultError::DuplicateAccount { .. })
    ));
}

#[test]
fn first_run_detection() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_in(&dir);

    assert!(store.is_empty().unwrap());
    store.register("alice", "pw").unwrap();
    assert!(!store.is_empty().unwrap());
}

// ═══════════════════════════════════════════════════════════════════════
//  PIN lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn pin_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let account = {
        let store = open_in(&dir);
        let account = store.register("alice", "pw").unwrap();
        store.set_pin(&account, None, Some("4321")).unwrap();
        account
    };

    let store = open_in(&dir);
    assert!(store.has_pin(&account).unwrap());
    assert!(store.verify_pin(&account, "4321").unwrap());
    assert!(!store.verify_pin(&account, "0000").unwrap());
}

#[test]
fn pins_are_per_account() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_in(&dir);

    let alice = store.register("alice", "pw").unwrap();
    let bob = store.register("bob", "pw").unwrap();
    store.set_pin(&alice, None, Some("1111")).unwrap();

    assert!(store.has_pin(&alice).unwrap());
    assert!(!store.has_pin(&bob).unwrap());

    let record = store.record(&bob).unwrap();
    assert!(record.pin_hash.is_none());
}

#[test]
fn corrupt_accounts_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_in(&dir);
    std::fs::write(store.path(), "{ not json").unwrap();

    assert!(matches!(
        store.register("alice", "pw"),
        Err(VaultError::Serialization(_))
    ));
}
