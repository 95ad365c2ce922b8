//! Secret hashing using the `ring` crate.
//!
//! Passwords and PINs are stored as the lowercase hex SHA-256 digest of their
//! UTF-8 bytes. The digest is unsalted and unkeyed, so equal secrets always
//! produce equal hashes and verification is a plain digest comparison.
//!
//! # Security Notes
//!
//! - An unsalted fast hash does not resist offline dictionary attacks against
//!   a stolen `users.json`. Stored records are not encrypted either; the
//!   accounts file only keeps secrets out of plain sight.
//! - Moving to a salted KDF (PBKDF2 via `ring::pbkdf2`) requires a record
//!   format change and a migration of existing hashes.

use ring::digest;

/// Minimum number of digits in a PIN.
pub const PIN_MIN_DIGITS: usize = 4;

/// Maximum number of digits in a PIN.
pub const PIN_MAX_DIGITS: usize = 8;

/// Hash `secret` with SHA-256 and return the lowercase hex digest.
pub fn hash_secret(secret: &str) -> String {
    let hash = digest::digest(&digest::SHA256, secret.as_bytes());
    hash.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}

/// Check `secret` against a digest previously produced by [`hash_secret`].
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    hash_secret(secret) == stored_hash
}

/// Returns `true` if `pin` is 4 to 8 ASCII decimal digits.
pub fn is_valid_pin(pin: &str) -> bool {
    (PIN_MIN_DIGITS..=PIN_MAX_DIGITS).contains(&pin.len())
        && pin.bytes().all(|b| b.is_ascii_digit())
}
