//! Whole-file JSON helpers.
//!
//! Reads are forgiving: a missing or unparsable file yields the caller's
//! default so a hand-edited config never locks the operator out. Writes
//! replace the entire file.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::StoreResult;

/// Load a JSON document, falling back to `default` if it is missing or
/// cannot be parsed.
pub fn load_json_or<T: DeserializeOwned>(path: &Path, default: T) -> T {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return default,
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable json, using defaults");
            default
        }
    }
}

/// Pretty-print `value` as JSON and replace `path` with it, creating parent
/// directories as needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
