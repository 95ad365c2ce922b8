//! Web shortcut aliases.

use std::collections::BTreeMap;

/// Alias name → target URL (or any target string).
pub type AliasMap = BTreeMap<String, String>;

/// Aliases seeded into a new workspace.
pub const DEFAULT_ALIASES: [(&str, &str); 2] = [
    ("yt", "https://youtube.com"),
    ("gg", "https://google.com"),
];

/// Build the seed alias map.
pub fn default_aliases() -> AliasMap {
    DEFAULT_ALIASES
        .iter()
        .map(|(name, target)| (name.to_string(), target.to_string()))
        .collect()
}

/// Resolve `input` to an openable URL.
///
/// An alias name is replaced by its target; anything else is used as given.
/// Targets without an `http://` or `https://` scheme get `http://` prepended.
pub fn resolve_target(aliases: &AliasMap, input: &str) -> String {
    let input = input.trim();
    let target = aliases.get(input).map(String::as_str).unwrap_or(input);
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("http://{target}")
    }
}
