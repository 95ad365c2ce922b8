//! Application directory layout.
//!
//! [`AppPaths`] is built once at startup and handed to every component, so
//! no module derives a path from the home directory on its own.

use std::path::{Path, PathBuf};

/// Application name; the default root is `~/.<lowercased name>`.
pub const APP_NAME: &str = "MyPersonalTerminal";

const USERS_FILE: &str = "users.json";
const HISTORY_FILE: &str = "history.txt";
const USERS_DIR: &str = "users";
const CONFIG_FILE: &str = "config.toml";

/// Resolved locations of every file myterm reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Lay out the application tree under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.mypersonalterminal`, or `None` when no home directory is known.
    pub fn default_root() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(format!(".{}", APP_NAME.to_lowercase())))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Credential store document.
    pub fn users_file(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    /// Command history, one line per command.
    pub fn history_file(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    /// Optional application settings.
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Parent of every account workspace.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join(USERS_DIR)
    }

    /// Workspace root of one account.
    pub fn user_root(&self, username: &str) -> PathBuf {
        self.users_dir().join(username)
    }

    /// Create the root directory if it does not exist.
    pub fn ensure_root(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_root() {
        let paths = AppPaths::new("/data/myterm");
        assert_eq!(paths.users_file(), PathBuf::from("/data/myterm/users.json"));
        assert_eq!(paths.history_file(), PathBuf::from("/data/myterm/history.txt"));
        assert_eq!(paths.config_file(), PathBuf::from("/data/myterm/config.toml"));
        assert_eq!(
            paths.user_root("alice"),
            PathBuf::from("/data/myterm/users/alice")
        );
    }

    #[test]
    fn ensure_root_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(dir.path().join("a").join("b"));
        paths.ensure_root().unwrap();
        assert!(paths.root().is_dir());
    }
}
