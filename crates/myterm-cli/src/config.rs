//! Startup configuration.
//!
//! Settings are resolved in this order, later sources winning:
//!
//! 1. built-in defaults
//! 2. `<root>/config.toml`
//! 3. `MYTERM_HOME`, `MYTERM_LOG`, `MYTERM_SHELL_TIMEOUT`
//! 4. the `--home` flag
//!
//! The bootstrap root (where `config.toml` is looked up) is `--home`, then
//! `MYTERM_HOME`, then `~/.mypersonalterminal`. A `root` key in the file
//! relocates the data directory unless the flag or environment set one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use myterm_adapters::shell::DEFAULT_TIMEOUT_SECS;
use myterm_kernel::{AppPaths, DEFAULT_MAX_LOGIN_ATTEMPTS, SessionConfig};

pub const ENV_HOME: &str = "MYTERM_HOME";
pub const ENV_LOG: &str = "MYTERM_LOG";
pub const ENV_SHELL_TIMEOUT: &str = "MYTERM_SHELL_TIMEOUT";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Data directory override.
    pub root: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Consecutive failed logins before the program exits.
    pub max_login_attempts: u32,
    /// Timeout for commands passed through to the system shell.
    pub shell_timeout_secs: u64,
    /// Append each command line to `history.txt`.
    pub history: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: None,
            log_level: "warn".into(),
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            shell_timeout_secs: DEFAULT_TIMEOUT_SECS,
            history: true,
        }
    }
}

impl AppConfig {
    /// Read `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(home) = lookup(ENV_HOME) {
            self.root = Some(PathBuf::from(home));
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        if let Some(secs) = lookup(ENV_SHELL_TIMEOUT) {
            self.shell_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SHELL_TIMEOUT} must be a number of seconds, got {secs:?}"))?;
        }
        Ok(())
    }

    /// Retry policies for the session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default().with_max_login_attempts(self.max_login_attempts)
    }
}

/// Resolve the configuration and directory layout for this run.
pub fn resolve(
    home_flag: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(AppConfig, AppPaths)> {
    let bootstrap = home_flag
        .clone()
        .or_else(|| lookup(ENV_HOME).map(PathBuf::from))
        .or_else(AppPaths::default_root)
        .context("cannot determine a home directory; pass --home <DIR>")?;

    let mut config = AppConfig::load(&AppPaths::new(&bootstrap).config_file())?;
    config.apply_env(&lookup)?;
    if home_flag.is_some() {
        config.root = home_flag;
    }

    let root = config.root.clone().unwrap_or(bootstrap);
    Ok((config, AppPaths::new(root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.max_login_attempts, 5);
        assert_eq!(config.shell_timeout_secs, 30);
        assert!(config.history);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_login_attempts = 3\nhistory = false\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.max_login_attempts, 3);
        assert!(!config.history);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "history = maybe").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn env_overrides_file() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[(ENV_LOG, "debug"), (ENV_SHELL_TIMEOUT, " 5 ")]))
            .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.shell_timeout_secs, 5);

        let bad = AppConfig::default().apply_env(env(&[(ENV_SHELL_TIMEOUT, "soon")]));
        assert!(bad.is_err());
    }

    #[test]
    fn flag_beats_env_and_file() {
        let flag_dir = tempfile::tempdir().unwrap();
        let env_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            flag_dir.path().join("config.toml"),
            "shell_timeout_secs = 7\nroot = \"/elsewhere\"\n",
        )
        .unwrap();

        let (config, paths) = resolve(
            Some(flag_dir.path().to_path_buf()),
            env(&[(ENV_HOME, env_dir.path().to_str().unwrap())]),
        )
        .unwrap();
        assert_eq!(paths.root(), flag_dir.path());
        assert_eq!(config.shell_timeout_secs, 7);
    }

    #[test]
    fn env_home_is_where_the_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "shell_timeout_secs = 9\n").unwrap();

        let (config, paths) =
            resolve(None, env(&[(ENV_HOME, dir.path().to_str().unwrap())])).unwrap();
        assert_eq!(paths.root(), dir.path());
        assert_eq!(config.shell_timeout_secs, 9);
    }

    #[test]
    fn session_config_uses_login_limit() {
        let config = AppConfig {
            max_login_attempts: 2,
            ..AppConfig::default()
        };
        assert!(config.session_config().login.allows(1));
        assert!(!config.session_config().login.allows(2));
    }
}
