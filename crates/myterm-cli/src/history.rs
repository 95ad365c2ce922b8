//! Command history file.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Appends each command line to `history.txt`.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
    enabled: bool,
}

impl History {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `line`. Blank lines and a disabled history are skipped.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let line = line.trim();
        if !self.enabled || line.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_trimmed_non_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("history.txt"), true);
        history.append("  now ").unwrap();
        history.append("   ").unwrap();
        history.append("calc 1+1").unwrap();

        let text = std::fs::read_to_string(history.path()).unwrap();
        assert_eq!(text, "now\ncalc 1+1\n");
    }

    #[test]
    fn disabled_history_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("history.txt"), false);
        history.append("now").unwrap();
        assert!(!history.path().exists());
    }
}
