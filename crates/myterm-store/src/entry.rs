//! Entry naming, file format and lazy listings.
//!
//! An entry is one `.txt` file inside a category directory. Its file name is
//! the normalized title; its content is the body followed by a metadata
//! footer:
//!
//! ```text
//! milk, eggs
//!
//! ---
//! Saved on: 2024-05-01 09:30:00
//! Title: Groceries  list
//! Category: notes
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// File extension of entry files.
pub const ENTRY_EXTENSION: &str = "txt";

/// Timestamp format used in the footer.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Collapse all whitespace runs in `title` into single `_` separators.
///
/// `"  My   Title "` → `"My_Title"`.
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Reject names that would escape their parent directory or are empty.
pub(crate) fn validate_component(kind: &str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidInput(format!("{kind} cannot be empty")));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidInput(format!(
            "{kind} `{name}` cannot contain path separators"
        )));
    }
    Ok(())
}

/// File name for a title: normalized title plus `.txt`.
pub(crate) fn entry_file_name(title: &str) -> StoreResult<String> {
    let normalized = normalize_title(title);
    validate_component("title", &normalized)?;
    Ok(format!("{normalized}.{ENTRY_EXTENSION}"))
}

/// Render the stored representation of an entry.
pub(crate) fn render_entry(
    content: &str,
    title: &str,
    category: &str,
    saved_at: DateTime<Local>,
) -> String {
    format!(
        "{}\n\n---\nSaved on: {}\nTitle: {}\nCategory: {}\n",
        content.trim_end(),
        saved_at.format(TIMESTAMP_FORMAT),
        title,
        category
    )
}

/// Returns `true` if `path` looks like an entry file.
pub(crate) fn is_entry_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
}

/// Sorted list of entry files in `dir`.
pub(crate) fn entry_paths(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for dir_entry in std::fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if is_entry_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a successful save or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEntry {
    /// Category the entry lives in.
    pub category: String,
    /// Entry file name (`My_Title.txt`).
    pub file_name: String,
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Set when the entry landed in the reserved `passwords` category, whose
    /// contents are stored as plain text.
    pub plaintext_warning: bool,
}

impl SavedEntry {
    /// `category/file_name`, as shown to the operator.
    pub fn display_path(&self) -> String {
        format!("{}/{}", self.category, self.file_name)
    }
}

/// Lazy, restartable sequence of entry file names in a category.
///
/// The directory is scanned once when the listing is created; cloning the
/// iterator restarts it from the first name.
#[derive(Debug, Clone)]
pub struct EntryNames {
    paths: std::vec::IntoIter<PathBuf>,
}

impl EntryNames {
    pub(crate) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
        }
    }
}

impl Iterator for EntryNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.paths.next().map(|p| file_name_of(&p))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

/// Lazy sequence of entry file names whose content contains a keyword.
///
/// Each file is read only when the iterator reaches it. Files that cannot be
/// read (permissions, invalid UTF-8) are skipped.
#[derive(Debug, Clone)]
pub struct SearchHits {
    paths: std::vec::IntoIter<PathBuf>,
    needle: String,
}

impl SearchHits {
    pub(crate) fn new(paths: Vec<PathBuf>, keyword: &str) -> Self {
        Self {
            paths: paths.into_iter(),
            needle: keyword.to_lowercase(),
        }
    }
}

impl Iterator for SearchHits {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for path in self.paths.by_ref() {
            match std::fs::read_to_string(&path) {
                Ok(text) if text.to_lowercase().contains(&self.needle) => {
                    return Some(file_name_of(&path));
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_title("My Title"), "My_Title");
        assert_eq!(normalize_title("  my   title\t"), "my_title");
        assert_eq!(normalize_title("one"), "one");
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn file_name_rejects_separators_and_empty() {
        assert_eq!(entry_file_name("a b").unwrap(), "a_b.txt");
        assert!(entry_file_name("   ").is_err());
        assert!(entry_file_name("../etc/passwd").is_err());
        assert!(entry_file_name("a\\b").is_err());
        assert!(entry_file_name("..").is_err());
    }

    #[test]
    fn render_appends_footer() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let text = render_entry("milk, eggs\n\n", "Groceries  list", "notes", at);
        assert_eq!(
            text,
            "milk, eggs\n\n---\nSaved on: 2024-05-01 09:30:00\nTitle: Groceries  list\nCategory: notes\n"
        );
    }

    #[test]
    fn search_hits_skip_non_matching_and_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let hit = dir.path().join("a.txt");
        let miss = dir.path().join("b.txt");
        let binary = dir.path().join("c.txt");
        std::fs::write(&hit, "Hello there").unwrap();
        std::fs::write(&miss, "nothing").unwrap();
        std::fs::write(&binary, [0xff, 0xfe, 0xfd]).unwrap();

        let hits: Vec<String> =
            SearchHits::new(vec![hit, miss, binary], "HELLO").collect();
        assert_eq!(hits, vec!["a.txt"]);
    }

    #[test]
    fn entry_names_restart_on_clone() {
        let names = EntryNames::new(vec![PathBuf::from("/x/a.txt"), PathBuf::from("/x/b.txt")]);
        let first: Vec<String> = names.clone().collect();
        let second: Vec<String> = names.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a.txt", "b.txt"]);
    }
}
