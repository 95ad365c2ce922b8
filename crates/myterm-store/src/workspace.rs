//! The per-account workspace: categories, entries, preferences and aliases.
//!
//! A [`Workspace`] is a thin handle over an account's root directory. It holds
//! no state besides paths, so two handles on the same root always agree.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, instrument, warn};

use crate::aliases::{self, AliasMap};
use crate::entry::{self, EntryNames, SavedEntry, SearchHits};
use crate::error::{StoreError, StoreResult};
use crate::files;
use crate::preferences::Preferences;

/// Categories created for every new workspace.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["notes", "contacts", "passwords", "projects"];

/// Reserved category whose entries trigger a plain-text storage advisory.
pub const PLAINTEXT_CATEGORY: &str = "passwords";

const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";
const ALIASES_FILE: &str = "web_shortcuts.json";

/// Handle on one account's workspace directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    username: String,
    root: PathBuf,
}

impl Workspace {
    /// Create a handle rooted at `root` (typically `<app>/users/<username>`).
    ///
    /// Nothing is touched on disk until [`Workspace::init`] or a mutation.
    pub fn new(root: impl Into<PathBuf>, username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            root: root.into(),
        }
    }

    /// Owner of this workspace.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    fn aliases_path(&self) -> PathBuf {
        self.root.join(ALIASES_FILE)
    }

    /// Create default categories, preferences and aliases where absent.
    ///
    /// Idempotent: existing categories, `config.json` and
    /// `web_shortcuts.json` are never overwritten.
    #[instrument(skip(self), fields(username = %self.username))]
    pub fn init(&self) -> StoreResult<()> {
        let data = self.data_dir();
        for category in DEFAULT_CATEGORIES {
            std::fs::create_dir_all(data.join(category))?;
        }

        let config = self.config_path();
        if !config.exists() {
            files::save_json(&config, &Preferences::default())?;
            debug!(path = %config.display(), "default preferences written");
        }

        let shortcuts = self.aliases_path();
        if !shortcuts.exists() {
            files::save_json(&shortcuts, &aliases::default_aliases())?;
            debug!(path = %shortcuts.display(), "default aliases written");
        }

        info!("workspace initialized");
        Ok(())
    }

    // ── categories ───────────────────────────────────────────────────

    /// Category names in lexicographic order.
    pub fn list_categories(&self) -> StoreResult<Vec<String>> {
        let data = self.data_dir();
        if !data.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for dir_entry in std::fs::read_dir(&data)? {
            let dir_entry = dir_entry?;
            if dir_entry.file_type()?.is_dir() {
                names.push(dir_entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns `true` if the category directory exists.
    pub fn has_category(&self, name: &str) -> bool {
        self.category_path(name).is_ok_and(|dir| dir.is_dir())
    }

    /// Create an empty category. Adding an existing category is a no-op.
    pub fn add_category(&self, name: &str) -> StoreResult<()> {
        let dir = self.category_path(name)?;
        std::fs::create_dir_all(&dir)?;
        info!(username = %self.username, category = name.trim(), "category added");
        Ok(())
    }

    /// Remove an empty category.
    ///
    /// # Errors
    ///
    /// [`StoreError::CategoryNotFound`] if it does not exist,
    /// [`StoreError::CategoryNotEmpty`] if it holds any file.
    pub fn remove_category(&self, name: &str) -> StoreResult<()> {
        let dir = self.existing_category(name)?;
        if std::fs::read_dir(&dir)?.next().is_some() {
            return Err(StoreError::CategoryNotEmpty {
                category: name.to_string(),
            });
        }
        std::fs::remove_dir(&dir)?;
        info!(username = %self.username, category = name, "category removed");
        Ok(())
    }

    fn category_path(&self, name: &str) -> StoreResult<PathBuf> {
        let name = name.trim();
        entry::validate_component("category", name)?;
        Ok(self.data_dir().join(name))
    }

    fn existing_category(&self, name: &str) -> StoreResult<PathBuf> {
        let dir = self.category_path(name)?;
        if !dir.is_dir() {
            return Err(StoreError::CategoryNotFound {
                category: name.to_string(),
            });
        }
        Ok(dir)
    }

    // ── entries ──────────────────────────────────────────────────────

    /// Locate the file for `title`: exact normalized name first, then a
    /// case-insensitive match among existing entries.
    fn resolve_entry(&self, dir: &Path, title: &str) -> StoreResult<Option<PathBuf>> {
        let file_name = entry::entry_file_name(title)?;
        let exact = dir.join(&file_name);
        if exact.is_file() {
            return Ok(Some(exact));
        }

        let wanted = file_name.to_lowercase();
        Ok(entry::entry_paths(dir)?.into_iter().find(|path| {
            path.file_name()
                .is_some_and(|n| n.to_string_lossy().to_lowercase() == wanted)
        }))
    }

    fn require_entry(&self, category: &str, title: &str) -> StoreResult<PathBuf> {
        let dir = self.existing_category(category)?;
        self.resolve_entry(&dir, title)?
            .ok_or_else(|| StoreError::EntryNotFound {
                category: category.to_string(),
                title: entry::normalize_title(title),
            })
    }

    /// Create or overwrite an entry.
    ///
    /// # Errors
    ///
    /// [`StoreError::CategoryNotFound`] if the category does not exist,
    /// [`StoreError::InvalidInput`] if the title is blank or contains path
    /// separators.
    pub fn save_entry(&self, category: &str, title: &str, content: &str) -> StoreResult<SavedEntry> {
        self.save_entry_at(category, title, content, Local::now())
    }

    /// [`Workspace::save_entry`] with an explicit footer timestamp.
    pub fn save_entry_at(
        &self,
        category: &str,
        title: &str,
        content: &str,
        saved_at: DateTime<Local>,
    ) -> StoreResult<SavedEntry> {
        let dir = self.existing_category(category)?;
        let path = match self.resolve_entry(&dir, title)? {
            Some(existing) => existing,
            None => dir.join(entry::entry_file_name(title)?),
        };

        let body = entry::render_entry(content, title, category, saved_at);
        std::fs::write(&path, body)?;

        let plaintext_warning = category == PLAINTEXT_CATEGORY;
        if plaintext_warning {
            warn!(username = %self.username, "entry saved unencrypted in passwords category");
        }

        let saved = SavedEntry {
            category: category.to_string(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path,
            plaintext_warning,
        };
        info!(username = %self.username, entry = %saved.display_path(), "entry saved");
        Ok(saved)
    }

    /// Full stored text of an entry, footer included.
    pub fn view_entry(&self, category: &str, title: &str) -> StoreResult<String> {
        let path = self.require_entry(category, title)?;
        Ok(std::fs::read_to_string(path)?)
    }

    /// File names of every entry in a category, sorted.
    pub fn view_all(&self, category: &str) -> StoreResult<EntryNames> {
        let dir = self.existing_category(category)?;
        Ok(EntryNames::new(entry::entry_paths(&dir)?))
    }

    /// Delete an entry and return its file name.
    pub fn delete_entry(&self, category: &str, title: &str) -> StoreResult<String> {
        let path = self.require_entry(category, title)?;
        std::fs::remove_file(&path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(username = %self.username, category = category, entry = %file_name, "entry deleted");
        Ok(file_name)
    }

    /// Replace the content of an existing entry.
    ///
    /// Unlike [`Workspace::save_entry`], the entry must already exist.
    pub fn edit_entry(&self, category: &str, title: &str, new_content: &str) -> StoreResult<SavedEntry> {
        self.require_entry(category, title)?;
        self.save_entry(category, title, new_content)
    }

    /// Entries whose full text contains `keyword`, ignoring case.
    pub fn search(&self, category: &str, keyword: &str) -> StoreResult<SearchHits> {
        let dir = self.existing_category(category)?;
        Ok(SearchHits::new(entry::entry_paths(&dir)?, keyword))
    }

    // ── aliases ──────────────────────────────────────────────────────

    /// All aliases, sorted by name.
    pub fn get_aliases(&self) -> AliasMap {
        files::load_json_or(&self.aliases_path(), AliasMap::new())
    }

    /// Define or replace an alias.
    pub fn set_alias(&self, name: &str, target: &str) -> StoreResult<()> {
        let mut aliases = self.get_aliases();
        aliases.insert(name.to_string(), target.to_string());
        files::save_json(&self.aliases_path(), &aliases)?;
        info!(username = %self.username, alias = name, target = target, "alias saved");
        Ok(())
    }

    /// Remove an alias.
    pub fn delete_alias(&self, name: &str) -> StoreResult<()> {
        let mut aliases = self.get_aliases();
        if aliases.remove(name).is_none() {
            return Err(StoreError::AliasNotFound {
                alias: name.to_string(),
            });
        }
        files::save_json(&self.aliases_path(), &aliases)?;
        info!(username = %self.username, alias = name, "alias deleted");
        Ok(())
    }

    /// Resolve an alias or raw target to an openable URL.
    pub fn resolve_alias(&self, target: &str) -> String {
        aliases::resolve_target(&self.get_aliases(), target)
    }

    // ── preferences ──────────────────────────────────────────────────

    /// Current preferences, or defaults if `config.json` is missing or
    /// unreadable.
    pub fn get_preferences(&self) -> Preferences {
        files::load_json_or(&self.config_path(), Preferences::default())
    }

    /// Persist preferences.
    pub fn save_preferences(&self, preferences: &Preferences) -> StoreResult<()> {
        files::save_json(&self.config_path(), preferences)?;
        debug!(username = %self.username, theme = %preferences.theme, "preferences saved");
        Ok(())
    }
}
