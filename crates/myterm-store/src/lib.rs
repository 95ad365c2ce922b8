//! # myterm-store
//!
//! Per-account workspace for myterm.
//!
//! Every account owns a directory tree of plain files. Nothing is cached in
//! memory: each query reads from disk and each mutation rewrites a whole file.
//!
//! ## Layout
//!
//! ```text
//! users/<username>/
//! ├── config.json          preferences {theme, prompt, banner}
//! ├── web_shortcuts.json   aliases {name: target}
//! └── data/
//!     ├── notes/
//!     │   └── My_Title.txt  body + footer
//!     ├── contacts/
//!     ├── passwords/
//!     └── projects/
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use myterm_store::Workspace;
//!
//! let ws = Workspace::new("/home/me/.mypersonalterminal/users/alice", "alice");
//! ws.init()?;
//! ws.save_entry("notes", "Groceries", "milk, eggs")?;
//! for name in ws.search("notes", "EGGS")? {
//!     println!("{name}");
//! }
//! ```

pub mod aliases;
pub mod entry;
pub mod error;
pub mod files;
pub mod preferences;
pub mod workspace;

// ── re-exports ───────────────────────────────────────────────────────

pub use aliases::{AliasMap, resolve_target};
pub use entry::{EntryNames, SavedEntry, SearchHits, normalize_title};
pub use error::{StoreError, StoreResult};
pub use preferences::{Preferences, Theme};
pub use workspace::{DEFAULT_CATEGORIES, PLAINTEXT_CATEGORY, Workspace};
