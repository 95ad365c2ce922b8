//! Per-account appearance preferences.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Default prompt text for a new workspace.
pub const DEFAULT_PROMPT: &str = "myterm> ";

/// Display theme identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Hacker,
}

impl Theme {
    /// Every selectable theme, in display order.
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Hacker];

    /// The identifier stored in `config.json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Hacker => "hacker",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = StoreError;

    /// Case-insensitive parse of a theme identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "hacker" => Ok(Self::Hacker),
            other => Err(StoreError::InvalidInput(format!("unknown theme: {other}"))),
        }
    }
}

/// The `config.json` record of a workspace.
///
/// Missing fields fall back to their defaults, so older or hand-edited files
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub prompt: String,
    pub banner: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            prompt: DEFAULT_PROMPT.to_string(),
            banner: true,
        }
    }
}
