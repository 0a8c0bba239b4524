//! Runtime configuration, resolved from the environment.

use std::path::PathBuf;

use crate::state::prefs::{FAVORITES_KEY, THEME_KEY};

/// Overrides the data directory (use different dirs for separate profiles)
pub const DATA_DIR_ENV: &str = "RECIPE_BOOK_DATA_DIR";
pub const FAVORITES_KEY_ENV: &str = "RECIPE_BOOK_FAVORITES_KEY";
pub const THEME_KEY_ENV: &str = "RECIPE_BOOK_THEME_KEY";

const DB_FILE: &str = "recipe_book.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding favorites and theme
    pub db_path: PathBuf,
    pub favorites_key: String,
    pub theme_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values are ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self {
            db_path: data_dir.join(DB_FILE),
            favorites_key: var(FAVORITES_KEY_ENV).unwrap_or_else(|| FAVORITES_KEY.to_string()),
            theme_key: var(THEME_KEY_ENV).unwrap_or_else(|| THEME_KEY.to_string()),
        }
    }
}

/// Get the directory where the database should be stored
///
/// - Linux: ~/.local/share/recipe-book
/// - macOS: ~/Library/Application Support/recipe-book
/// - Windows: %APPDATA%\recipe-book
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recipe-book")
}
