//! Board storage configuration.
//!
//! Defaults can be overridden through `TASKBOARD_DB_PATH` and
//! `TASKBOARD_SLOT_KEY`; blank values are ignored.

use crate::store::task_store::DEFAULT_SLOT_KEY;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKBOARD_DB_PATH";
pub const SLOT_KEY_ENV: &str = "TASKBOARD_SLOT_KEY";
pub const DEFAULT_DB_FILE_NAME: &str = "taskboard.sqlite3";

/// Where the board collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl BoardConfig {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults with overrides read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = non_blank(lookup(DB_PATH_ENV)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = non_blank(lookup(SLOT_KEY_ENV)) {
            config.slot_key = key;
        }
        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, SLOT_KEY_ENV};
    use std::path::PathBuf;

    #[test]
    fn defaults_use_temp_dir_and_standard_slot() {
        let config = BoardConfig::from_lookup(|_| None);
        assert!(config.db_path.ends_with(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.slot_key, "pt-task-manager-data");
    }

    #[test]
    fn overrides_apply_and_blank_values_are_ignored() {
        let config = BoardConfig::from_lookup(|name| match name {
            DB_PATH_ENV => Some(" /var/lib/board.sqlite3 ".to_string()),
            SLOT_KEY_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/var/lib/board.sqlite3"));
        assert_eq!(config.slot_key, "pt-task-manager-data");
    }
}
