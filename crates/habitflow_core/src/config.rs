//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Collect storage and logging settings in one place.
//! - Resolve overrides from `HABITFLOW_*` environment variables.

use crate::logging::default_log_level;
use crate::store::progress_store::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "HABITFLOW_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "HABITFLOW_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "HABITFLOW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "HABITFLOW_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "habitflow.sqlite3";

/// Storage and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the key-value store.
    pub db_path: PathBuf,
    /// Key of the single progress record.
    pub storage_key: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Builds a config from process environment variables over defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup over defaults.
    ///
    /// Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            storage_key: read(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from).or(defaults.log_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_STORAGE_KEY};
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_defaults_and_skips_blank_values() {
        let config = CoreConfig::from_lookup(|name| match name {
            ENV_DB_PATH => Some("/tmp/habits.sqlite3".to_string()),
            ENV_STORAGE_KEY => Some("   ".to_string()),
            ENV_LOG_LEVEL => Some("warn".to_string()),
            _ => None,
        });

        assert_eq!(config.db_path, PathBuf::from("/tmp/habits.sqlite3"));
        assert_eq!(config.storage_key, "habitflow-simple");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }
}
