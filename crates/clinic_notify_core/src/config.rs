//! Store configuration.
//!
//! # Responsibility
//! - Carry the database location and per-connection settings.
//! - Resolve settings from process environment for CLI/tooling callers.
//!
//! # Invariants
//! - Foreign-key enforcement is off unless explicitly enabled.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the database file path.
pub const DB_PATH_ENV: &str = "CLINIC_NOTIFY_DB";
/// Environment variable toggling `PRAGMA foreign_keys` (`1|true|on`).
pub const FOREIGN_KEYS_ENV: &str = "CLINIC_NOTIFY_FOREIGN_KEYS";

const DEFAULT_DB_FILE: &str = "database.sqlite";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings shared by every store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Enables declared foreign keys. Off keeps references advisory.
    pub enforce_foreign_keys: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE)
    }
}

impl StoreConfig {
    /// Creates a config for `db_path` with default connection settings.
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            enforce_foreign_keys: false,
        }
    }

    /// Builds a config from `CLINIC_NOTIFY_DB` and `CLINIC_NOTIFY_FOREIGN_KEYS`.
    ///
    /// Missing variables fall back to defaults.
    pub fn from_env() -> Self {
        let db_path = std::env::var_os(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
        let enforce_foreign_keys = std::env::var(FOREIGN_KEYS_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self::new(db_path).with_foreign_keys(enforce_foreign_keys)
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::{parse_flag, StoreConfig};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn defaults_keep_foreign_keys_advisory() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, Path::new("database.sqlite"));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(!config.enforce_foreign_keys);
    }

    #[test]
    fn builder_overrides_settings() {
        let config = StoreConfig::new("/tmp/clinic.sqlite")
            .with_busy_timeout(Duration::from_millis(250))
            .with_foreign_keys(true);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(config.enforce_foreign_keys);
    }

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }
}
