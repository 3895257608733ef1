//! Local database configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database file name inside the project's `.vigil/` directory.
pub const DEFAULT_DB_FILE: &str = "vigil.db";

const fn default_busy_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. Empty means `.vigil/vigil.db` under the
    /// project root.
    #[serde(default)]
    pub path: String,

    /// How long a writer waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the database file against the project's `.vigil/` directory.
    ///
    /// Relative configured paths are taken relative to the project root.
    #[must_use]
    pub fn resolve_path(&self, project_root: &Path) -> PathBuf {
        if self.path.is_empty() {
            return project_root.join(".vigil").join(DEFAULT_DB_FILE);
        }
        let configured = PathBuf::from(&self.path);
        if configured.is_absolute() {
            configured
        } else {
            project_root.join(configured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_uses_project_directory() {
        let config = DatabaseConfig::default();
        assert_eq!(
            config.resolve_path(Path::new("/work/shop")),
            PathBuf::from("/work/shop/.vigil/vigil.db")
        );
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn relative_path_is_project_relative() {
        let config = DatabaseConfig {
            path: "data/audit.db".into(),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_path(Path::new("/work/shop")),
            PathBuf::from("/work/shop/data/audit.db")
        );
    }

    #[test]
    fn absolute_path_is_kept() {
        let config = DatabaseConfig {
            path: "/var/lib/vigil.db".into(),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_path(Path::new("/work/shop")),
            PathBuf::from("/var/lib/vigil.db")
        );
    }
}
