//! # vigil-config
//!
//! Layered configuration loading for Vigil using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VIGIL_*` prefix, `__` as separator)
//! 2. Project-level `.vigil/config.toml`
//! 3. User-level `~/.config/vigil/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `VIGIL_DATABASE__PATH` -> `database.path` and
//! `VIGIL_AUDIT__DEFAULT_LIMIT` -> `audit.default_limit`.
//!
//! ```no_run
//! use std::path::Path;
//! use vigil_config::VigilConfig;
//!
//! let config = VigilConfig::load_with_dotenv(Path::new(".")).expect("config");
//! println!("listing {} entries by default", config.audit.default_limit);
//! ```

mod audit;
mod database;
mod error;

pub use audit::AuditConfig;
pub use database::{DEFAULT_DB_FILE, DatabaseConfig};
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project directory holding the database and local config.
pub const PROJECT_DIR: &str = ".vigil";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VigilConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl VigilConfig {
    /// Load configuration for the project rooted at `project_root`.
    ///
    /// Does NOT call `dotenvy`; use [`VigilConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source cannot be parsed, or
    /// `ConfigError::InvalidValue` when the merged values are inconsistent.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory first, then [`VigilConfig::load`].
    ///
    /// # Errors
    ///
    /// Same as [`VigilConfig::load`].
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("VIGIL_").split("__"))
    }

    /// Check cross-field constraints after extraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vigil").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = VigilConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.database.path.is_empty());
    }

    #[test]
    fn figment_builds_without_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let config: VigilConfig = VigilConfig::figment(dir.path())
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.audit.default_limit, 20);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
    }

    #[test]
    fn project_toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_dir(PROJECT_DIR)?;
            jail.create_file(
                ".vigil/config.toml",
                r#"
                [audit]
                default_limit = 50
                value_preview_len = 30

                [database]
                path = "audit.db"
                "#,
            )?;
            let config = VigilConfig::load(jail.directory()).expect("load");
            assert_eq!(config.audit.default_limit, 50);
            assert_eq!(config.audit.value_preview_len, 30);
            assert_eq!(config.audit.max_limit, 500);
            assert_eq!(config.database.path, "audit.db");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_dir(PROJECT_DIR)?;
            jail.create_file(".vigil/config.toml", "[audit]\ndefault_limit = 50\n")?;
            jail.set_env("VIGIL_AUDIT__DEFAULT_LIMIT", "7");
            let config = VigilConfig::load(jail.directory()).expect("load");
            assert_eq!(config.audit.default_limit, 7);
            Ok(())
        });
    }

    #[test]
    fn inconsistent_limits_fail_to_load() {
        Jail::expect_with(|jail| {
            jail.set_env("VIGIL_AUDIT__DEFAULT_LIMIT", "900");
            let err = VigilConfig::load(jail.directory()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
            Ok(())
        });
    }

    #[test]
    fn malformed_value_is_a_figment_error() {
        Jail::expect_with(|jail| {
            jail.set_env("VIGIL_AUDIT__MAX_LIMIT", "lots");
            let err = VigilConfig::load(jail.directory()).unwrap_err();
            assert!(matches!(err, ConfigError::Figment(_)));
            Ok(())
        });
    }
}
