//! Shelf configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/shelf/config/shelf.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables (`SHELF_USER`, `SHELF_HISTORY_PATH`) are applied
//! on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analytics::Period;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/shelf.toml");

pub const USER_ENV: &str = "SHELF_USER";
pub const HISTORY_PATH_ENV: &str = "SHELF_HISTORY_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct ShelfConfig {
    pub owner: String,
    pub db_path: PathBuf,
    /// `None` means the default file in the data dir
    pub history_path: Option<PathBuf>,
    pub default_period: Period,
    pub host: String,
    pub port: u16,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            owner: "local".to_string(),
            db_path: PathBuf::from("shelf.db"),
            history_path: None,
            default_period: Period::Month,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ShelfConfig {
    /// Load from the default override location or the embedded defaults,
    /// then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Load from an explicit override path (falls back to defaults if missing)
    pub fn load_from(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) if path.exists() => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            _ => DEFAULT_CONFIG.to_string(),
        };

        let mut config = parse_config(&content)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(owner) = lookup(USER_ENV).filter(|v| !v.trim().is_empty()) {
            self.owner = owner;
        }
        if let Some(path) = lookup(HISTORY_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.history_path = Some(PathBuf::from(path));
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("shelf").join("config").join("shelf.toml"))
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    user: Option<RawUser>,
    database: Option<RawDatabase>,
    search: Option<RawSearch>,
    analytics: Option<RawAnalytics>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    history_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawAnalytics {
    default_period: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<ShelfConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ShelfConfig::default();

    if let Some(owner) = raw.user.and_then(|u| u.owner) {
        config.owner = owner;
    }
    if let Some(path) = raw.database.and_then(|d| d.path) {
        config.db_path = path;
    }
    if let Some(path) = raw.search.and_then(|s| s.history_path) {
        config.history_path = Some(path);
    }
    if let Some(period) = raw.analytics.and_then(|a| a.default_period) {
        config.default_period = period.parse().map_err(Error::Config)?;
    }
    if let Some(server) = raw.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [user]
            owner = "alice"

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.owner, "alice");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.default_period, Period::Month);
    }

    #[test]
    fn test_invalid_period_rejected() {
        let result = parse_config("[analytics]\ndefault_period = \"2w\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.toml");
        fs::write(&path, "[analytics]\ndefault_period = \"all\"\n").unwrap();

        let mut config = ShelfConfig::load_from(Some(&path)).unwrap();
        config.apply_env(|_| None);
        assert_eq!(config.default_period, Period::All);

        // Missing override falls back to defaults
        let missing = ShelfConfig::load_from(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(missing.default_period, Period::Month);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ShelfConfig::default();
        config.apply_env(|key| match key {
            USER_ENV => Some("bob".to_string()),
            HISTORY_PATH_ENV => Some("/tmp/h.json".to_string()),
            _ => None,
        });
        assert_eq!(config.owner, "bob");
        assert_eq!(config.history_path, Some(PathBuf::from("/tmp/h.json")));

        let mut blank = ShelfConfig::default();
        blank.apply_env(|_| Some("  ".to_string()));
        assert_eq!(blank.owner, "local");
    }
}
