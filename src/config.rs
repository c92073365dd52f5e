//! Configuration for the CLI and the HTTP server.
//!
//! Settings come from an optional TOML file, then environment variables
//! (`PORT`, `FAMILYBOOK_DB`, `FAMILYBOOK_STORAGE`, `FAMILYBOOK_LOG`) override
//! whatever the file said.

use crate::db::SqliteStore;
use crate::store::{InMemoryStore, NetworkStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// An environment override could not be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },

    /// The configured store could not be opened
    #[error("Failed to open store: {0}")]
    Store(#[from] crate::error::FamilyError),
}

/// Where family networks live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local map, lost on restart
    Memory,
    /// SQLite file at `database_path`
    Sqlite,
}

impl StorageKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Some(StorageKind::Memory),
            "sqlite" => Some(StorageKind::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file used when `storage = "sqlite"` and by the CLI
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_storage")]
    pub storage: StorageKind,

    /// tracing filter directive (e.g., "info", "familybook=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("familybook.db")
}

fn default_storage() -> StorageKind {
    StorageKind::Memory
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_address: default_bind_address(),
            port: default_port(),
            database_path: default_database_path(),
            storage: default_storage(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// File (if any) + process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => AppConfig::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source (the environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT".to_string(),
                value: port.clone(),
            })?;
        }

        if let Some(db) = lookup("FAMILYBOOK_DB") {
            self.database_path = PathBuf::from(db);
        }

        if let Some(storage) = lookup("FAMILYBOOK_STORAGE") {
            self.storage = StorageKind::parse(&storage).ok_or_else(|| ConfigError::InvalidEnv {
                name: "FAMILYBOOK_STORAGE".to_string(),
                value: storage.clone(),
            })?;
        }

        if let Some(level) = lookup("FAMILYBOOK_LOG") {
            self.log_level = level;
        }

        Ok(self)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Open the configured store
    pub fn open_store(&self) -> Result<Arc<dyn NetworkStore>, ConfigError> {
        let store: Arc<dyn NetworkStore> = match self.storage {
            StorageKind::Memory => Arc::new(InMemoryStore::new()),
            StorageKind::Sqlite => Arc::new(SqliteStore::open(&self.database_path)?),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "127.0.0.1"
            port = 8080
            storage = "sqlite"
            database_path = "/var/lib/familybook/data.db"
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/familybook/data.db"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_env_overrides_file() {
        let config = AppConfig::default()
            .with_overrides(env(&[
                ("PORT", "4100"),
                ("FAMILYBOOK_STORAGE", "SQLite"),
                ("FAMILYBOOK_DB", "other.db"),
            ]))
            .unwrap();

        assert_eq!(config.port, 4100);
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.database_path, PathBuf::from("other.db"));
    }

    #[test]
    fn test_bad_port_rejected() {
        let err = AppConfig::default()
            .with_overrides(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref name, .. } if name == "PORT"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("familybook.toml");
        std::fs::write(&path, "port = 5000\nlog_level = \"debug\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_level, "debug");
    }
}
