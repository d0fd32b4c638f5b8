//! # Cart Configuration
//!
//! Where the cart is stored and under which key.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GOMARKET_DB_PATH=/data/gomarket.db                                 │
//! │     GOMARKET_CART_KEY=@GoMarket:products                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cart/cart.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.gomarket.cart/cart.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir / gomarket.db, key "@GoMarket:products"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! database_path = "/var/lib/gomarket/gomarket.db"
//! key = "@GoMarket:products"
//! max_connections = 2
//! ```

use std::path::PathBuf;

use gomarket_core::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CartError, CartResult};
use crate::storage::SqliteConfig;

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "GOMARKET_DB_PATH";

/// Environment variable overriding the storage key.
pub const ENV_CART_KEY: &str = "GOMARKET_CART_KEY";

// =============================================================================
// Storage Settings
// =============================================================================

/// Settings for the persistent key-value slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Key the cart snapshot is stored under.
    #[serde(default = "default_key")]
    pub key: String,

    /// Pool size for the SQLite store.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "gomarket", "cart")
        .map(|dirs| dirs.data_dir().join("gomarket.db"))
        .unwrap_or_else(|| PathBuf::from("gomarket.db"))
}

fn default_key() -> String {
    CART_STORAGE_KEY.to_string()
}

fn default_max_connections() -> u32 {
    2
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            key: default_key(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageSettings,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CartResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CartError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(CartError::Config("storage key must not be empty".into()));
        }

        if self.storage.max_connections == 0 {
            return Err(CartError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }

        if let Some(key) = lookup(ENV_CART_KEY) {
            debug!(key = %key, "Overriding cart key from environment");
            self.storage.key = key;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gomarket", "cart")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the storage key for the cart snapshot.
    pub fn key(&self) -> &str {
        &self.storage.key
    }

    /// Builds the SQLite store configuration.
    pub fn sqlite_config(&self) -> SqliteConfig {
        SqliteConfig::new(self.storage.database_path.clone())
            .max_connections(self.storage.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.key(), "@GoMarket:products");
        assert_eq!(config.storage.max_connections, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();

        config.storage.key = "  ".to_string();
        assert!(config.validate().is_err());

        config.storage.key = "k".to_string();
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ENV_DB_PATH, "/tmp/override.db"), (ENV_CART_KEY, "@Test:cart")]);
        let mut config = CartConfig::default();

        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/override.db"));
        assert_eq!(config.key(), "@Test:cart");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: CartConfig = toml::from_str("[storage]\nkey = \"@Other:cart\"\n").unwrap();

        assert_eq!(config.key(), "@Other:cart");
        assert_eq!(config.storage.max_connections, 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.toml");

        let mut config = CartConfig::default();
        config.storage.database_path = dir.path().join("cart.db");
        config.storage.max_connections = 3;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[storage]"));

        let loaded: CartConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[storage]\nmax_connections = \"many\"\n").unwrap();

        let err = CartConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, CartError::Config(_)));
    }

    #[test]
    fn test_sqlite_config() {
        let mut config = CartConfig::default();
        config.storage.database_path = PathBuf::from("/tmp/x.db");
        config.storage.max_connections = 4;

        let sqlite = config.sqlite_config();
        assert_eq!(sqlite.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(sqlite.max_connections, 4);
    }
}
