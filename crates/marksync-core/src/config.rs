//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/marksync/config.toml)
//! 3. Environment variables (MARKSYNC_* prefix)
//!
//! Environment variables take precedence over config file values. The core
//! reads the configuration at the start of every sync cycle and never
//! mutates it; edits happen through `save()` (the CLI `config` command),
//! which is also where the encryption key length is validated.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::crypto;
use crate::error::{SyncError, SyncResult};

/// Environment variable prefix
const ENV_PREFIX: &str = "MARKSYNC";

/// WebDAV endpoint and payload encryption settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebdavConfig {
    /// Base URL of the WebDAV collection
    #[serde(default)]
    pub url: String,
    /// Basic auth username
    #[serde(default)]
    pub username: String,
    /// Basic auth password
    #[serde(default)]
    pub password: String,
    /// Whether snapshot payloads are encrypted
    #[serde(default)]
    pub enable_aes: bool,
    /// Encryption key, 16-32 bytes (validated on save)
    #[serde(default)]
    pub aes_key: String,
}

impl WebdavConfig {
    /// Whether url and credentials are all present
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Bookmark sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkSyncConfig {
    /// Slash-delimited path of the folder to sync, e.g. "/Bookmarks bar/Work"
    #[serde(default)]
    pub sync_path: String,
    /// Remote object name for the bookmark snapshot
    #[serde(default = "default_bookmark_filename")]
    pub filename: String,
    /// Write a dated backup copy next to the snapshot on upload
    #[serde(default)]
    pub auto_backup: bool,
    /// Whether the scheduler runs bookmark sync periodically
    #[serde(default)]
    pub enable_auto_sync: bool,
    /// Sync interval in seconds
    #[serde(default = "default_bookmark_interval")]
    pub sync_interval: u64,
}

impl Default for BookmarkSyncConfig {
    fn default() -> Self {
        Self {
            sync_path: String::new(),
            filename: default_bookmark_filename(),
            auto_backup: false,
            enable_auto_sync: false,
            sync_interval: default_bookmark_interval(),
        }
    }
}

/// Periodic snapshot upload settings (tabs and history)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSyncConfig {
    /// Whether the scheduler uploads snapshots periodically
    #[serde(default)]
    pub enable_auto_sync: bool,
    /// Upload interval in seconds
    #[serde(default = "default_snapshot_interval")]
    pub sync_interval: u64,
}

impl Default for SnapshotSyncConfig {
    fn default() -> Self {
        Self {
            enable_auto_sync: false,
            sync_interval: default_snapshot_interval(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for local data (bookmark profile file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name identifying this device in per-device snapshot filenames
    #[serde(default = "default_device_name")]
    pub device_name: String,

    /// WebDAV endpoint and encryption
    #[serde(default)]
    pub webdav: WebdavConfig,

    /// Bookmark sync settings
    #[serde(default)]
    pub bookmarks: BookmarkSyncConfig,

    /// Tab snapshot settings
    #[serde(default)]
    pub tabs: SnapshotSyncConfig,

    /// History snapshot settings
    #[serde(default = "default_history_config")]
    pub history: SnapshotSyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            device_name: default_device_name(),
            webdav: WebdavConfig::default(),
            bookmarks: BookmarkSyncConfig::default(),
            tabs: SnapshotSyncConfig::default(),
            history: default_history_config(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_DEVICE_NAME", ENV_PREFIX)) {
            if !val.is_empty() {
                self.device_name = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_WEBDAV_URL", ENV_PREFIX)) {
            self.webdav.url = val;
        }

        if let Ok(val) = std::env::var(format!("{}_WEBDAV_USERNAME", ENV_PREFIX)) {
            self.webdav.username = val;
        }

        if let Ok(val) = std::env::var(format!("{}_WEBDAV_PASSWORD", ENV_PREFIX)) {
            self.webdav.password = val;
        }
    }

    /// Validate the configuration for saving
    ///
    /// Key-length validation happens here, at configuration-save time, so
    /// encode/decode can assume a pre-validated key.
    pub fn validate(&self) -> SyncResult<()> {
        if self.webdav.enable_aes {
            crypto::validate_key(&self.webdav.aes_key)?;
        }
        Ok(())
    }

    /// Validate that a bookmark sync can run at all
    ///
    /// Checked before any network call; surfaced to the caller rather than
    /// failing mid-sync.
    pub fn validate_for_sync(&self) -> SyncResult<()> {
        if !self.webdav.is_complete() {
            return Err(SyncError::ConfigIncomplete(
                "WebDAV url, username, and password are required".to_string(),
            ));
        }
        if self.bookmarks.sync_path.is_empty() {
            return Err(SyncError::ConfigIncomplete(
                "bookmark sync path is not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_path = Self::config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with the MARKSYNC_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("marksync")
            .join("config.toml")
    }

    /// Get the path to the local bookmark profile file
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }
}

fn default_bookmark_filename() -> String {
    "bookmarks.json".to_string()
}

fn default_bookmark_interval() -> u64 {
    300
}

fn default_snapshot_interval() -> u64 {
    30
}

fn default_history_config() -> SnapshotSyncConfig {
    SnapshotSyncConfig {
        enable_auto_sync: false,
        sync_interval: 300,
    }
}

fn default_device_name() -> String {
    "unnamed-device".to_string()
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marksync")
}
