//! Environment-driven configuration.
//!
//! | variable                          | default  |
//! |-----------------------------------|----------|
//! | `HAMPERDESK_DATA_DIR`             | `./data` |
//! | `HAMPERDESK_STORE`                | `file`   |
//! | `HAMPERDESK_LOW_STOCK_THRESHOLD`  | `5`      |
//! | `HAMPERDESK_LOG_FORMAT`           | `json`   |

use std::path::PathBuf;

use thiserror::Error;

use hamperdesk_observability::{LogFormat, LogSettings};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HAMPERDESK_STORE must be 'file' or 'memory', got '{0}'")]
    InvalidStore(String),

    #[error("HAMPERDESK_LOW_STOCK_THRESHOLD must be a non-negative integer, got '{0}'")]
    InvalidThreshold(String),

    #[error("HAMPERDESK_LOG_FORMAT: {0}")]
    InvalidLogFormat(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// `<key>.json` files under the data directory.
    #[default]
    File,
    /// Nothing survives the process.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub store: StoreKind,
    pub low_stock_threshold: i64,
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            store: StoreKind::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(dir) = get("HAMPERDESK_DATA_DIR") {
            config.data_dir = PathBuf::from(dir.trim());
        }

        if let Some(store) = get("HAMPERDESK_STORE") {
            config.store = match store.trim().to_ascii_lowercase().as_str() {
                "file" => StoreKind::File,
                "memory" => StoreKind::Memory,
                _ => return Err(ConfigError::InvalidStore(store)),
            };
        }

        if let Some(raw) = get("HAMPERDESK_LOW_STOCK_THRESHOLD") {
            config.low_stock_threshold = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|t| *t >= 0)
                .ok_or(ConfigError::InvalidThreshold(raw))?;
        }

        if let Some(format) = get("HAMPERDESK_LOG_FORMAT") {
            config.log.format = format
                .parse::<LogFormat>()
                .map_err(ConfigError::InvalidLogFormat)?;
        }

        Ok(config)
    }
}
