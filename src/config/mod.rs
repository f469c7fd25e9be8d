mod basic;
mod storage;

pub use basic::BasicConfig;
pub use storage::StorageConfig;

use crate::error::PhotonError;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Remote-storage (cloud disk) settings (see `storage` table in config.toml).
    #[serde(default)]
    pub storage: StorageConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Builds a Figment that merges defaults and a config TOML file.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        }
    }

    /// Loads configuration by merging defaults and `config.toml` if present.
    ///
    /// Note: this does **not** validate required fields like `basic.master_key`. Binaries should
    /// call `Config::from_toml()` instead (or validate explicitly) to avoid running with insecure
    /// defaults.
    pub fn from_optional_toml() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml): {err}")
        })
    }

    /// Loads configuration from the TOML file (with defaults) and validates required fields.
    pub fn from_toml() -> Self {
        if !PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            panic!("config file not found: {DEFAULT_CONFIG_FILE}");
        }
        let cfg: Self = Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration from {DEFAULT_CONFIG_FILE}: {err}")
        });
        if cfg.basic.master_key.trim().is_empty() {
            panic!("basic.master_key must be set and non-empty");
        }
        cfg
    }

    /// Rewrites `config.toml` with an updated `[storage]` table.
    ///
    /// The rest of the file is re-read first so a concurrent manual edit of the
    /// `[basic]` table is not clobbered with stale boot-time values.
    pub fn persist_storage(storage: &StorageConfig) -> Result<(), PhotonError> {
        let mut cfg = Self::from_optional_toml();
        cfg.storage = storage.clone();
        let rendered = toml::to_string_pretty(&cfg)
            .map_err(|e| PhotonError::Unexpected(format!("config serialize failed: {e}")))?;
        std::fs::write(DEFAULT_CONFIG_FILE, rendered)?;
        Ok(())
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_optional_toml);
