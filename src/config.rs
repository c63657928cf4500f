//! Storefront configuration.
//!
//! Loaded from an optional TOML file; every field has a default, so an empty file (or no
//! file) yields a working in-memory storefront. Two environment variables override the
//! file:
//!
//! - `KALINGAMART_BACKEND`: `memory` | `local` | `remote`
//! - `KALINGAMART_DATA_DIR`: data directory for the `local` backend (selects `local` when
//!   `KALINGAMART_BACKEND` is unset)
//!
//! ```toml
//! actor_buffer = 64
//!
//! [backend]
//! kind = "local"
//! data_dir = "./data"
//!
//! [pricing]
//! delivery_fee = 29
//! free_delivery_threshold = 199
//!
//! [admin]
//! email = "admin@kalingamart.com"
//! password = "admin123"
//! ```

use crate::model::{AccountId, Rupees};
use crate::pricing::PricingPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const BACKEND_ENV: &str = "KALINGAMART_BACKEND";
pub const DATA_DIR_ENV: &str = "KALINGAMART_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown backend '{0}' (expected memory, local or remote)")]
    UnknownBackend(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where persisted state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
    /// Key-value slots in process memory.
    #[default]
    Memory,
    /// Key-value slots as JSON files under `data_dir`.
    Local { data_dir: PathBuf },
    /// Document-per-record database.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Credited to every new user account.
    pub welcome_bonus: Rupees,
    /// Entries returned by a history query when the caller gives no limit.
    pub history_limit: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            welcome_bonus: Rupees(50),
            history_limit: 50,
        }
    }
}

/// The single admin identity and its demo credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub opening_balance: Rupees,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            id: AccountId::from("admin_001"),
            name: "Admin".to_string(),
            email: "admin@kalingamart.com".to_string(),
            password: "admin123".to_string(),
            opening_balance: Rupees(50_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub backend: Backend,
    pub pricing: PricingPolicy,
    pub wallet: WalletConfig,
    pub admin: AdminConfig,
    /// Request channel capacity of every actor.
    pub actor_buffer: usize,
    /// Seed the default menu and discount codes into an empty store.
    pub seed_defaults: bool,
    /// Interval of the simulated order status ticker.
    pub status_tick_millis: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            pricing: PricingPolicy::default(),
            wallet: WalletConfig::default(),
            admin: AdminConfig::default(),
            actor_buffer: 32,
            seed_defaults: true,
            status_tick_millis: 5_000,
        }
    }
}

impl StorefrontConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` (if any), then applies the environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&source)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `KALINGAMART_BACKEND` / `KALINGAMART_DATA_DIR` as returned by `lookup`.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let data_dir = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty());
        match lookup(BACKEND_ENV).map(|b| b.trim().to_lowercase()) {
            Some(kind) => {
                self.backend = match kind.as_str() {
                    "memory" | "in-memory" => Backend::Memory,
                    "remote" => Backend::Remote,
                    "local" => {
                        let data_dir = match (data_dir, &self.backend) {
                            (Some(dir), _) => PathBuf::from(dir),
                            (None, Backend::Local { data_dir }) => data_dir.clone(),
                            (None, _) => PathBuf::from("data"),
                        };
                        Backend::Local { data_dir }
                    }
                    _ => return Err(ConfigError::UnknownBackend(kind)),
                }
            }
            None => {
                if let Some(dir) = data_dir {
                    self.backend = Backend::Local {
                        data_dir: PathBuf::from(dir),
                    };
                }
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer == 0 {
            return Err(ConfigError::Invalid("actor_buffer must be at least 1".into()));
        }
        if self.wallet.history_limit == 0 {
            return Err(ConfigError::Invalid("wallet.history_limit must be at least 1".into()));
        }
        if self.admin.email.trim().is_empty() || self.admin.password.is_empty() {
            return Err(ConfigError::Invalid("admin credentials must not be empty".into()));
        }
        if self.status_tick_millis == 0 {
            return Err(ConfigError::Invalid("status_tick_millis must be positive".into()));
        }
        Ok(())
    }

    pub fn status_tick(&self) -> Duration {
        Duration::from_millis(self.status_tick_millis)
    }
}
