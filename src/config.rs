use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use validator::Validate;

use crate::cache::QueryScope;

const CONFIG_DIR: &str = "config";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ALERTAS_POLL_SECS: u64 = 120;

// Staleness defaults mirror how volatile each resource actually is:
// stock mutates constantly, bodegas almost never.
const DEFAULT_PRODUCTOS_STALE_SECS: u64 = 30;
const DEFAULT_BODEGAS_STALE_SECS: u64 = 300;
const DEFAULT_STOCK_STALE_SECS: u64 = 10;
const DEFAULT_ALERTAS_STALE_SECS: u64 = 60;
const DEFAULT_MOVIMIENTOS_STALE_SECS: u64 = 60;
const DEFAULT_KARDEX_STALE_SECS: u64 = 300;

/// Per-scope staleness windows, in seconds. A cached read inside the
/// window is served without touching the network.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct StalenessConfig {
    #[serde(default = "default_productos_stale")]
    pub productos_secs: u64,
    #[serde(default = "default_bodegas_stale")]
    pub bodegas_secs: u64,
    #[serde(default = "default_stock_stale")]
    pub stock_secs: u64,
    #[serde(default = "default_alertas_stale")]
    pub alertas_secs: u64,
    #[serde(default = "default_movimientos_stale")]
    pub movimientos_secs: u64,
    #[serde(default = "default_kardex_stale")]
    pub kardex_secs: u64,
}

impl StalenessConfig {
    pub fn window(&self, scope: QueryScope) -> Duration {
        let secs = match scope {
            QueryScope::Productos => self.productos_secs,
            QueryScope::Bodegas => self.bodegas_secs,
            QueryScope::Stock => self.stock_secs,
            QueryScope::Alertas => self.alertas_secs,
            QueryScope::Movimientos => self.movimientos_secs,
            QueryScope::Kardex => self.kardex_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            productos_secs: DEFAULT_PRODUCTOS_STALE_SECS,
            bodegas_secs: DEFAULT_BODEGAS_STALE_SECS,
            stock_secs: DEFAULT_STOCK_STALE_SECS,
            alertas_secs: DEFAULT_ALERTAS_STALE_SECS,
            movimientos_secs: DEFAULT_MOVIMIENTOS_STALE_SECS,
            kardex_secs: DEFAULT_KARDEX_STALE_SECS,
        }
    }
}

/// Client configuration, loaded from `config/client.toml` (optional)
/// layered under `SVT_*` environment variables.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:8000`.
    #[validate(url)]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub cache: StalenessConfig,

    /// Interval for the background alert-refresh task.
    #[serde(default = "default_alertas_poll")]
    pub alertas_poll_secs: u64,

    /// Where the bearer session is persisted across restarts. In-memory
    /// only when unset.
    #[serde(default)]
    pub session_file: Option<PathBuf>,

    /// Where UI preferences (theme) are persisted. In-memory when unset.
    #[serde(default)]
    pub preferences_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache: StalenessConfig::default(),
            alertas_poll_secs: DEFAULT_ALERTAS_POLL_SECS,
            session_file: None,
            preferences_file: None,
        }
    }

    /// Loads configuration from file + environment and validates it.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(&format!("{}/client", CONFIG_DIR)).required(false))
            .add_source(Environment::with_prefix("SVT").separator("__"))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;

        info!(base_url = %config.base_url, "client configuration loaded");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn alertas_poll_interval(&self) -> Duration {
        Duration::from_secs(self.alertas_poll_secs)
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_alertas_poll() -> u64 {
    DEFAULT_ALERTAS_POLL_SECS
}

fn default_productos_stale() -> u64 {
    DEFAULT_PRODUCTOS_STALE_SECS
}

fn default_bodegas_stale() -> u64 {
    DEFAULT_BODEGAS_STALE_SECS
}

fn default_stock_stale() -> u64 {
    DEFAULT_STOCK_STALE_SECS
}

fn default_alertas_stale() -> u64 {
    DEFAULT_ALERTAS_STALE_SECS
}

fn default_movimientos_stale() -> u64 {
    DEFAULT_MOVIMIENTOS_STALE_SECS
}

fn default_kardex_stale() -> u64 {
    DEFAULT_KARDEX_STALE_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_window_is_tightest() {
        let windows = StalenessConfig::default();
        assert!(windows.window(QueryScope::Stock) < windows.window(QueryScope::Alertas));
        assert!(windows.window(QueryScope::Alertas) < windows.window(QueryScope::Bodegas));
    }

    #[test]
    fn rejects_malformed_base_url() {
        let config = ClientConfig::new("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_are_applied() {
        let config = ClientConfig::new("http://localhost:8000");
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.window(QueryScope::Stock), Duration::from_secs(10));
    }
}
