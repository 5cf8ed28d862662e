use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

mod error;

pub use error::Error;

/// Tuning knobs read from the optional `--config` TOML file.
///
/// The listen address and provider URIs always come from the command line.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_query_timeout")]
    pub query_timeout: u64,
    #[serde(default = "ServerConfig::default_query_timeout_grace_period")]
    pub query_timeout_grace_period: u64,
    #[serde(default)]
    pub drain_timeout: u64,
}

impl ServerConfig {
    fn default_query_timeout() -> u64 {
        3600
    }

    fn default_query_timeout_grace_period() -> u64 {
        60
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            query_timeout: Self::default_query_timeout(),
            query_timeout_grace_period: Self::default_query_timeout_grace_period(),
            drain_timeout: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Tokio worker threads. Requests are not capped, each connection gets
    /// its own task on this pool.
    #[serde(default = "GlobalConfig::default_worker_threads")]
    pub worker_threads: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            worker_threads: GlobalConfig::default_worker_threads(),
        }
    }
}

impl GlobalConfig {
    fn default_worker_threads() -> usize {
        4
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "ProviderConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProviderConfig {
    fn default_timeout_ms() -> u64 {
        10_000
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_str = fs::read_to_string(path)?;
        Self::load_from_str(&config_str)
    }

    pub fn load_from_str(slice: &str) -> Result<Self, Error> {
        let config: Configuration =
            toml::from_str(slice).map_err(|e| Error::ConfigurationFileFormat(e.to_string()))?;

        if config.global.worker_threads == 0 {
            return Err(Error::InvalidValue(
                "global.worker_threads must be at least 1".to_string(),
            ));
        }

        if config.provider.timeout_ms == 0 {
            return Err(Error::InvalidValue(
                "provider.timeout_ms must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
