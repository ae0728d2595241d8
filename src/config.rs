use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default staker daemon JSON-RPC listener
pub const DEFAULT_DAEMON_ADDRESS: &str = "tcp://127.0.0.1:15812";

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub staker_rpc: StakerRpcConfig,
}

/// Staker daemon JSON-RPC configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerRpcConfig {
    pub daemon_address: String,
    /// Per-request timeout; `0` waits indefinitely
    pub timeout_seconds: u64,
}

impl Default for StakerRpcConfig {
    fn default() -> Self {
        Self {
            daemon_address: DEFAULT_DAEMON_ADDRESS.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl StakerRpcConfig {
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = StakerRpcConfig::default();
        let config = Config::builder()
            .set_default("staker_rpc.daemon_address", defaults.daemon_address)?
            .set_default("staker_rpc.timeout_seconds", defaults.timeout_seconds)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // STAKERCLI_STAKER_RPC__TIMEOUT_SECONDS style overrides
            .add_source(
                config::Environment::with_prefix("STAKERCLI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Short names used by the daemon's own tooling
        if let Ok(address) = env::var("STAKER_RPC_DAEMON_ADDRESS") {
            app_config.staker_rpc.daemon_address = address;
        }

        if let Ok(timeout) = env::var("STAKER_RPC_TIMEOUT_SECONDS") {
            app_config.staker_rpc.timeout_seconds = timeout.parse().map_err(|_| {
                ConfigError::Message(format!(
                    "STAKER_RPC_TIMEOUT_SECONDS must be a whole number of seconds, got {}",
                    timeout
                ))
            })?;
        }

        if app_config.staker_rpc.daemon_address.trim().is_empty() {
            return Err(ConfigError::Message(
                "staker_rpc.daemon_address must not be empty".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(_) => Ok(Self {
                staker_rpc: StakerRpcConfig::default(),
            }),
        }
    }
}
