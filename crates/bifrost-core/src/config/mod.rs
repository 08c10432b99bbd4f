//! Relay configuration with layered loading.
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: hardcoded in the `Default` implementations
//! 2. **Config file**: TOML file specified by the `BIFROST_CONFIG` env var
//! 3. **Environment variables**: `BIFROST_*` vars override specific fields
//!    (e.g. `BIFROST_CHAIN_ID`, `BIFROST_MIRROR__BASE_URL`)
//!
//! Invalid configurations (malformed chain id, empty mirror URL) return
//! errors at load time rather than failing silently later.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Connection settings for the mirror node REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Base URL of the mirror node, without a trailing slash.
    #[serde(default = "default_mirror_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. Defaults to `10`.
    #[serde(default = "default_mirror_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds. Defaults to `5`.
    #[serde(default = "default_mirror_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Retries for transient (5xx / network) failures. Defaults to `2`.
    #[serde(default = "default_mirror_retries")]
    pub retries: u32,
}

fn default_mirror_base_url() -> String {
    "http://127.0.0.1:5551".to_string()
}

fn default_mirror_timeout_seconds() -> u64 {
    10
}

fn default_mirror_connect_timeout_seconds() -> u64 {
    5
}

fn default_mirror_retries() -> u32 {
    2
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: default_mirror_base_url(),
            timeout_seconds: default_mirror_timeout_seconds(),
            connect_timeout_seconds: default_mirror_connect_timeout_seconds(),
            retries: default_mirror_retries(),
        }
    }
}

/// Tunables for the `eth_*` translation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthConfig {
    /// Upper bound on `eth_feeHistory` block counts. Defaults to `10`.
    #[serde(default = "default_fee_history_max_results")]
    pub fee_history_max_results: u64,

    /// Ledger shard for bytecode queries. Defaults to `0`.
    #[serde(default)]
    pub shard: u64,

    /// Ledger realm for bytecode queries. Defaults to `0`.
    #[serde(default)]
    pub realm: u64,
}

fn default_fee_history_max_results() -> u64 {
    10
}

impl Default for EthConfig {
    fn default() -> Self {
        Self { fee_history_max_results: default_fee_history_max_results(), shard: 0, realm: 0 }
    }
}

/// Top-level relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Chain id served by `eth_chainId`, `0x`-prefixed hex. Immutable after
    /// construction. Defaults to `0x12a`.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    #[serde(default)]
    pub mirror: MirrorConfig,

    #[serde(default)]
    pub eth: EthConfig,
}

fn default_chain_id() -> String {
    "0x12a".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { chain_id: default_chain_id(), mirror: MirrorConfig::default(), eth: EthConfig::default() }
    }
}

impl RelayConfig {
    /// Loads configuration from defaults, an optional TOML file named by
    /// `BIFROST_CONFIG` and `BIFROST_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a source fails to parse or the merged
    /// configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Ok(path) = std::env::var("BIFROST_CONFIG") {
            builder = builder.add_source(File::with_name(&path));
        }

        let settings: Self = builder
            .add_source(Environment::with_prefix("BIFROST").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::Message`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let digits = self.chain_id.strip_prefix("0x").ok_or_else(|| {
            ConfigError::Message(format!("chain_id must be 0x-prefixed hex: {}", self.chain_id))
        })?;
        if digits.is_empty() || u64::from_str_radix(digits, 16).is_err() {
            return Err(ConfigError::Message(format!("chain_id is not valid hex: {}", self.chain_id)));
        }

        if self.mirror.base_url.is_empty() {
            return Err(ConfigError::Message("mirror.base_url must not be empty".to_string()));
        }

        if self.eth.fee_history_max_results == 0 {
            return Err(ConfigError::Message(
                "eth.fee_history_max_results must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
