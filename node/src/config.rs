//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use vertex_types::ConsensusParams;

use crate::NodeError;

/// Configuration for a VERTEX node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Engine tunables live in the
/// nested `[consensus]` table; everything there falls back to the
/// [`ConsensusParams`] defaults when omitted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for operational state (config snapshots, keys).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Block production cadence in milliseconds.
    #[serde(default = "default_block_interval_ms")]
    pub block_interval_ms: u64,

    /// Capacity of the engine event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of synthetic validators seeded on a dev network.
    #[serde(default = "default_dev_validators")]
    pub dev_validators: usize,

    /// Stake assigned to each seeded dev validator.
    #[serde(default = "default_dev_stake")]
    pub dev_stake: u64,

    /// Engine tunables: thresholds, queue bounds, fan-in, fees.
    #[serde(default)]
    pub consensus: ConsensusParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./vertex_data")
}

fn default_block_interval_ms() -> u64 {
    500
}

fn default_event_capacity() -> usize {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dev_validators() -> usize {
    4
}

fn default_dev_stake() -> u64 {
    1_000_000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check constraints the serde defaults cannot express. Zero values
    /// here would panic channel and timer construction at startup.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.event_capacity == 0 {
            return Err(NodeError::Config(
                "event_capacity must be non-zero".to_string(),
            ));
        }
        if self.block_interval_ms == 0 {
            return Err(NodeError::Config(
                "block_interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            block_interval_ms: default_block_interval_ms(),
            event_capacity: default_event_capacity(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            dev_validators: default_dev_validators(),
            dev_stake: default_dev_stake(),
            consensus: ConsensusParams::default(),
        }
    }
}
