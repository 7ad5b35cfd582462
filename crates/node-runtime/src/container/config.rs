//! # Node Configuration
//!
//! Unified configuration for all components and runtime parameters.
//!
//! ## Loading Order
//!
//! 1. Built-in defaults (every field has one)
//! 2. TOML file named by `DG_CONFIG`, if set
//! 3. Environment overrides: `DG_LOG_LEVEL`, `DG_TICK_PERIOD_MS`,
//!    `DG_REQUEST_TIMEOUT_MS`, `DG_LOCAL_NODES`

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use dg_03_deploy_pool::MempoolConfig;
use dg_04_proposer::ProposerConfig;
use dg_05_gossip::GossipConfig;
use dg_06_connectivity::ConnectivityConfig;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "DG_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NodeConfig {
    /// Block gossip.
    pub gossip: GossipConfig,
    /// Peer reconciliation.
    pub connectivity: ConnectivityConfig,
    /// Pending deploys.
    pub mempool: MempoolConfig,
    /// Block proposal.
    pub proposer: ProposerConfig,
    /// Local network topology.
    pub network: NetworkConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Seeds the shared genesis block; nodes with different names never
    /// exchange blocks.
    pub chain_name: String,
    /// Nodes started by the local-network binary.
    pub local_nodes: usize,
    /// Interval between blocks proposed by the binary.
    pub propose_interval_ms: u64,
}

impl NetworkConfig {
    pub fn propose_interval(&self) -> Duration {
        Duration::from_millis(self.propose_interval_ms.max(1))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_name: "dag-gossip-local".to_string(),
            local_nodes: 4,
            propose_interval_ms: 2_000,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl NodeConfig {
    /// Load defaults, the optional `DG_CONFIG` file and env overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse TOML configuration")
    }

    /// Apply `DG_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("DG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(raw) = lookup("DG_TICK_PERIOD_MS") {
            self.connectivity.tick_period_ms = parse_env("DG_TICK_PERIOD_MS", &raw)?;
        }
        if let Some(raw) = lookup("DG_REQUEST_TIMEOUT_MS") {
            self.gossip.request_timeout_ms = parse_env("DG_REQUEST_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("DG_LOCAL_NODES") {
            self.network.local_nodes = parse_env("DG_LOCAL_NODES", &raw)?;
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a number, got {:?}", key, raw))
}
