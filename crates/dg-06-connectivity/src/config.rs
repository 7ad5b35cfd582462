//! Connectivity configuration.

use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Reconciliation period in ms
    pub tick_period_ms: u64,
    /// Upper bound for one handshake in ms
    pub handshake_timeout_ms: u64,
}

impl ConnectivityConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1_000,
            handshake_timeout_ms: 500,
        }
    }
}
