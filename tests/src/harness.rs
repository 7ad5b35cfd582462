//! # Test Harness
//!
//! Helpers that poll the node observability hooks (block presence,
//! connected-peer count) until a condition holds or a deadline passes.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing_subscriber::EnvFilter;

use node_runtime::{LocalNetwork, Node, NodeConfig};
use shared_types::{short_hex, AccountId, Hash};

/// Default wait for propagation and reconnection.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to keep watching when asserting that something does NOT happen.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },
}

/// Install a test log writer once; honours `RUST_LOG`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Short tick, request and handshake timeouts so scenarios run quickly.
pub fn fast_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.network.chain_name = "dg-tests".to_string();
    config.connectivity.tick_period_ms = 50;
    config.connectivity.handshake_timeout_ms = 100;
    config.gossip.request_timeout_ms = 200;
    config
}

/// Poll `condition` until it holds.
pub async fn wait_until<F>(what: &str, timeout: Duration, condition: F) -> Result<(), HarnessError>
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::Timeout {
                what: what.to_string(),
                waited: timeout,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Wait until every node stores every hash in `hashes`.
pub async fn wait_for_block_hashes_on_all_nodes(
    nodes: &[Arc<Node>],
    hashes: &[Hash],
    timeout: Duration,
) -> Result<(), HarnessError> {
    let what = format!(
        "blocks [{}] on {} node(s)",
        hashes.iter().map(short_hex).collect::<Vec<_>>().join(", "),
        nodes.len()
    );
    wait_until(&what, timeout, || nodes.iter().all(|n| n.has_blocks(hashes))).await
}

/// Wait until `node` has exactly `count` connected peers.
pub async fn wait_for_peers_count_exactly(
    node: &Node,
    count: usize,
    timeout: Duration,
) -> Result<(), HarnessError> {
    let what = format!("node {} to have {} peer(s)", node.id(), count);
    wait_until(&what, timeout, || node.connected_peer_count() == count).await
}

/// Wait until each node is connected to every other node.
pub async fn wait_for_full_mesh(network: &LocalNetwork, timeout: Duration) -> Result<(), HarnessError> {
    let expected = network.len().saturating_sub(1);
    for node in network.nodes() {
        wait_for_peers_count_exactly(node, expected, timeout).await?;
    }
    Ok(())
}

/// Submit a deploy from `account_seed` on `node` and propose a block with it.
pub async fn propose_block(node: &Node, account_seed: u64, tag: &str) -> Hash {
    node.deploy_and_propose(AccountId::from_seed(account_seed), tag.as_bytes().to_vec())
        .await
        .unwrap_or_else(|e| panic!("node {} failed to propose {}: {}", node.id(), tag, e))
}

/// `true` if none of `nodes` stores `hash`.
pub fn none_have(nodes: &[&Arc<Node>], hash: &Hash) -> bool {
    nodes.iter().all(|n| !n.has_block(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_until_reports_what_timed_out() {
        let err = wait_until("nothing", Duration::from_millis(20), || false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nothing"));
    }

    #[tokio::test]
    async fn test_wait_until_returns_immediately_when_true() {
        wait_until("always", Duration::from_millis(0), || true)
            .await
            .unwrap();
    }
}
