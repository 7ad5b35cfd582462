//! # DAG-Gossip Local Network
//!
//! Starts `network.local_nodes` nodes on an in-memory network, proposes a
//! block from a rotating node every `network.propose_interval_ms` and logs
//! how far each node has converged. Exits on Ctrl+C.

use anyhow::{Context, Result};
use tracing::{info, warn};

use node_runtime::telemetry::init_tracing;
use node_runtime::{LocalNetwork, NodeConfig};
use shared_types::AccountId;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!("===========================================");
    info!("  DAG-Gossip Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("  Chain: {}", config.network.chain_name);
    info!("  Nodes: {}", config.network.local_nodes);
    info!("===========================================");

    if config.network.local_nodes == 0 {
        anyhow::bail!("network.local_nodes must be at least 1");
    }

    let network = LocalNetwork::start(config.network.local_nodes, &config);
    let mut interval = tokio::time::interval(config.network.propose_interval());
    // The first tick fires immediately; give the monitors a period to connect.
    interval.tick().await;

    let mut round: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                propose_round(&network, round).await;
                round += 1;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                info!("Shutdown signal received");
                break;
            }
        }
    }

    network.shutdown().await;
    info!("Local network stopped after {} round(s)", round);
    Ok(())
}

async fn propose_round(network: &LocalNetwork, round: u64) {
    let index = (round as usize) % network.len();
    let node = network.node(index);
    let account = AccountId::from_seed(index as u64);

    match node
        .deploy_and_propose(account, format!("round-{}", round).into_bytes())
        .await
    {
        Ok(hash) => info!(
            "Round {}: node {} proposed {}",
            round,
            node.id(),
            shared_types::short_hex(&hash)
        ),
        Err(e) => warn!("Round {}: node {} failed to propose: {}", round, node.id(), e),
    }

    let counts: Vec<usize> = network.nodes().iter().map(|n| n.block_count()).collect();
    let converged = counts.windows(2).all(|w| w[0] == w[1]);
    info!(
        "Block counts {:?} ({})",
        counts,
        if converged { "converged" } else { "propagating" }
    );
}
