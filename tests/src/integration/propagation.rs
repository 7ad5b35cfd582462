//! # Propagation Scenarios
//!
//! Direct and multi-hop delivery of proposed blocks, and idempotence under
//! repeated advertisement.

#[cfg(test)]
mod tests {
    use node_runtime::LocalNetwork;

    use crate::harness::{
        fast_config, init_test_logging, propose_block, wait_for_block_hashes_on_all_nodes,
        wait_for_full_mesh, wait_for_peers_count_exactly, wait_until, DEFAULT_TIMEOUT,
        QUIET_PERIOD,
    };

    // =============================================================================
    // TWO NODES
    // =============================================================================

    /// node0 proposes X on genesis; node1 stores X.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_block_reaches_direct_peer() {
        init_test_logging();
        let network = LocalNetwork::start(2, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();
        let genesis = network.node(0).tips()[0];

        let x = propose_block(network.node(0), 0, "X").await;

        wait_for_block_hashes_on_all_nodes(network.nodes(), &[genesis, x], DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(network.node(1).tips(), vec![x]);

        network.shutdown().await;
    }

    /// A run of blocks proposed back to back arrives complete and in order.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_chain_of_blocks_arrives_in_topological_order() {
        init_test_logging();
        let network = LocalNetwork::start(2, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        let mut chain = Vec::new();
        for i in 0..5 {
            chain.push(propose_block(network.node(0), 0, &format!("block-{}", i)).await);
        }

        wait_for_block_hashes_on_all_nodes(network.nodes(), &chain, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(network.node(0).block_hashes(), network.node(1).block_hashes());

        network.shutdown().await;
    }

    // =============================================================================
    // LINE TOPOLOGY
    // =============================================================================

    /// 0 - 1 - 2 with no 0-2 edge: node2 still gets node0's block via node1.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_block_crosses_multiple_hops() {
        init_test_logging();
        let network = LocalNetwork::line(3, &fast_config());
        wait_for_peers_count_exactly(network.node(0), 1, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_peers_count_exactly(network.node(1), 2, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_peers_count_exactly(network.node(2), 1, DEFAULT_TIMEOUT)
            .await
            .unwrap();

        let y = propose_block(network.node(0), 0, "Y").await;

        wait_for_block_hashes_on_all_nodes(network.nodes(), &[y], DEFAULT_TIMEOUT)
            .await
            .unwrap();
        let (id0, id2) = (network.node(0).id(), network.node(2).id());
        assert!(!network.network().is_linked(id0, id2));

        network.shutdown().await;
    }

    /// Blocks from both ends of a line meet in the middle and cross over.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_line_converges_from_both_ends() {
        init_test_logging();
        let network = LocalNetwork::line(4, &fast_config());
        wait_for_peers_count_exactly(network.node(0), 1, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_peers_count_exactly(network.node(3), 1, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_peers_count_exactly(network.node(1), 2, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_peers_count_exactly(network.node(2), 2, DEFAULT_TIMEOUT)
            .await
            .unwrap();

        let left = propose_block(network.node(0), 0, "left").await;
        let right = propose_block(network.node(3), 3, "right").await;

        wait_for_block_hashes_on_all_nodes(network.nodes(), &[left, right], DEFAULT_TIMEOUT)
            .await
            .unwrap();

        network.shutdown().await;
    }

    // =============================================================================
    // IDEMPOTENCE
    // =============================================================================

    /// Re-advertisement after a reconnect (catch-up) stores nothing twice.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reconnect_catch_up_is_idempotent() {
        init_test_logging();
        let network = LocalNetwork::start(3, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        let x = propose_block(network.node(0), 0, "X").await;
        wait_for_block_hashes_on_all_nodes(network.nodes(), &[x], DEFAULT_TIMEOUT)
            .await
            .unwrap();

        network.disconnect(0, 1);
        wait_for_peers_count_exactly(network.node(0), 1, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        network.connect(0, 1);
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        // Let the catch-up advertisements play out.
        tokio::time::sleep(QUIET_PERIOD).await;
        for node in network.nodes() {
            assert_eq!(node.block_count(), 2);
            assert_eq!(node.tips(), vec![x]);
            let stats = node.store_stats();
            assert_eq!(stats.blocks, 2);
            assert_eq!(stats.tips, 1);
        }
        wait_until("fetch table to drain", DEFAULT_TIMEOUT, || {
            network.nodes().iter().all(|n| n.gossip_stats().in_flight == 0)
        })
        .await
        .unwrap();

        network.shutdown().await;
    }
}
