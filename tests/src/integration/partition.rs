//! # Partition and Rejoin Scenarios
//!
//! While partitioned, each side converges only among itself. After the links
//! come back, the monitors reconnect, catch-up advertisements flow both ways
//! and every node ends up with the union of both sides.

#[cfg(test)]
mod tests {
    use node_runtime::LocalNetwork;

    use crate::harness::{
        fast_config, init_test_logging, none_have, propose_block,
        wait_for_block_hashes_on_all_nodes, wait_for_full_mesh, wait_for_peers_count_exactly,
        DEFAULT_TIMEOUT, QUIET_PERIOD,
    };

    const LEFT: [usize; 2] = [0, 1];
    const RIGHT: [usize; 2] = [2, 3];

    /// Four nodes split into {0,1} and {2,3}; P on the left, Q on the right,
    /// then R after healing.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_partition_then_rejoin() {
        init_test_logging();
        let network = LocalNetwork::start(4, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();
        let genesis = network.node(0).tips()[0];

        network.partition(&LEFT, &RIGHT);
        for i in 0..4 {
            wait_for_peers_count_exactly(network.node(i), 1, DEFAULT_TIMEOUT)
                .await
                .unwrap();
        }

        let p = propose_block(network.node(0), 0, "P").await;
        let q = propose_block(network.node(2), 2, "Q").await;

        let left = [network.node(0).clone(), network.node(1).clone()];
        let right = [network.node(2).clone(), network.node(3).clone()];
        wait_for_block_hashes_on_all_nodes(&left, &[p], DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_block_hashes_on_all_nodes(&right, &[q], DEFAULT_TIMEOUT)
            .await
            .unwrap();

        // No cross-partition block appears while the links stay cut.
        tokio::time::sleep(QUIET_PERIOD).await;
        assert!(none_have(&[&left[0], &left[1]], &q));
        assert!(none_have(&[&right[0], &right[1]], &p));

        network.heal(&LEFT, &RIGHT);
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();
        let r = propose_block(network.node(0), 0, "R").await;

        wait_for_block_hashes_on_all_nodes(network.nodes(), &[genesis, p, q, r], DEFAULT_TIMEOUT)
            .await
            .unwrap();

        network.shutdown().await;
    }

    /// Blocks produced on both sides during a partition all arrive after
    /// rejoin, including ancestors the far side never saw advertised live.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rejoin_delivers_every_block_from_both_sides() {
        init_test_logging();
        let network = LocalNetwork::start(2, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        network.disconnect(0, 1);
        wait_for_peers_count_exactly(network.node(0), 0, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        wait_for_peers_count_exactly(network.node(1), 0, DEFAULT_TIMEOUT)
            .await
            .unwrap();

        let mut produced = Vec::new();
        for i in 0..3 {
            produced.push(propose_block(network.node(0), 0, &format!("a{}", i)).await);
        }
        for i in 0..2 {
            produced.push(propose_block(network.node(1), 1, &format!("b{}", i)).await);
        }
        assert_eq!(network.node(0).block_count(), 4);
        assert_eq!(network.node(1).block_count(), 3);

        network.connect(0, 1);
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();
        produced.push(propose_block(network.node(1), 1, "after").await);

        wait_for_block_hashes_on_all_nodes(network.nodes(), &produced, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(network.node(0).block_count(), 7);
        assert_eq!(network.node(1).block_count(), 7);

        network.shutdown().await;
    }

    /// Peer counts follow the partition and recover after healing.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peer_counts_track_partition() {
        init_test_logging();
        let network = LocalNetwork::start(4, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        network.partition(&[0], &[1, 2, 3]);
        wait_for_peers_count_exactly(network.node(0), 0, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        for i in 1..4 {
            wait_for_peers_count_exactly(network.node(i), 2, DEFAULT_TIMEOUT)
                .await
                .unwrap();
        }

        network.heal(&[0], &[1, 2, 3]);
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        network.shutdown().await;
    }
}
