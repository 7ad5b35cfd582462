//! # Concurrent Proposal Scenarios
//!
//! Every node proposes at the same time; every proposed block must reach
//! every node and the DAGs must agree.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use node_runtime::LocalNetwork;
    use shared_types::{AccountId, Hash};

    use crate::harness::{
        fast_config, init_test_logging, propose_block, wait_for_block_hashes_on_all_nodes,
        wait_for_full_mesh, DEFAULT_TIMEOUT,
    };

    const NODES: usize = 4;
    const ROUNDS: usize = 3;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_proposals_converge() {
        init_test_logging();
        let network = LocalNetwork::start(NODES, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        let tasks: Vec<_> = network
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let node = node.clone();
                tokio::spawn(async move {
                    let mut hashes = Vec::with_capacity(ROUNDS);
                    for round in 0..ROUNDS {
                        let tag = format!("node{}-round{}", i, round);
                        hashes.push(propose_block(&node, i as u64, &tag).await);
                    }
                    hashes
                })
            })
            .collect();

        let mut produced: Vec<Hash> = Vec::new();
        for task in tasks {
            produced.extend(task.await.unwrap());
        }
        assert_eq!(produced.iter().collect::<HashSet<_>>().len(), NODES * ROUNDS);

        wait_for_block_hashes_on_all_nodes(network.nodes(), &produced, DEFAULT_TIMEOUT)
            .await
            .unwrap();

        let expected_tips = network.node(0).tips();
        for node in network.nodes() {
            assert_eq!(node.block_count(), NODES * ROUNDS + 1);
            assert_eq!(node.tips(), expected_tips);
        }

        network.shutdown().await;
    }

    /// Several callers share one node: the proposer task serializes them and
    /// per-account nonces stay unique.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_one_node_many_concurrent_callers() {
        init_test_logging();
        let network = LocalNetwork::start(2, &fast_config());
        wait_for_full_mesh(&network, DEFAULT_TIMEOUT).await.unwrap();

        let tasks: Vec<_> = (0..8u64)
            .map(|account| {
                let node = network.node(0).clone();
                let account = AccountId::from_seed(100 + account);
                tokio::spawn(async move { node.deploy_and_propose(account, b"payload".to_vec()).await })
            })
            .collect();

        let mut produced = Vec::new();
        for task in tasks {
            // A caller whose deploy was swept into another caller's block
            // sees NoPendingDeploys; its deploy is still included.
            if let Ok(hash) = task.await.unwrap() {
                produced.push(hash);
            }
        }
        assert!(!produced.is_empty());
        assert_eq!(network.node(0).pending_deploys(), 0);

        wait_for_block_hashes_on_all_nodes(network.nodes(), &produced, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(
            network.node(1).block_count(),
            network.node(0).block_count()
        );

        network.shutdown().await;
    }
}
