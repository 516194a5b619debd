//! End-to-end discovery over a store opened from a database URL.

use std::sync::Arc;

use ov_01_node_discovery::{
    open_store, DiscoveryError, DiscoveryMetrics, DiscoveryRequest, KeyValueStore, Node,
    NodeCache, NodeDiscoveryApi, NodeDiscoveryService, NodeId, ReputationRecord,
    SamplingStrategy, SelectionPolicy,
};

type Service = NodeDiscoveryService<dyn KeyValueStore>;

fn storage_node(i: usize, audit_count: u64) -> Node {
    let mut id = vec![0u8; 32];
    id[0] = 0x5A;
    id[31] = i as u8;
    Node::new(
        NodeId::new(id),
        format!("127.0.0.1:555{i}"),
        ReputationRecord::with_audit_count(audit_count),
    )
}

async fn planet(nodes: &[Node], policy: SelectionPolicy, default_amount: usize) -> Service {
    let metrics = Arc::new(DiscoveryMetrics::new());
    let store = open_store("memory://").expect("memory store");
    let cache = NodeCache::new(store, Arc::clone(&metrics));
    for node in nodes {
        cache.put(node).await.expect("seed node");
    }
    NodeDiscoveryService::new(cache, policy, default_amount, metrics)
}

#[tokio::test]
async fn test_server() {
    let nodes: Vec<Node> = (0..4).map(|i| storage_node(i, 0)).collect();
    let server = planet(&nodes, SelectionPolicy::new(0, 0.0), 2).await;

    // FindStorageNodes
    let result = server
        .find_storage_nodes(DiscoveryRequest::new(2))
        .await
        .expect("find storage nodes");
    assert_eq!(result.len(), 2);

    // Lookup
    let result = server.lookup(&nodes[0].id).await.expect("lookup");
    assert_eq!(result.node.expect("node found").address, nodes[0].address);

    // BulkLookup
    let ids: Vec<NodeId> = nodes[..3].iter().map(|n| n.id.clone()).collect();
    let results = server.bulk_lookup(&ids).await.expect("bulk lookup");
    assert_eq!(results.len(), 3);
    for (i, result) in results.iter().enumerate() {
        let node = result.node.as_ref().expect("node found");
        assert_eq!(node.address, nodes[i].address);
    }
}

struct FilteringCase {
    name: &'static str,
    total_nodes: usize,
    reputable_nodes: usize,
    requested: i64,
    new_node_fraction: f64,
    expected_len: Option<usize>,
}

#[tokio::test]
async fn test_new_node_filtering() {
    let threshold = 1;
    let cases = [
        FilteringCase {
            name: "no nodes at all",
            total_nodes: 0,
            reputable_nodes: 0,
            requested: 2,
            new_node_fraction: 0.5,
            expected_len: None,
        },
        FilteringCase {
            name: "fewer than required reputable nodes",
            total_nodes: 4,
            reputable_nodes: 3,
            requested: 4,
            new_node_fraction: 0.0,
            expected_len: Some(3),
        },
        FilteringCase {
            name: "more than required reputable nodes",
            total_nodes: 4,
            reputable_nodes: 3,
            requested: 2,
            new_node_fraction: 0.0,
            expected_len: Some(2),
        },
        FilteringCase {
            name: "more than required new nodes",
            total_nodes: 4,
            reputable_nodes: 2,
            requested: 2,
            new_node_fraction: 0.5,
            expected_len: Some(3),
        },
        FilteringCase {
            name: "fewer than required new nodes",
            total_nodes: 4,
            reputable_nodes: 3,
            requested: 2,
            new_node_fraction: 0.5,
            expected_len: Some(3),
        },
        FilteringCase {
            name: "zero new nodes found, only reputable nodes",
            total_nodes: 4,
            reputable_nodes: 4,
            requested: 3,
            new_node_fraction: 0.5,
            expected_len: Some(3),
        },
        FilteringCase {
            name: "exactly the required amount of new and reputable nodes",
            total_nodes: 4,
            reputable_nodes: 1,
            requested: 1,
            new_node_fraction: 1.0,
            expected_len: Some(2),
        },
        FilteringCase {
            name: "low percentage of new nodes",
            total_nodes: 4,
            reputable_nodes: 1,
            requested: 3,
            new_node_fraction: 0.01,
            expected_len: Some(2),
        },
        FilteringCase {
            name: "zero reputable nodes, only new nodes",
            total_nodes: 4,
            reputable_nodes: 0,
            requested: 2,
            new_node_fraction: 0.5,
            expected_len: Some(1),
        },
        FilteringCase {
            name: "zero reputable nodes, only new nodes, no new quota",
            total_nodes: 4,
            reputable_nodes: 0,
            requested: 2,
            new_node_fraction: 0.0,
            expected_len: None,
        },
        FilteringCase {
            name: "0% new nodes requested",
            total_nodes: 4,
            reputable_nodes: 1,
            requested: 1,
            new_node_fraction: 0.0,
            expected_len: Some(1),
        },
    ];

    for case in cases {
        let nodes: Vec<Node> = (0..case.total_nodes)
            .map(|i| {
                let audits = if i < case.reputable_nodes { threshold } else { 0 };
                storage_node(i, audits)
            })
            .collect();
        let policy = SelectionPolicy::new(threshold, case.new_node_fraction)
            .with_sampling(SamplingStrategy::Random { seed: Some(7) });
        let server = planet(&nodes, policy, 2).await;

        let result = server
            .find_storage_nodes(DiscoveryRequest::new(case.requested))
            .await;

        match case.expected_len {
            None => assert!(
                matches!(result, Err(DiscoveryError::ResourceExhausted { .. })),
                "{}",
                case.name
            ),
            Some(len) => {
                let result = result.unwrap_or_else(|e| panic!("{}: {e}", case.name));
                assert_eq!(result.len(), len, "{}", case.name);
            }
        }
    }
}

#[tokio::test]
async fn test_unsupported_scheme() {
    let err = open_store("bolt://overlay.db").err().expect("scheme rejected");
    assert_eq!(err.to_string(), "unsupported db scheme: bolt");
}
