//! Tests for RPC Handler Adapter
use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::adapters::{InMemoryStore, NodeCache};
use crate::domain::{Node, NodeId, ReputationRecord, SamplingStrategy, SelectionPolicy};
use crate::metrics::DiscoveryMetrics;
use crate::service::NodeDiscoveryService;

type TestHandler = ApiHandler<NodeDiscoveryService<InMemoryStore>>;

async fn handler_with(nodes: &[Node], policy: SelectionPolicy) -> TestHandler {
    let metrics = Arc::new(DiscoveryMetrics::new());
    let cache = NodeCache::new(Arc::new(InMemoryStore::new()), Arc::clone(&metrics));
    for node in nodes {
        cache.put(node).await.unwrap();
    }
    let service = NodeDiscoveryService::new(cache, policy, 2, Arc::clone(&metrics));
    ApiHandler::new(service, metrics)
}

fn node(id: u8, audits: u64) -> Node {
    Node::new(
        NodeId::new(vec![0xA0, id]),
        format!("10.0.0.{id}:7777"),
        ReputationRecord::with_audit_count(audits),
    )
}

fn ordered(threshold: u64, fraction: f64) -> SelectionPolicy {
    SelectionPolicy::new(threshold, fraction).with_sampling(SamplingStrategy::Ordered)
}

#[tokio::test]
async fn test_ping() {
    let handler = handler_with(&[], ordered(0, 0.0)).await;
    let result = handler.handle("ping", &json!(null)).await.unwrap();
    assert_eq!(result["status"], "ok");
}

#[tokio::test]
async fn test_unknown_method() {
    let handler = handler_with(&[], ordered(0, 0.0)).await;
    let err = handler.handle("drop_tables", &json!({})).await.unwrap_err();
    assert_eq!(err.code, ApiError::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_find_storage_nodes_default_amount() {
    let nodes: Vec<Node> = (1..=4).map(|i| node(i, 0)).collect();
    let handler = handler_with(&nodes, ordered(0, 0.0)).await;

    let result = handler.handle("find_storage_nodes", &json!(null)).await.unwrap();
    let response: FindStorageNodesResponse = serde_json::from_value(result).unwrap();
    assert_eq!(response.nodes.len(), 2);
    assert_eq!(response.nodes[0].id, "a001");
}

#[tokio::test]
async fn test_find_storage_nodes_with_exclusions() {
    let nodes: Vec<Node> = (1..=3).map(|i| node(i, 0)).collect();
    let handler = handler_with(&nodes, ordered(0, 0.0)).await;

    let result = handler
        .handle(
            "find_storage_nodes",
            &json!({ "amount": 3, "excluded": ["a002"] }),
        )
        .await
        .unwrap();
    let response: FindStorageNodesResponse = serde_json::from_value(result).unwrap();
    let ids: Vec<&str> = response.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a001", "a003"]);
}

#[tokio::test]
async fn test_resource_exhausted_status() {
    let handler = handler_with(&[], ordered(1, 0.5)).await;

    let err = handler
        .handle("find_storage_nodes", &json!({ "amount": 2 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ApiError::SERVER_ERROR);
    assert_eq!(err.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
}

#[tokio::test]
async fn test_negative_amount_is_invalid_params() {
    let handler = handler_with(&[node(1, 0)], ordered(0, 0.0)).await;

    let err = handler
        .handle("find_storage_nodes", &json!({ "amount": -1 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ApiError::INVALID_PARAMS);
    assert_eq!(err.status.as_deref(), Some("INVALID_ARGUMENT"));
}

#[tokio::test]
async fn test_bad_hex_id_is_invalid_params() {
    let handler = handler_with(&[], ordered(0, 0.0)).await;
    let err = handler
        .handle("lookup", &json!({ "node_id": "xyz" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ApiError::INVALID_PARAMS);
}

#[tokio::test]
async fn test_lookup_hit_and_miss() {
    let handler = handler_with(&[node(1, 0)], ordered(0, 0.0)).await;

    let hit = handler.handle("lookup", &json!({ "node_id": "a001" })).await.unwrap();
    assert_eq!(hit["node"]["address"], "10.0.0.1:7777");

    let miss = handler.handle("lookup", &json!({ "node_id": "ffff" })).await.unwrap();
    assert!(miss["node"].is_null());
    assert_eq!(miss["node_id"], "ffff");
}

#[tokio::test]
async fn test_bulk_lookup_in_order() {
    let nodes: Vec<Node> = (1..=3).map(|i| node(i, 0)).collect();
    let handler = handler_with(&nodes, ordered(0, 0.0)).await;

    let result = handler
        .handle("bulk_lookup", &json!({ "node_ids": ["a003", "beef", "a001"] }))
        .await
        .unwrap();
    let response: BulkLookupResponse = serde_json::from_value(result).unwrap();

    assert_eq!(response.results.len(), 3);
    assert_eq!(response.results[0].node.as_ref().unwrap().address, "10.0.0.3:7777");
    assert!(response.results[1].node.is_none());
    assert_eq!(response.results[2].node.as_ref().unwrap().address, "10.0.0.1:7777");
}

#[tokio::test]
async fn test_find_closest_nodes() {
    let nodes: Vec<Node> = (1..=4).map(|i| node(i, 0)).collect();
    let handler = handler_with(&nodes, ordered(0, 0.0)).await;

    let result = handler
        .handle("find_closest_nodes", &json!({ "target": "a004", "limit": 2 }))
        .await
        .unwrap();
    let closest: Vec<RpcClosestNode> = serde_json::from_value(result).unwrap();

    assert_eq!(closest.len(), 2);
    assert_eq!(closest[0].node.id, "a004");
    assert_eq!(closest[0].distance, "0");
    // 04^01 = 5, 04^02 = 6, 04^03 = 7
    assert_eq!(closest[1].node.id, "a001");
    assert_eq!(closest[1].distance, "5");
}

#[tokio::test]
async fn test_get_metrics() {
    let handler = handler_with(&[node(1, 0)], ordered(0, 0.0)).await;
    handler.handle("lookup", &json!({ "node_id": "a001" })).await.unwrap();
    handler.handle("lookup", &json!({ "node_id": "a009" })).await.unwrap();

    let metrics = handler.handle("get_metrics", &json!(null)).await.unwrap();
    assert_eq!(metrics["lookups"], 2);
    assert_eq!(metrics["lookup_misses"], 1);
}
