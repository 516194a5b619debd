//! # Node Cache Accessor
//!
//! Reads and writes [`Node`] records in a [`KeyValueStore`]. Keys are the
//! raw identifier bytes; values are `bincode`-encoded [`NodeRecord`]s.
//!
//! A record that fails to decode is logged, counted and skipped. It never
//! fails a scan and never turns into a store error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{DecodeError, Node, NodeId, ReputationRecord};
use crate::metrics::DiscoveryMetrics;
use crate::ports::{KeyScan, KeyValueStore, StoreError};

/// Stored form of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: Vec<u8>,
    pub address: String,
    pub audit_count: u64,
    pub audit_success_ratio: f64,
    pub uptime_ratio: f64,
    pub uptime_count: u64,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.as_bytes().to_vec(),
            address: node.address.clone(),
            audit_count: node.reputation.audit_count,
            audit_success_ratio: node.reputation.audit_success_ratio,
            uptime_ratio: node.reputation.uptime_ratio,
            uptime_count: node.reputation.uptime_count,
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Node::new(
            NodeId::new(record.id),
            record.address,
            ReputationRecord {
                audit_count: record.audit_count,
                audit_success_ratio: record.audit_success_ratio,
                uptime_ratio: record.uptime_ratio,
                uptime_count: record.uptime_count,
            },
        )
    }
}

/// Encode a node for storage.
pub fn encode_node(node: &Node) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(&NodeRecord::from(node))
}

/// Decode the record stored under `key`.
///
/// The id inside the record must equal the key.
pub fn decode_node(key: &[u8], value: &[u8]) -> Result<Node, DecodeError> {
    let record: NodeRecord = bincode::deserialize(value)?;
    if record.id != key {
        return Err(DecodeError::KeyMismatch {
            key: hex::encode(key),
            id: hex::encode(&record.id),
        });
    }
    Ok(record.into())
}

/// Typed view of the node store.
pub struct NodeCache<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    metrics: Arc<DiscoveryMetrics>,
}

impl<S: KeyValueStore + ?Sized> Clone for NodeCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S: KeyValueStore + ?Sized> NodeCache<S> {
    /// Cache over `store`, counting skipped records in `metrics`.
    pub fn new(store: Arc<S>, metrics: Arc<DiscoveryMetrics>) -> Self {
        Self { store, metrics }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Write (or replace) a node record.
    pub async fn put(&self, node: &Node) -> Result<(), StoreError> {
        let value = encode_node(node).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.put(node.id.as_bytes().to_vec(), value).await
    }

    /// Read one node. Missing and undecodable records both read as `None`.
    pub async fn get(&self, id: &NodeId) -> Result<Option<Node>, StoreError> {
        let Some(value) = self.store.get(id.as_bytes()).await? else {
            return Ok(None);
        };
        Ok(self.decode_or_skip(id.as_bytes(), &value))
    }

    /// Every decodable node matched by `scan`, in key order.
    pub async fn list(&self, scan: &KeyScan) -> Result<Vec<Node>, StoreError> {
        let pairs = self.store.iterate(scan).await?;
        Ok(pairs
            .iter()
            .filter_map(|(key, value)| self.decode_or_skip(key, value))
            .collect())
    }

    /// Every decodable node in the store.
    pub async fn all(&self) -> Result<Vec<Node>, StoreError> {
        self.list(&KeyScan::All).await
    }

    fn decode_or_skip(&self, key: &[u8], value: &[u8]) -> Option<Node> {
        match decode_node(key, value) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!(key = %hex::encode(key), error = %e, "skipping undecodable node record");
                self.metrics.record_skipped();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;

    fn node(id: u8, audits: u64) -> Node {
        Node::new(
            NodeId::new(vec![id]),
            format!("127.0.0.1:{}", 7000 + id as u16),
            ReputationRecord::with_audit_count(audits),
        )
    }

    fn cache() -> (NodeCache<InMemoryStore>, Arc<DiscoveryMetrics>) {
        let metrics = Arc::new(DiscoveryMetrics::new());
        let cache = NodeCache::new(Arc::new(InMemoryStore::new()), Arc::clone(&metrics));
        (cache, metrics)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (cache, _) = cache();
        let n = node(1, 5);
        cache.put(&n).await.unwrap();

        assert_eq!(cache.get(&n.id).await.unwrap(), Some(n));
        assert_eq!(cache.get(&NodeId::new(vec![9])).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_skips_garbage_and_counts_it() {
        let (cache, metrics) = cache();
        cache.put(&node(1, 0)).await.unwrap();
        cache.put(&node(3, 2)).await.unwrap();
        cache.store().put(vec![2], vec![0xFF, 0x00]).await.unwrap();

        let nodes = cache.all().await.unwrap();
        let ids: Vec<_> = nodes.iter().map(|n| n.id.clone()).collect();

        assert_eq!(ids, vec![NodeId::new(vec![1]), NodeId::new(vec![3])]);
        assert_eq!(metrics.snapshot().records_skipped, 1);
    }

    #[tokio::test]
    async fn test_key_mismatch_is_corrupt() {
        let (cache, metrics) = cache();
        let value = encode_node(&node(4, 1)).unwrap();
        cache.store().put(vec![5], value).await.unwrap();

        assert_eq!(cache.get(&NodeId::new(vec![5])).await.unwrap(), None);
        assert_eq!(metrics.snapshot().records_skipped, 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (cache, _) = cache();
        cache.store().close().await.unwrap();

        assert_eq!(cache.all().await, Err(StoreError::Closed));
    }

    #[test]
    fn test_decode_rejects_truncated_record() {
        let mut value = encode_node(&node(1, 1)).unwrap();
        value.truncate(value.len() / 2);
        assert!(matches!(decode_node(&[1], &value), Err(DecodeError::Malformed(_))));
    }
}
