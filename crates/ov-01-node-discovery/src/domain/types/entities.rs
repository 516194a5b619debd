//! Core Domain Entities for Node Discovery

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque, variable-length node identifier.
///
/// Identifiers are compared byte-for-byte. No fixed width is assumed: an
/// identifier may be shorter or longer than a canonical hash length, and
/// distance computations treat the bytes as a big-endian unsigned integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NodeId(pub Vec<u8>);

impl NodeId {
    /// Create a NodeId from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the underlying bytes (also the cache key).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the identifier.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-length identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-case hex rendering used in logs and RPC payloads.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for NodeId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for NodeId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for NodeId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

/// Reputation snapshot of a storage node.
///
/// Produced by the audit subsystem; this crate only reads it. `audit_count`
/// decides reputable/new membership, the ratios feed the optional
/// reputation floor of the selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReputationRecord {
    /// Number of successful audits observed.
    pub audit_count: u64,
    /// Fraction of audits passed, in [0, 1].
    pub audit_success_ratio: f64,
    /// Fraction of uptime checks passed, in [0, 1].
    pub uptime_ratio: f64,
    /// Number of uptime checks observed.
    pub uptime_count: u64,
}

impl ReputationRecord {
    /// Reputation carrying only an audit count, with perfect ratios.
    pub fn with_audit_count(audit_count: u64) -> Self {
        Self {
            audit_count,
            audit_success_ratio: 1.0,
            uptime_ratio: 1.0,
            uptime_count: 0,
        }
    }
}

/// Immutable snapshot of a storage node as read from the node cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Network address, e.g. `host:port`. Opaque to this crate.
    pub address: String,
    /// Reputation at the time of the read.
    pub reputation: ReputationRecord,
}

impl Node {
    /// Create a new node snapshot.
    pub fn new(id: NodeId, address: impl Into<String>, reputation: ReputationRecord) -> Self {
        Self {
            id,
            address: address.into(),
            reputation,
        }
    }

    /// Whether this node counts as reputable under `threshold`.
    ///
    /// Recomputed on every call; classification is never cached.
    pub fn is_reputable(&self, threshold: u64) -> bool {
        self.reputation.audit_count >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_hex_round_trip() {
        let id = NodeId::new(vec![0x00, 0xab, 0xff]);
        assert_eq!(id.to_string(), "00abff");
        assert_eq!("00abff".parse::<NodeId>().unwrap(), id);
    }

    #[test]
    fn test_node_id_rejects_bad_hex() {
        assert!("zz".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_reputable_threshold_is_inclusive() {
        let node = Node::new(
            NodeId::new(vec![1]),
            "127.0.0.1:7777",
            ReputationRecord::with_audit_count(3),
        );
        assert!(node.is_reputable(3));
        assert!(!node.is_reputable(4));
        assert!(node.is_reputable(0));
    }
}
