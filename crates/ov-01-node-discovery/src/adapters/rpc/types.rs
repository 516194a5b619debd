use serde::{Deserialize, Serialize};

use crate::domain::{Node, PlacementRestrictions, XorQueueEntry};

/// Node formatted for JSON responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcNode {
    /// Node ID as hex string
    pub id: String,
    /// Network address
    pub address: String,
    pub audit_count: u64,
    pub audit_success_ratio: f64,
    pub uptime_ratio: f64,
    pub uptime_count: u64,
}

impl From<&Node> for RpcNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.to_hex(),
            address: node.address.clone(),
            audit_count: node.reputation.audit_count,
            audit_success_ratio: node.reputation.audit_success_ratio,
            uptime_ratio: node.reputation.uptime_ratio,
            uptime_count: node.reputation.uptime_count,
        }
    }
}

/// Params for `find_storage_nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindStorageNodesRequest {
    /// Nodes wanted. Zero or absent means the service default.
    #[serde(default)]
    pub amount: i64,
    /// Hex ids to leave out.
    #[serde(default)]
    pub excluded: Vec<String>,
    #[serde(default)]
    pub restrictions: Option<PlacementRestrictions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindStorageNodesResponse {
    pub nodes: Vec<RpcNode>,
}

/// Params for `lookup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub node_id: String,
    /// `null` when the id is unknown.
    pub node: Option<RpcNode>,
}

/// Params for `bulk_lookup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkLookupRequest {
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkLookupResponse {
    /// One entry per requested id, in request order.
    pub results: Vec<LookupResponse>,
}

fn default_limit() -> usize {
    20
}

/// Params for `find_closest_nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindClosestRequest {
    /// Hex target id
    pub target: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// A node with its XOR distance to the query target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcClosestNode {
    pub node: RpcNode,
    /// Lower-case hex of the distance
    pub distance: String,
}

impl From<&XorQueueEntry> for RpcClosestNode {
    fn from(entry: &XorQueueEntry) -> Self {
        Self {
            node: RpcNode::from(&entry.node),
            distance: entry.priority.to_str_radix(16),
        }
    }
}

/// Error type for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// JSON-RPC error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Status name for domain failures, e.g. `RESOURCE_EXHAUSTED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ApiError {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const SERVER_ERROR: i32 = -32000;

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method),
            status: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.into(),
            status: Some(crate::domain::StatusCode::InvalidArgument.to_string()),
        }
    }
}

impl From<crate::domain::DiscoveryError> for ApiError {
    fn from(err: crate::domain::DiscoveryError) -> Self {
        let status = err.status_code();
        let code = match status {
            crate::domain::StatusCode::InvalidArgument => Self::INVALID_PARAMS,
            _ => Self::SERVER_ERROR,
        };
        Self {
            code,
            message: err.to_string(),
            status: Some(status.to_string()),
        }
    }
}
