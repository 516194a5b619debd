use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::types::*;
use crate::domain::{DiscoveryRequest, LookupResult, NodeId};
use crate::metrics::DiscoveryMetrics;
use crate::ports::NodeDiscoveryApi;

/// JSON request handler for the discovery service.
pub struct ApiHandler<A> {
    service: A,
    metrics: Arc<DiscoveryMetrics>,
}

impl<A: NodeDiscoveryApi> ApiHandler<A> {
    /// Create a new API handler.
    pub fn new(service: A, metrics: Arc<DiscoveryMetrics>) -> Self {
        Self { service, metrics }
    }

    /// Access the wrapped service.
    pub fn service(&self) -> &A {
        &self.service
    }

    /// Dispatch one request.
    pub async fn handle(&self, method: &str, params: &Value) -> Result<Value, ApiError> {
        debug!(method, "api request");
        match method {
            "find_storage_nodes" => self.handle_find_storage_nodes(parse_params(params)?).await,
            "lookup" => self.handle_lookup(parse_params(params)?).await,
            "bulk_lookup" => self.handle_bulk_lookup(parse_params(params)?).await,
            "find_closest_nodes" => self.handle_find_closest(parse_params(params)?).await,
            "get_metrics" => Ok(self.handle_get_metrics()),
            "ping" => Ok(self.handle_ping()),
            _ => Err(ApiError::method_not_found(method)),
        }
    }

    /// Handle find_storage_nodes request.
    pub async fn handle_find_storage_nodes(
        &self,
        req: FindStorageNodesRequest,
    ) -> Result<Value, ApiError> {
        let excluded = req
            .excluded
            .iter()
            .map(|id| parse_node_id(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut request = DiscoveryRequest::new(req.amount).with_excluded(excluded);
        request.restrictions = req.restrictions;

        let result = self.service.find_storage_nodes(request).await?;
        let response = FindStorageNodesResponse {
            nodes: result.nodes.iter().map(RpcNode::from).collect(),
        };
        Ok(serde_json::to_value(response).unwrap_or_default())
    }

    /// Handle lookup request.
    pub async fn handle_lookup(&self, req: LookupRequest) -> Result<Value, ApiError> {
        let id = parse_node_id(&req.node_id)?;
        let result = self.service.lookup(&id).await?;
        Ok(serde_json::to_value(lookup_response(&result)).unwrap_or_default())
    }

    /// Handle bulk_lookup request.
    pub async fn handle_bulk_lookup(&self, req: BulkLookupRequest) -> Result<Value, ApiError> {
        let ids = req
            .node_ids
            .iter()
            .map(|id| parse_node_id(id))
            .collect::<Result<Vec<_>, _>>()?;

        let results = self.service.bulk_lookup(&ids).await?;
        let response = BulkLookupResponse {
            results: results.iter().map(lookup_response).collect(),
        };
        Ok(serde_json::to_value(response).unwrap_or_default())
    }

    /// Handle find_closest_nodes request.
    pub async fn handle_find_closest(&self, req: FindClosestRequest) -> Result<Value, ApiError> {
        let target = parse_node_id(&req.target)?;
        let entries = self.service.find_closest_nodes(&target, req.limit).await?;
        let closest: Vec<RpcClosestNode> = entries.iter().map(RpcClosestNode::from).collect();
        Ok(serde_json::to_value(closest).unwrap_or_default())
    }

    /// Handle get_metrics request.
    pub fn handle_get_metrics(&self) -> Value {
        serde_json::to_value(self.metrics.snapshot()).unwrap_or_default()
    }

    /// Handle ping request (health check).
    pub fn handle_ping(&self) -> Value {
        serde_json::json!({
            "status": "ok",
            "subsystem": "ov-01-node-discovery"
        })
    }
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, ApiError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params.clone()
    };
    serde_json::from_value(params).map_err(|e| ApiError::invalid_params(e.to_string()))
}

fn parse_node_id(hex_id: &str) -> Result<NodeId, ApiError> {
    NodeId::from_str(hex_id)
        .map_err(|e| ApiError::invalid_params(format!("bad node id {hex_id:?}: {e}")))
}

fn lookup_response(result: &LookupResult) -> LookupResponse {
    LookupResponse {
        node_id: result.node_id.to_hex(),
        node: result.node.as_ref().map(RpcNode::from),
    }
}
