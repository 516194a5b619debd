//! # Driving Ports (Inbound API)
//!
//! These are the public APIs this subsystem exposes to the RPC layer.

use async_trait::async_trait;

use crate::domain::{
    DiscoveryError, DiscoveryRequest, DiscoveryResult, LookupResult, NodeId, XorQueueEntry,
};

/// Primary API for node discovery.
///
/// Every call is independent and holds no state across invocations, so
/// one implementation can serve many concurrent callers.
///
/// # Example
///
/// ```rust,ignore
/// use ov_01_node_discovery::ports::NodeDiscoveryApi;
///
/// async fn place<T: NodeDiscoveryApi>(api: &T) {
///     let result = api.find_storage_nodes(DiscoveryRequest::new(4)).await?;
///     println!("Selected {} nodes", result.len());
/// }
/// ```
#[async_trait]
pub trait NodeDiscoveryApi: Send + Sync {
    /// Select storage nodes for a placement.
    ///
    /// # Returns
    ///
    /// - `Ok(result)` with possibly fewer, or more, nodes than requested
    /// - `Err(ResourceExhausted)` if no eligible candidate exists at all
    /// - `Err(InvalidRequest)` for a negative amount or bad policy
    /// - `Err(StoreUnavailable)` if the node cache could not be read
    async fn find_storage_nodes(
        &self,
        request: DiscoveryRequest,
    ) -> Result<DiscoveryResult, DiscoveryError>;

    /// Look up one node. A miss is `Ok` with `found() == false`.
    async fn lookup(&self, node_id: &NodeId) -> Result<LookupResult, DiscoveryError>;

    /// Look up several nodes, one result per input id in input order.
    async fn bulk_lookup(&self, node_ids: &[NodeId]) -> Result<Vec<LookupResult>, DiscoveryError>;

    /// Up to `limit` known nodes ordered by XOR distance to `target`.
    async fn find_closest_nodes(
        &self,
        target: &NodeId,
        limit: usize,
    ) -> Result<Vec<XorQueueEntry>, DiscoveryError>;
}
