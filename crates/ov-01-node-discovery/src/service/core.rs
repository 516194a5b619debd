use std::sync::Arc;

use crate::adapters::NodeCache;
use crate::domain::SelectionPolicy;
use crate::metrics::DiscoveryMetrics;
use crate::ports::KeyValueStore;

/// Node Discovery Service implementing the driving port.
///
/// Holds no mutable state of its own: the node cache is read on every call
/// and the policy is fixed at construction.
///
/// # Example
///
/// ```rust,ignore
/// use ov_01_node_discovery::service::NodeDiscoveryService;
/// use ov_01_node_discovery::ports::NodeDiscoveryApi;
///
/// let metrics = Arc::new(DiscoveryMetrics::new());
/// let cache = NodeCache::new(open_store("memory://")?, Arc::clone(&metrics));
/// let service = NodeDiscoveryService::new(cache, SelectionPolicy::new(1, 0.5), 2, metrics);
///
/// let result = service.find_storage_nodes(DiscoveryRequest::new(0)).await?;
/// ```
pub struct NodeDiscoveryService<S: KeyValueStore + ?Sized> {
    pub(crate) cache: NodeCache<S>,
    pub(crate) policy: SelectionPolicy,
    pub(crate) default_amount: usize,
    pub(crate) metrics: Arc<DiscoveryMetrics>,
}

impl<S: KeyValueStore + ?Sized> NodeDiscoveryService<S> {
    /// Create a new node discovery service.
    ///
    /// # Arguments
    ///
    /// * `cache` - Node cache to select from
    /// * `policy` - Selection policy applied to every request
    /// * `default_amount` - Nodes returned when a request asks for zero
    /// * `metrics` - Shared counters
    pub fn new(
        cache: NodeCache<S>,
        policy: SelectionPolicy,
        default_amount: usize,
        metrics: Arc<DiscoveryMetrics>,
    ) -> Self {
        Self {
            cache,
            policy,
            default_amount,
            metrics,
        }
    }

    /// The node cache this service reads.
    pub fn cache(&self) -> &NodeCache<S> {
        &self.cache
    }

    /// The selection policy.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Shared counters.
    pub fn metrics(&self) -> &Arc<DiscoveryMetrics> {
        &self.metrics
    }

    /// Map a requested amount to the effective one (`0` means default).
    pub(crate) fn effective_amount(&self, requested: usize) -> usize {
        if requested == 0 {
            self.default_amount
        } else {
            requested
        }
    }
}
