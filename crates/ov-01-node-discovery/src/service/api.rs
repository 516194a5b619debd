use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::NodeDiscoveryService;
use crate::domain::{
    find_k_closest, select_storage_nodes, DiscoveryError, DiscoveryRequest, DiscoveryResult,
    LookupResult, NodeId, XorQueueEntry,
};
use crate::ports::{KeyValueStore, NodeDiscoveryApi};

#[async_trait]
impl<S: KeyValueStore + ?Sized> NodeDiscoveryApi for NodeDiscoveryService<S> {
    #[instrument(
        skip(self, request),
        fields(amount = request.amount, excluded = request.excluded.len())
    )]
    async fn find_storage_nodes(
        &self,
        request: DiscoveryRequest,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        // Reject bad input before the store is touched.
        let amount = self.effective_amount(request.validated_amount()?);
        self.policy.validate()?;

        if let Some(restrictions) = &request.restrictions {
            debug!(
                free_bandwidth = restrictions.free_bandwidth,
                free_disk = restrictions.free_disk,
                "placement restrictions not evaluated"
            );
        }

        let candidates = self.cache.all().await?;
        match select_storage_nodes(&candidates, amount, &request.excluded, &self.policy) {
            Ok(selection) => {
                debug!(
                    reputable = selection.reputable.len(),
                    new = selection.new.len(),
                    "selected storage nodes"
                );
                let nodes = selection.into_nodes();
                self.metrics.record_selection(nodes.len());
                Ok(DiscoveryResult { nodes })
            }
            Err(e @ DiscoveryError::ResourceExhausted { .. }) => {
                info!(amount, candidates = candidates.len(), "no eligible storage nodes");
                self.metrics.record_exhausted();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, node_id), fields(node_id = %node_id))]
    async fn lookup(&self, node_id: &NodeId) -> Result<LookupResult, DiscoveryError> {
        let node = self.cache.get(node_id).await?;
        self.metrics.record_lookup(node.is_some());
        Ok(LookupResult {
            node_id: node_id.clone(),
            node,
        })
    }

    #[instrument(skip(self, node_ids), fields(count = node_ids.len()))]
    async fn bulk_lookup(&self, node_ids: &[NodeId]) -> Result<Vec<LookupResult>, DiscoveryError> {
        let mut results = Vec::with_capacity(node_ids.len());
        for node_id in node_ids {
            let node = self.cache.get(node_id).await?;
            self.metrics.record_lookup(node.is_some());
            results.push(LookupResult {
                node_id: node_id.clone(),
                node,
            });
        }
        Ok(results)
    }

    #[instrument(skip(self, target), fields(target = %target))]
    async fn find_closest_nodes(
        &self,
        target: &NodeId,
        limit: usize,
    ) -> Result<Vec<XorQueueEntry>, DiscoveryError> {
        let nodes = self.cache.all().await?;
        Ok(find_k_closest(nodes, target, limit))
    }
}
