//! Selection engine.

use std::collections::HashSet;

use tracing::debug;

use super::sampler::BucketSampler;
use crate::domain::{DiscoveryError, Node, NodeId, SelectionPolicy};

/// Candidates split by reputation, in stable input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition {
    /// `audit_count >= threshold`
    pub reputable: Vec<Node>,
    /// `audit_count < threshold`
    pub new: Vec<Node>,
}

impl Partition {
    /// Total candidates across both buckets.
    pub fn len(&self) -> usize {
        self.reputable.len() + self.new.len()
    }

    /// True when both buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.reputable.is_empty() && self.new.is_empty()
    }
}

/// Result of a selection, keeping the two buckets apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// Up to `amount` reputable nodes.
    pub reputable: Vec<Node>,
    /// Up to `ceil(amount * new_node_fraction)` new nodes.
    pub new: Vec<Node>,
}

impl Selection {
    /// Total nodes selected. Can exceed the requested amount.
    pub fn len(&self) -> usize {
        self.reputable.len() + self.new.len()
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.reputable.is_empty() && self.new.is_empty()
    }

    /// Reputable nodes followed by new nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        let mut nodes = self.reputable;
        nodes.extend(self.new);
        nodes
    }
}

/// Partition `candidates` into reputable and new buckets.
///
/// Excluded identifiers are dropped first, then duplicate identifiers (the
/// first occurrence wins). The input slice is not modified and relative
/// order is preserved within each bucket.
pub fn partition_candidates(
    candidates: &[Node],
    threshold: u64,
    excluded: &HashSet<NodeId>,
) -> Partition {
    let mut seen: HashSet<&NodeId> = HashSet::with_capacity(candidates.len());
    let mut partition = Partition::default();

    for node in candidates {
        if excluded.contains(&node.id) || !seen.insert(&node.id) {
            continue;
        }
        if node.is_reputable(threshold) {
            partition.reputable.push(node.clone());
        } else {
            partition.new.push(node.clone());
        }
    }

    partition
}

/// Select storage nodes for a request of `amount` nodes.
///
/// # Algorithm
///
/// 1. Validate the policy (before anything else).
/// 2. Drop excluded and duplicate identifiers, then partition by
///    `reputable_audit_threshold`.
/// 3. Drop reputable nodes below the policy's ratio floor.
/// 4. Drop the new bucket when the new-node quota is zero.
/// 5. Fail with `ResourceExhausted` if no eligible candidate remains.
/// 6. Take up to `amount` reputable nodes and, independently, up to
///    `ceil(amount * new_node_fraction)` new nodes.
///
/// The new-node quota is added on top of the reputable selection, so the
/// result may be longer than `amount`. A short supply in either bucket is
/// not an error; the call returns whatever is available. A positive
/// `amount` therefore never yields an empty `Ok`.
pub fn select_storage_nodes(
    candidates: &[Node],
    amount: usize,
    excluded: &HashSet<NodeId>,
    policy: &SelectionPolicy,
) -> Result<Selection, DiscoveryError> {
    policy.validate()?;

    let Partition {
        mut reputable,
        mut new,
    } = partition_candidates(candidates, policy.reputable_audit_threshold, excluded);

    let before_floor = reputable.len();
    reputable.retain(|node| policy.min_reputation.admits(node));
    if reputable.len() < before_floor {
        debug!(
            dropped = before_floor - reputable.len(),
            "reputable candidates below reputation floor"
        );
    }

    let new_quota = policy.new_node_quota(amount);
    if new_quota == 0 && !new.is_empty() {
        debug!(dropped = new.len(), "new-node quota is zero");
        new.clear();
    }

    if reputable.is_empty() && new.is_empty() {
        return Err(DiscoveryError::ResourceExhausted { requested: amount });
    }

    debug!(
        amount,
        new_quota,
        reputable_available = reputable.len(),
        new_available = new.len(),
        "selecting storage nodes"
    );

    let mut sampler = BucketSampler::new(policy.sampling);
    let reputable = sampler.take(reputable, amount);
    let new = sampler.take(new, new_quota);

    Ok(Selection { reputable, new })
}
