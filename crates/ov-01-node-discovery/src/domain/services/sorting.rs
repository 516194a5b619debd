//! Node ordering by XOR distance.

use crate::domain::{Node, NodeId, XorQueue, XorQueueEntry};

/// Sort nodes by XOR distance from `target` (closest first).
///
/// Ties keep their input order.
pub fn sort_nodes_by_distance(nodes: &[Node], target: &NodeId) -> Vec<XorQueueEntry> {
    XorQueue::new(nodes.to_vec(), target).collect()
}

/// Find the k closest nodes to a target.
///
/// # Arguments
/// * `nodes` - Candidate population
/// * `target` - Target NodeId to measure distance from
/// * `k` - Maximum number of nodes to return
///
/// # Returns
/// Up to k entries sorted by distance (closest first)
pub fn find_k_closest(nodes: Vec<Node>, target: &NodeId, k: usize) -> Vec<XorQueueEntry> {
    XorQueue::new(nodes, target).take(k).collect()
}
