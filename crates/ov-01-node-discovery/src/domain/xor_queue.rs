//! # XOR Priority Queue
//!
//! Closest-first queue over a fixed candidate set, built once per query and
//! drained. There is no reinsertion or priority update.
//!
//! ## Complexity
//!
//! - Build: O(n) (heapify of a pre-filled vector)
//! - `pop_closest`: O(log n)
//!
//! ## Tie-breaking
//!
//! Entries with equal priority pop in insertion order, so draining the same
//! input twice yields the same sequence.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use num_bigint::BigUint;

use crate::domain::{xor_distance, Node, NodeId};

/// A node paired with its XOR distance to the query target.
#[derive(Debug, Clone, PartialEq)]
pub struct XorQueueEntry {
    /// The candidate node.
    pub node: Node,
    /// `xor_distance(node.id, target)`. Lower is closer.
    pub priority: BigUint,
}

/// Heap slot. `BinaryHeap` is a max-heap, so the ordering is reversed.
#[derive(Debug)]
struct HeapSlot {
    priority: BigUint,
    seq: usize,
    node: Node,
}

impl PartialEq for HeapSlot {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for HeapSlot {}

impl PartialOrd for HeapSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Closest-first priority queue keyed by XOR distance to a target.
#[derive(Debug)]
pub struct XorQueue {
    heap: BinaryHeap<HeapSlot>,
}

impl XorQueue {
    /// Build a queue over `nodes`, measuring every node against `target`.
    pub fn new(nodes: Vec<Node>, target: &NodeId) -> Self {
        let slots: Vec<HeapSlot> = nodes
            .into_iter()
            .enumerate()
            .map(|(seq, node)| HeapSlot {
                priority: xor_distance(&node.id, target),
                seq,
                node,
            })
            .collect();

        Self {
            heap: BinaryHeap::from(slots),
        }
    }

    /// Number of entries not yet popped.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True once every entry has been popped.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Priority of the next entry without removing it.
    pub fn peek_priority(&self) -> Option<&BigUint> {
        self.heap.peek().map(|slot| &slot.priority)
    }

    /// Remove and return the closest entry, or `None` when empty.
    pub fn pop_closest(&mut self) -> Option<XorQueueEntry> {
        self.heap.pop().map(|slot| XorQueueEntry {
            node: slot.node,
            priority: slot.priority,
        })
    }
}

impl Iterator for XorQueue {
    type Item = XorQueueEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop_closest()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for XorQueue {}
