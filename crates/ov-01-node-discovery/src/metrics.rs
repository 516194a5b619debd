//! Metrics for node discovery operations
//!
//! Lock-free counters shared between the service and the node cache.
//!
//! ## Usage
//!
//! ```ignore
//! use ov_01_node_discovery::metrics::DiscoveryMetrics;
//!
//! let metrics = Arc::new(DiscoveryMetrics::new());
//! metrics.record_selection(5);
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics collector for node discovery
#[derive(Debug, Default)]
pub struct DiscoveryMetrics {
    /// Successful `find_storage_nodes` calls
    pub selections: AtomicU64,
    /// Nodes returned across all selections
    pub nodes_selected: AtomicU64,
    /// Selections that failed with resource exhaustion
    pub exhausted: AtomicU64,
    /// Identifiers looked up (single and bulk)
    pub lookups: AtomicU64,
    /// Lookups that found nothing
    pub lookup_misses: AtomicU64,
    /// Stored records skipped because they could not be decoded
    pub records_skipped: AtomicU64,
}

impl DiscoveryMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful selection of `count` nodes
    pub fn record_selection(&self, count: usize) {
        self.selections.fetch_add(1, Ordering::Relaxed);
        self.nodes_selected.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a selection that found no eligible candidate
    pub fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one identifier lookup
    pub fn record_lookup(&self, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if !found {
            self.lookup_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an undecodable stored record
    pub fn record_skipped(&self) {
        self.records_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            selections: self.selections.load(Ordering::Relaxed),
            nodes_selected: self.nodes_selected.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_misses: self.lookup_misses.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
        }
    }

    /// Average nodes per successful selection
    pub fn avg_nodes_per_selection(&self) -> f64 {
        let selections = self.selections.load(Ordering::Relaxed);
        if selections == 0 {
            return 0.0;
        }
        self.nodes_selected.load(Ordering::Relaxed) as f64 / selections as f64
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.selections.store(0, Ordering::Relaxed);
        self.nodes_selected.store(0, Ordering::Relaxed);
        self.exhausted.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
        self.lookup_misses.store(0, Ordering::Relaxed);
        self.records_skipped.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub selections: u64,
    pub nodes_selected: u64,
    pub exhausted: u64,
    pub lookups: u64,
    pub lookup_misses: u64,
    pub records_skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let snapshot = DiscoveryMetrics::new().snapshot();
        assert_eq!(snapshot, MetricsSnapshot::default());
    }

    #[test]
    fn test_record_selections() {
        let metrics = DiscoveryMetrics::new();
        metrics.record_selection(3);
        metrics.record_selection(1);
        metrics.record_exhausted();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.selections, 2);
        assert_eq!(snapshot.nodes_selected, 4);
        assert_eq!(snapshot.exhausted, 1);
        assert!((metrics.avg_nodes_per_selection() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_lookups() {
        let metrics = DiscoveryMetrics::new();
        metrics.record_lookup(true);
        metrics.record_lookup(false);
        metrics.record_lookup(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.lookups, 3);
        assert_eq!(snapshot.lookup_misses, 2);
    }

    #[test]
    fn test_reset() {
        let metrics = DiscoveryMetrics::new();
        metrics.record_selection(2);
        metrics.record_skipped();

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
