//! # Node Discovery & Storage Node Selection
//!
//! This crate answers "which storage nodes should hold this data, and where
//! is node X?" for a distributed storage network. It reads node records from
//! a key/value node cache, orders nodes by XOR distance, and picks storage
//! nodes while reserving a share of every placement for new nodes.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** XOR metric, XOR priority queue, selection engine
//! - **Ports Layer:** `NodeDiscoveryApi` (driving), `KeyValueStore` (driven)
//! - **Service Layer:** `NodeDiscoveryService` wires domain to ports
//! - **Adapters Layer:** in-memory store, logging decorator, store factory,
//!   node cache, configuration and the JSON request handler
//!
//! ## Features
//!
//! - `rpc` - JSON request handler (serde_json)
//! - `toml-config` - TOML configuration files (toml)
//!
//! ## Selection Rules
//!
//! A node is *reputable* when its audit count reaches the policy threshold,
//! otherwise it is *new*. A request for `amount` nodes returns up to
//! `amount` reputable nodes plus up to `ceil(amount * new_node_fraction)`
//! new nodes, so results may be longer than requested. Only an empty
//! candidate pool is an error (`ResourceExhausted`).
//!
//! ## Example
//!
//! ```rust
//! use ov_01_node_discovery::{Node, NodeId, ReputationRecord, XorQueue};
//!
//! let target = NodeId::new(vec![0x01]);
//! let nodes = vec![
//!     Node::new(NodeId::new(vec![0x08]), "10.0.0.1:7777", ReputationRecord::default()),
//!     Node::new(NodeId::new(vec![0x03]), "10.0.0.2:7777", ReputationRecord::default()),
//! ];
//!
//! let mut queue = XorQueue::new(nodes, &target);
//! let closest = queue.pop_closest().unwrap();
//! assert_eq!(closest.node.id, NodeId::new(vec![0x03]));
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

// =============================================================================
// CORE RE-EXPORTS
// =============================================================================

// Domain entities and values
pub use domain::{
    DecodeError, DiscoveryError, DiscoveryRequest, DiscoveryResult, LookupResult,
    MinimumReputation, Node, NodeId, PlacementRestrictions, ReputationRecord, SamplingStrategy,
    SelectionPolicy, StatusCode, StoreError,
};

// Domain services
pub use domain::{
    find_k_closest, partition_candidates, select_storage_nodes, sort_nodes_by_distance,
    xor_distance, BucketSampler, Partition, Selection, XorQueue, XorQueueEntry,
};

// Port traits
pub use ports::{KeyScan, KeyValueStore, NodeDiscoveryApi};

// Service
pub use service::NodeDiscoveryService;

// Metrics
pub use metrics::{DiscoveryMetrics, MetricsSnapshot};

// =============================================================================
// ADAPTER RE-EXPORTS
// =============================================================================

pub use adapters::{
    open_store, ConfigError, DiscoveryConfig, InMemoryStore, LoggedStore, NodeCache, NodeRecord,
    SelectionConfig,
};

#[cfg(feature = "rpc")]
pub use adapters::rpc::{
    ApiError, ApiHandler, BulkLookupRequest, BulkLookupResponse, FindClosestRequest,
    FindStorageNodesRequest, FindStorageNodesResponse, LookupRequest, LookupResponse,
    RpcClosestNode, RpcNode,
};
