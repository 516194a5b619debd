//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** APIs this subsystem exposes to consumers
//! - **Driven Ports (Outbound):** SPIs this subsystem requires from adapters

pub mod inbound;
pub mod outbound;

pub use inbound::NodeDiscoveryApi;
pub use outbound::{KeyScan, KeyValueStore, StoreError};
