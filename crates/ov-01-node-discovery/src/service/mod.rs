//! # Node Discovery Service
//!
//! Application service layer: reads the node cache through the
//! `KeyValueStore` port and runs the domain selection over it.
//!
//! ## Module Structure
//!
//! - `core` - Service struct and construction
//! - `api` - `NodeDiscoveryApi` trait implementation

mod api;
mod core;

pub use self::core::NodeDiscoveryService;
