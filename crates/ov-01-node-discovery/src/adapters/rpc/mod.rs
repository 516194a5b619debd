//! # RPC Request Handler
//!
//! JSON boundary for the discovery service. Hex strings carry node ids.
//!
//! ## Supported Methods
//!
//! - `find_storage_nodes` - Select nodes for a placement
//! - `lookup` - Resolve one node id
//! - `bulk_lookup` - Resolve several node ids, in order
//! - `find_closest_nodes` - Known nodes by XOR distance to a target
//! - `get_metrics` - Counter snapshot
//! - `ping` - Health check

mod routes;
mod types;

pub use routes::ApiHandler;
pub use types::*;

#[cfg(test)]
mod tests;
