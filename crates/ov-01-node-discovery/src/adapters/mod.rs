//! # Adapters
//!
//! Concrete implementations behind the ports, plus the boundary layers.
//!
//! - `memory_store` - ordered in-memory `KeyValueStore`
//! - `logged_store` - tracing decorator for any store
//! - `store_factory` - opens a store from a `scheme://` URL
//! - `node_cache` - typed node records over a store
//! - `config` - configuration with TOML loading (feature `toml-config`)
//! - `rpc` - JSON request handler (feature `rpc`)

pub mod config;
pub mod logged_store;
pub mod memory_store;
pub mod node_cache;
#[cfg(feature = "rpc")]
pub mod rpc;
pub mod store_factory;

pub use config::{ConfigError, DiscoveryConfig, SamplingMode, SelectionConfig};
pub use logged_store::LoggedStore;
pub use memory_store::InMemoryStore;
pub use node_cache::{decode_node, encode_node, NodeCache, NodeRecord};
#[cfg(feature = "rpc")]
pub use rpc::ApiHandler;
pub use store_factory::{open_store, split_db_url};
