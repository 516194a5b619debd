//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this subsystem **requires** the host application to implement.

use async_trait::async_trait;

pub use crate::domain::StoreError;

/// Key selection for [`KeyValueStore::iterate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyScan {
    /// Every key in the store.
    #[default]
    All,
    /// Keys starting with the given bytes.
    Prefix(Vec<u8>),
    /// Keys in `[start, end)`.
    Range { start: Vec<u8>, end: Vec<u8> },
}

impl KeyScan {
    /// Whether `key` falls inside this scan.
    pub fn matches(&self, key: &[u8]) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => key.starts_with(prefix),
            Self::Range { start, end } => key >= start.as_slice() && key < end.as_slice(),
        }
    }
}

/// Abstract key/value store holding serialized node records.
///
/// Keys are raw identifier bytes. The node cache only reads (`get`,
/// `iterate`); writes belong to whoever maintains the cache.
///
/// # Thread Safety
///
/// Implementations must support concurrent reads; they are the only point
/// of shared mutable state behind the discovery service. Dropping a
/// returned future abandons the read.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one value.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace a value.
    async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// All key/value pairs matched by `scan`, in key order.
    async fn iterate(&self, scan: &KeyScan) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Release the backend. Later calls fail with [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError>;
}
