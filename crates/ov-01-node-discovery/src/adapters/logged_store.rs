//! Tracing decorator for any [`KeyValueStore`].

use async_trait::async_trait;
use tracing::debug;

use crate::ports::{KeyScan, KeyValueStore, StoreError};

/// Wraps a store and emits a debug event per operation.
pub struct LoggedStore<S: ?Sized> {
    name: &'static str,
    inner: Box<S>,
}

impl<S: KeyValueStore + ?Sized> LoggedStore<S> {
    /// Wrap `inner`, tagging events with `name`.
    pub fn new(name: &'static str, inner: Box<S>) -> Self {
        Self { name, inner }
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for LoggedStore<S> {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(store = self.name, key = %hex::encode(key), "get");
        self.inner.get(key).await
    }

    async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        debug!(store = self.name, key = %hex::encode(&key), len = value.len(), "put");
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        debug!(store = self.name, key = %hex::encode(key), "delete");
        self.inner.delete(key).await
    }

    async fn iterate(&self, scan: &KeyScan) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let result = self.inner.iterate(scan).await;
        match &result {
            Ok(pairs) => debug!(store = self.name, ?scan, count = pairs.len(), "iterate"),
            Err(e) => debug!(store = self.name, ?scan, error = %e, "iterate failed"),
        }
        result
    }

    async fn close(&self) -> Result<(), StoreError> {
        debug!(store = self.name, "close");
        self.inner.close().await
    }
}
