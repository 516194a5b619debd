//! In-memory key/value store backing `memory://` URLs.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::ports::{KeyScan, KeyValueStore, StoreError};

/// Ordered in-memory store for tests and single-process deployments.
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    closed: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty, open store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.ensure_open()?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn iterate(&self, scan: &KeyScan) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        self.ensure_open()?;
        let entries = self.entries.read().map_err(|_| poisoned())?;

        let pairs = match scan {
            KeyScan::All => entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            KeyScan::Prefix(prefix) => entries
                .range::<[u8], _>((Bound::Included(prefix.as_slice()), Bound::Unbounded))
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            KeyScan::Range { start, end } => {
                if start >= end {
                    Vec::new()
                } else {
                    entries
                        .range::<[u8], _>((
                            Bound::Included(start.as_slice()),
                            Bound::Excluded(end.as_slice()),
                        ))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                }
            }
        };
        Ok(pairs)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        Ok(())
    }
}
