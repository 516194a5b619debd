//! Store selection by database URL.

use std::sync::Arc;

use tracing::info;

use super::logged_store::LoggedStore;
use super::memory_store::InMemoryStore;
use crate::ports::{KeyValueStore, StoreError};

/// Split `scheme://source` into its two parts.
pub fn split_db_url(url: &str) -> Result<(&str, &str), StoreError> {
    match url.split_once("://") {
        Some((scheme, source)) if !scheme.is_empty() => Ok((scheme, source)),
        _ => Err(StoreError::InvalidUrl(url.to_string())),
    }
}

/// Open the node store named by `database_url`.
///
/// Only `memory://` is built in. The returned store is wrapped in a
/// [`LoggedStore`].
pub fn open_store(database_url: &str) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    let (scheme, source) = split_db_url(database_url)?;

    let backend: Box<dyn KeyValueStore> = match scheme {
        "memory" => Box::new(InMemoryStore::new()),
        other => return Err(StoreError::UnsupportedScheme(other.to_string())),
    };

    info!(scheme, source, "opened node store");
    Ok(Arc::new(LoggedStore::new("overlay", backend)))
}
