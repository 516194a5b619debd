//! Domain Errors for Node Discovery

use thiserror::Error;

/// Errors that fail a discovery call.
///
/// Per-record decode failures are not in this enum: they are absorbed by
/// the node cache and only shrink the candidate pool.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No eligible candidate exists in either bucket.
    #[error("resource exhausted: no eligible storage nodes for a request of {requested}")]
    ResourceExhausted { requested: usize },

    /// Malformed request or policy; raised before any store access.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The key/value store failed. Never reported as exhaustion.
    #[error("node store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl DiscoveryError {
    /// Status code surfaced at the RPC boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceExhausted { .. } => StatusCode::ResourceExhausted,
            Self::InvalidRequest(_) => StatusCode::InvalidArgument,
            Self::StoreUnavailable(_) => StatusCode::Unavailable,
        }
    }
}

/// Errors from the key/value store backing the node cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store is closed")]
    Closed,

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("unsupported db scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid database url: {0}")]
    InvalidUrl(String),
}

/// A stored node record that could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed node record: {0}")]
    Malformed(#[from] bincode::Error),

    #[error("record key {key} does not match node id {id}")]
    KeyMismatch { key: String, id: String },
}

/// Boundary status codes, numbered like gRPC codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    InvalidArgument = 3,
    ResourceExhausted = 8,
    Unavailable = 14,
}

impl StatusCode {
    /// Numeric code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Unavailable => "UNAVAILABLE",
        };
        f.write_str(name)
    }
}
