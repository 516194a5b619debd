//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the node discovery core:
//! - Variable-length node identifiers and the XOR metric over them
//! - The closest-first XOR priority queue
//! - Storage node selection (reputable/new partitioning and quotas)

pub mod selection;
pub mod services;
/// Core domain types (entities, values, errors)
pub mod types;
pub mod xor_queue;

pub use selection::*;
pub use services::*;
pub use types::*;
pub use xor_queue::*;
