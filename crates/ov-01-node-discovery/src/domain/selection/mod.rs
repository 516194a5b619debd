//! Storage node selection.
//!
//! Partitions the candidate population into reputable and new nodes,
//! then fills the request from the reputable bucket and adds a separate
//! quota of new nodes on top.

mod engine;
mod sampler;

pub use engine::{partition_candidates, select_storage_nodes, Partition, Selection};
pub use sampler::BucketSampler;
