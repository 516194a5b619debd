//! Bucket sampling.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::domain::{Node, SamplingStrategy};

/// Picks up to N nodes from a bucket according to a [`SamplingStrategy`].
///
/// One sampler is created per selection call and used for both buckets, so
/// a seeded strategy yields the same choice for the same input snapshot.
pub struct BucketSampler {
    rng: Option<StdRng>,
}

impl BucketSampler {
    /// Create a sampler for one selection call.
    pub fn new(strategy: SamplingStrategy) -> Self {
        let rng = match strategy {
            SamplingStrategy::Ordered => None,
            SamplingStrategy::Random { seed: Some(seed) } => Some(StdRng::seed_from_u64(seed)),
            SamplingStrategy::Random { seed: None } => Some(StdRng::from_entropy()),
        };
        Self { rng }
    }

    /// Take up to `count` nodes from `bucket`.
    ///
    /// When the bucket is not larger than `count` every node is returned.
    /// Sampled nodes keep their relative bucket order.
    pub fn take(&mut self, bucket: Vec<Node>, count: usize) -> Vec<Node> {
        if bucket.len() <= count {
            return bucket;
        }

        match self.rng.as_mut() {
            None => bucket.into_iter().take(count).collect(),
            Some(rng) => {
                let mut picked = index::sample(rng, bucket.len(), count).into_vec();
                picked.sort_unstable();

                let mut slots: Vec<Option<Node>> = bucket.into_iter().map(Some).collect();
                picked
                    .into_iter()
                    .filter_map(|i| slots[i].take())
                    .collect()
            }
        }
    }
}
