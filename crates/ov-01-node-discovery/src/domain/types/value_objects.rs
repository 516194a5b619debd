//! Value Objects for Node Discovery

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entities::{Node, NodeId};
use super::errors::DiscoveryError;

/// Relative tolerance for snapping quota products to whole numbers.
const QUOTA_EPSILON: f64 = 1e-9;

/// How a bucket is sampled when it holds more candidates than needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Take the first N candidates in (stable) input order.
    Ordered,
    /// Uniform sampling without replacement. A fixed seed makes the
    /// choice reproducible for a fixed input snapshot.
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Random { seed: None }
    }
}

/// Reputation floor applied to reputable candidates.
///
/// New nodes have no track record yet, so only nodes that already count as
/// reputable are held to these ratios. Zero disables a check.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MinimumReputation {
    /// Minimum audit success ratio, in [0, 1].
    #[serde(default)]
    pub audit_success_ratio: f64,
    /// Minimum uptime ratio, in [0, 1].
    #[serde(default)]
    pub uptime_ratio: f64,
}

impl MinimumReputation {
    /// True when `node` meets both ratio floors.
    pub fn admits(&self, node: &Node) -> bool {
        node.reputation.audit_success_ratio >= self.audit_success_ratio
            && node.reputation.uptime_ratio >= self.uptime_ratio
    }

    fn validate(&self) -> Result<(), DiscoveryError> {
        for (name, value) in [
            ("audit_success_ratio", self.audit_success_ratio),
            ("uptime_ratio", self.uptime_ratio),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DiscoveryError::InvalidRequest(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Placement policy fixed per discovery service instance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Minimum audit count for a node to be reputable.
    pub reputable_audit_threshold: u64,
    /// Share of a request's amount reserved for new nodes, in [0, 1].
    /// The quota is added on top of the reputable selection.
    pub new_node_fraction: f64,
    /// Bucket sampling strategy.
    #[serde(default)]
    pub sampling: SamplingStrategy,
    /// Ratio floor for reputable nodes.
    #[serde(default)]
    pub min_reputation: MinimumReputation,
}

impl SelectionPolicy {
    /// Create a policy with default sampling and no reputation floor.
    pub fn new(reputable_audit_threshold: u64, new_node_fraction: f64) -> Self {
        Self {
            reputable_audit_threshold,
            new_node_fraction,
            ..Self::default()
        }
    }

    /// Builder-style method to set the sampling strategy
    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    /// Builder-style method to set the reputation floor
    pub fn with_min_reputation(mut self, min_reputation: MinimumReputation) -> Self {
        self.min_reputation = min_reputation;
        self
    }

    /// Reject fractions outside [0, 1] (including NaN and infinities).
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        let fraction = self.new_node_fraction;
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(DiscoveryError::InvalidRequest(format!(
                "new_node_fraction must be between 0 and 1, got {fraction}"
            )));
        }
        self.min_reputation.validate()
    }

    /// `ceil(amount * new_node_fraction)`.
    ///
    /// Products within `QUOTA_EPSILON` of a whole number snap to it, so
    /// `0.07 * 100` yields 7 rather than 8.
    pub fn new_node_quota(&self, amount: usize) -> usize {
        let product = amount as f64 * self.new_node_fraction;
        let nearest = product.round();
        if (product - nearest).abs() <= QUOTA_EPSILON * nearest.max(1.0) {
            nearest as usize
        } else {
            product.ceil() as usize
        }
    }
}

/// Placement restrictions supplied by the uploader.
///
/// Carried through the request untouched; free-capacity checks happen in
/// the storage nodes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacementRestrictions {
    /// Required free bandwidth in bytes.
    #[serde(default)]
    pub free_bandwidth: i64,
    /// Required free disk in bytes.
    #[serde(default)]
    pub free_disk: i64,
}

/// A request for storage nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryRequest {
    /// Number of nodes requested. Zero means the service default.
    pub amount: i64,
    /// Identifiers already chosen for this placement.
    pub excluded: HashSet<NodeId>,
    /// Opaque placement restrictions.
    pub restrictions: Option<PlacementRestrictions>,
}

impl DiscoveryRequest {
    /// Request `amount` nodes with no exclusions.
    pub fn new(amount: i64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Builder-style method to exclude identifiers
    pub fn with_excluded(mut self, excluded: impl IntoIterator<Item = NodeId>) -> Self {
        self.excluded.extend(excluded);
        self
    }

    /// Builder-style method to attach restrictions
    pub fn with_restrictions(mut self, restrictions: PlacementRestrictions) -> Self {
        self.restrictions = Some(restrictions);
        self
    }

    /// Non-negative amount as `usize`.
    pub fn validated_amount(&self) -> Result<usize, DiscoveryError> {
        usize::try_from(self.amount).map_err(|_| {
            DiscoveryError::InvalidRequest(format!("amount must be >= 0, got {}", self.amount))
        })
    }
}

/// Selected storage nodes. May be shorter or longer than the requested amount.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryResult {
    /// Reputable selection first, then new nodes.
    pub nodes: Vec<Node>,
}

impl DiscoveryResult {
    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Outcome of a single-key lookup. A miss is a normal result.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    /// Identifier that was looked up.
    pub node_id: NodeId,
    /// The node, if present and decodable.
    pub node: Option<Node>,
}

impl LookupResult {
    /// Whether the identifier resolved to a node.
    pub fn found(&self) -> bool {
        self.node.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejects_out_of_range_fraction() {
        for fraction in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let policy = SelectionPolicy::new(1, fraction);
            assert!(
                matches!(policy.validate(), Err(DiscoveryError::InvalidRequest(_))),
                "fraction {fraction} should be rejected"
            );
        }
    }

    #[test]
    fn test_policy_accepts_bounds() {
        assert!(SelectionPolicy::new(0, 0.0).validate().is_ok());
        assert!(SelectionPolicy::new(0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_policy_rejects_bad_ratio_floor() {
        let policy = SelectionPolicy::new(1, 0.5).with_min_reputation(MinimumReputation {
            audit_success_ratio: 1.2,
            uptime_ratio: 0.0,
        });
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_new_node_quota_rounds_up() {
        assert_eq!(SelectionPolicy::new(1, 0.5).new_node_quota(2), 1);
        assert_eq!(SelectionPolicy::new(1, 0.5).new_node_quota(3), 2);
        assert_eq!(SelectionPolicy::new(1, 0.01).new_node_quota(3), 1);
        assert_eq!(SelectionPolicy::new(1, 0.0).new_node_quota(10), 0);
        assert_eq!(SelectionPolicy::new(1, 1.0).new_node_quota(0), 0);
    }

    #[test]
    fn test_new_node_quota_whole_products_are_exact() {
        assert_eq!(SelectionPolicy::new(1, 0.07).new_node_quota(100), 7);
        assert_eq!(SelectionPolicy::new(1, 0.14).new_node_quota(100), 14);
        assert_eq!(SelectionPolicy::new(1, 0.29).new_node_quota(100), 29);
        assert_eq!(SelectionPolicy::new(1, 0.1).new_node_quota(30), 3);
        assert_eq!(SelectionPolicy::new(1, 0.071).new_node_quota(100), 8);
    }

    #[test]
    fn test_negative_amount_is_invalid() {
        assert!(DiscoveryRequest::new(-1).validated_amount().is_err());
        assert_eq!(DiscoveryRequest::new(4).validated_amount().unwrap(), 4);
    }

    #[test]
    fn test_sampling_defaults_to_random() {
        assert_eq!(SamplingStrategy::default(), SamplingStrategy::Random { seed: None });
    }
}
