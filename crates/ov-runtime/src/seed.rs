//! Seeding the node cache from a JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ov_01_node_discovery::{KeyValueStore, Node, NodeCache, NodeId, ReputationRecord};

fn one() -> f64 {
    1.0
}

/// One entry of a seed file.
///
/// ```json
/// [{ "id": "a001", "address": "10.0.0.1:7777", "audit_count": 3 }]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SeedNode {
    /// Hex node id
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub audit_count: u64,
    #[serde(default = "one")]
    pub audit_success_ratio: f64,
    #[serde(default = "one")]
    pub uptime_ratio: f64,
    #[serde(default)]
    pub uptime_count: u64,
}

impl SeedNode {
    fn into_node(self) -> Result<Node> {
        let id: NodeId = self
            .id
            .parse()
            .with_context(|| format!("bad node id {:?}", self.id))?;
        Ok(Node::new(
            id,
            self.address,
            ReputationRecord {
                audit_count: self.audit_count,
                audit_success_ratio: self.audit_success_ratio,
                uptime_ratio: self.uptime_ratio,
                uptime_count: self.uptime_count,
            },
        ))
    }
}

/// Parse a seed document into nodes.
pub fn parse_seed(content: &str) -> Result<Vec<Node>> {
    let entries: Vec<SeedNode> = serde_json::from_str(content).context("invalid seed file")?;
    entries.into_iter().map(SeedNode::into_node).collect()
}

/// Write every node in the seed file at `path` into `cache`.
pub async fn seed_cache<S>(cache: &NodeCache<S>, path: &Path) -> Result<usize>
where
    S: KeyValueStore + ?Sized,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let nodes = parse_seed(&content)?;
    for node in &nodes {
        cache.put(node).await.context("failed to write seed node")?;
    }
    Ok(nodes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_defaults() {
        let nodes = parse_seed(r#"[{ "id": "a001", "address": "10.0.0.1:7777" }]"#).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, NodeId::new(vec![0xa0, 0x01]));
        assert_eq!(nodes[0].reputation.audit_count, 0);
        assert_eq!(nodes[0].reputation.uptime_ratio, 1.0);
    }

    #[test]
    fn test_parse_seed_rejects_bad_id() {
        assert!(parse_seed(r#"[{ "id": "nothex", "address": "x" }]"#).is_err());
    }
}
