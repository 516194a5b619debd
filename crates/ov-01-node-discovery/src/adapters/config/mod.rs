//! # Discovery Configuration
//!
//! Everything needed to stand up a discovery service: the store URL, the
//! default request size and the selection policy.
//!
//! # Config File Format
//!
//! ```toml
//! database_url = "memory://"
//! default_amount = 2
//!
//! [selection]
//! reputable_audit_threshold = 1
//! new_node_fraction = 0.5
//! sampling = "random"      # or "ordered"
//! seed = 42                # optional, random sampling only
//! min_audit_success_ratio = 0.0
//! min_uptime_ratio = 0.0
//! ```
//!
//! Every key is optional. Environment variables override file values:
//! `OV_DATABASE_URL`, `OV_DEFAULT_AMOUNT`, `OV_REPUTABLE_AUDIT_THRESHOLD`,
//! `OV_NEW_NODE_FRACTION`.

#[cfg(feature = "toml-config")]
mod file;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MinimumReputation, SamplingStrategy, SelectionPolicy};

/// Errors that can occur during config loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    /// Values parsed but the policy is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Bucket sampling as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    Ordered,
    #[default]
    Random,
}

/// `[selection]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub reputable_audit_threshold: u64,
    pub new_node_fraction: f64,
    pub sampling: SamplingMode,
    pub seed: Option<u64>,
    pub min_audit_success_ratio: f64,
    pub min_uptime_ratio: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            reputable_audit_threshold: 0,
            new_node_fraction: 0.0,
            sampling: SamplingMode::Random,
            seed: None,
            min_audit_success_ratio: 0.0,
            min_uptime_ratio: 0.0,
        }
    }
}

impl SelectionConfig {
    /// Build the domain policy.
    pub fn to_policy(&self) -> SelectionPolicy {
        let sampling = match self.sampling {
            SamplingMode::Ordered => SamplingStrategy::Ordered,
            SamplingMode::Random => SamplingStrategy::Random { seed: self.seed },
        };
        SelectionPolicy::new(self.reputable_audit_threshold, self.new_node_fraction)
            .with_sampling(sampling)
            .with_min_reputation(MinimumReputation {
                audit_success_ratio: self.min_audit_success_ratio,
                uptime_ratio: self.min_uptime_ratio,
            })
    }
}

/// Top-level discovery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// `scheme://source` of the node store.
    pub database_url: String,
    /// Nodes returned when a request asks for zero.
    pub default_amount: usize,
    pub selection: SelectionConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            database_url: "memory://".to_string(),
            default_amount: 2,
            selection: SelectionConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Check the selection policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.selection
            .to_policy()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Apply `OV_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OV_DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(value) = lookup("OV_DEFAULT_AMOUNT") {
            self.default_amount = parse_var("OV_DEFAULT_AMOUNT", value)?;
        }
        if let Some(value) = lookup("OV_REPUTABLE_AUDIT_THRESHOLD") {
            self.selection.reputable_audit_threshold =
                parse_var("OV_REPUTABLE_AUDIT_THRESHOLD", value)?;
        }
        if let Some(value) = lookup("OV_NEW_NODE_FRACTION") {
            self.selection.new_node_fraction = parse_var("OV_NEW_NODE_FRACTION", value)?;
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
