//! Resolver configuration.
//!
//! ```text
//! {
//!   "peer_name": "localhost",
//!   "gateway": { "max_results": 10, "min_certainty": 0.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Top-level configuration for the in-process collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Peer name written into beacons produced by this instance.
    pub peer_name: String,
    pub gateway: GatewayConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            peer_name: "localhost".into(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FetchConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.peer_name.is_empty() || self.peer_name.contains('/') {
            return Err(Error::Config(format!("invalid peer name '{}'", self.peer_name)));
        }
        self.gateway.validate()
    }
}

/// Bounds on what the in-memory gateway returns per search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Maximum candidates per search. Must be non-zero.
    pub max_results: usize,
    /// Floor applied on top of each request's own certainty.
    pub min_certainty: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { max_results: 10, min_certainty: 0.0 }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(Error::Config("gateway.max_results must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.min_certainty) {
            return Err(Error::Config(format!(
                "gateway.min_certainty must be within [0, 1], got {}",
                self.min_certainty
            )));
        }
        Ok(())
    }
}
