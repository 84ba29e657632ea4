//! Gate configuration.

use crate::core::{Error, Result};
use crate::roles::RoleWeightTable;
use serde::{Deserialize, Serialize};

/// Runtime configuration of a [`crate::Management`] instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    /// Voting window in seconds; 0 disables time-based resolution
    pub vote_duration_secs: u32,
    /// Executive vote weights
    pub weights: RoleWeightTable,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            vote_duration_secs: 0,
            weights: RoleWeightTable::default(),
        }
    }
}

impl ManagementConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the voting window.
    pub fn with_vote_duration(mut self, secs: u32) -> Self {
        self.vote_duration_secs = secs;
        self
    }

    /// Set the weight table.
    pub fn with_weights(mut self, weights: RoleWeightTable) -> Self {
        self.weights = weights;
        self
    }

    /// Check every invariant.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }

    /// Voting window, if any.
    pub fn vote_duration(&self) -> Option<chrono::Duration> {
        if self.vote_duration_secs == 0 {
            None
        } else {
            Some(chrono::Duration::seconds(i64::from(self.vote_duration_secs)))
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}
