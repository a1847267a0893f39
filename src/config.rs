//! Configuration for a3s-nav
//!
//! Every field has a default, so `NavConfig::default()` is a working
//! local setup and a config file only needs the fields it overrides.
//!
//! ```json
//! {
//!   "osrm": { "baseUrl": "http://osrm:5000", "timeoutMs": 3000 },
//!   "defaultDestName": "목적지",
//!   "defaultHistoryLimit": 20,
//!   "maxHistoryLimit": 100
//! }
//! ```

use crate::error::{NavError, Result};
use crate::routing::osrm::OsrmConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level navigation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavConfig {
    /// Routing engine connection
    #[serde(default)]
    pub osrm: OsrmConfig,

    /// Destination label used when the caller supplies none
    #[serde(default = "default_dest_name")]
    pub default_dest_name: String,

    /// History page size when the caller asks for 0
    #[serde(default = "default_history_limit")]
    pub default_history_limit: usize,

    /// Upper bound on history page size
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: usize,
}

fn default_dest_name() -> String {
    "목적지".to_string()
}

fn default_history_limit() -> usize {
    20
}

fn default_max_history_limit() -> usize {
    100
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            osrm: OsrmConfig::default(),
            default_dest_name: default_dest_name(),
            default_history_limit: default_history_limit(),
            max_history_limit: default_max_history_limit(),
        }
    }
}

impl NavConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NavConfig = serde_json::from_str(json)
            .map_err(|e| NavError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            NavError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.osrm.validate()?;
        if self.default_dest_name.trim().is_empty() {
            return Err(NavError::Config("defaultDestName must not be empty".into()));
        }
        if self.default_history_limit == 0 || self.max_history_limit == 0 {
            return Err(NavError::Config("history limits must be positive".into()));
        }
        if self.default_history_limit > self.max_history_limit {
            return Err(NavError::Config(
                "defaultHistoryLimit must not exceed maxHistoryLimit".into(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested page size into `[1, max_history_limit]`
    pub fn history_limit(&self, requested: usize) -> usize {
        if requested == 0 {
            self.default_history_limit
        } else {
            requested.min(self.max_history_limit)
        }
    }
}
