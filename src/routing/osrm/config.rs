//! OSRM connection settings

use crate::error::{NavError, Result};
use crate::types::Coordinate;
use serde::{Deserialize, Serialize};

/// Configuration for an OSRM HTTP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsrmConfig {
    /// Server root, without trailing path (e.g., "http://localhost:5000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Routing profile segment of the URL
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Upper bound for one route request, including the body read
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_profile() -> String {
    "foot".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile: default_profile(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl OsrmConfig {
    /// Point the config at another server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(NavError::Config("osrm.baseUrl must not be empty".into()));
        }
        if self.profile.trim().is_empty() {
            return Err(NavError::Config("osrm.profile must not be empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(NavError::Config("osrm.timeoutMs must be positive".into()));
        }
        Ok(())
    }

    /// Build the route service URL; OSRM takes `lng,lat` pairs
    pub fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&steps=true&geometries=geojson",
            self.base_url.trim_end_matches('/'),
            self.profile,
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat,
        )
    }
}
