//! OSRM routing engine
//!
//! Implements `RoutingEngine` on top of an OSRM server's HTTP route
//! service, typically a self-hosted instance loaded with the foot profile.

mod client;
mod config;

pub use client::{parse_route, OsrmClient};
pub use config::OsrmConfig;

use crate::error::Result;
use crate::routing::{RawRoute, RoutingEngine};
use crate::types::Coordinate;
use async_trait::async_trait;

/// OSRM routing engine
///
/// Wraps `OsrmClient` and implements the `RoutingEngine` trait.
pub struct OsrmEngine {
    client: OsrmClient,
}

impl OsrmEngine {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = OsrmClient::new(config)?;
        Ok(Self { client })
    }

    /// Get the underlying client for advanced usage
    pub fn client(&self) -> &OsrmClient {
        &self.client
    }
}

#[async_trait]
impl RoutingEngine for OsrmEngine {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RawRoute> {
        self.client.fetch_route(origin, destination).await
    }

    fn name(&self) -> &str {
        "osrm"
    }
}
