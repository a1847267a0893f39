//! Routing engine trait — the abstraction over external path finders
//!
//! The core never computes routes itself. Every backend (OSRM, a scripted
//! engine for tests, …) implements `RoutingEngine` and reports failures
//! through the three routing variants of `NavError`:
//! `RouteNotFound`, `RoutingEngineTimeout` and `RoutingEngineUnavailable`.

use crate::error::Result;
use crate::types::Coordinate;
use async_trait::async_trait;

pub mod fixed;
pub mod osrm;

/// Core trait for routing backends
#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Compute a walking route between two points
    ///
    /// Implementations must bound the call by their own timeout and must
    /// not retry.
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RawRoute>;

    /// Engine name (e.g., "osrm", "fixed")
    fn name(&self) -> &str;
}

/// Untranslated engine output
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    /// Total length in meters
    pub distance: f64,
    /// Total walking time in seconds
    pub duration: f64,
    /// Maneuvers in travel order
    pub steps: Vec<RawStep>,
}

/// A single engine-reported maneuver
#[derive(Debug, Clone, PartialEq)]
pub struct RawStep {
    pub maneuver_type: Option<String>,
    pub modifier: Option<String>,
    /// Street name at the maneuver, empty or missing when unnamed
    pub name: Option<String>,
    /// Meters covered by this step
    pub distance: f64,
    pub location: Coordinate,
}

impl RawStep {
    pub fn new(maneuver_type: &str, location: Coordinate) -> Self {
        Self {
            maneuver_type: Some(maneuver_type.to_string()),
            modifier: None,
            name: None,
            distance: 0.0,
            location,
        }
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifier = Some(modifier.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance = meters;
        self
    }
}
