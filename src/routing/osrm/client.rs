//! OSRM HTTP client — request a foot route and decode the response

use super::config::OsrmConfig;
use crate::error::{NavError, Result};
use crate::routing::{RawRoute, RawStep};
use crate::types::Coordinate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// OSRM route service client
///
/// Low-level client for the `/route/v1` endpoint. Owns a reusable
/// connection pool; the per-request timeout comes from `OsrmConfig`.
pub struct OsrmClient {
    http: reqwest::Client,
    config: Arc<OsrmConfig>,
}

impl OsrmClient {
    /// Build a client after validating the configuration
    pub fn new(config: OsrmConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| NavError::Config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            base_url = %config.base_url,
            profile = %config.profile,
            timeout_ms = config.timeout_ms,
            "OSRM client ready"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Request a route between two points
    pub async fn fetch_route(&self, origin: Coordinate, destination: Coordinate) -> Result<RawRoute> {
        let url = self.config.route_url(origin, destination);
        tracing::debug!(url = %url, "Requesting OSRM route");

        let timeout_ms = self.config.timeout_ms;
        let body = tokio::time::timeout(Duration::from_millis(timeout_ms), self.fetch_body(&url))
            .await
            .map_err(|_| NavError::RoutingEngineTimeout { timeout_ms })??;

        let route = parse_route(&body)?;
        tracing::debug!(
            distance = route.distance,
            duration = route.duration,
            steps = route.steps.len(),
            "OSRM route decoded"
        );
        Ok(route)
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let timeout_ms = self.config.timeout_ms;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        // OSRM answers NoRoute/NoSegment with 400 and a regular JSON body.
        if status.is_success() || status == StatusCode::BAD_REQUEST {
            Ok(body)
        } else {
            Err(NavError::RoutingEngineUnavailable(format!(
                "OSRM returned HTTP {}",
                status
            )))
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }
}

fn transport_error(e: reqwest::Error, timeout_ms: u64) -> NavError {
    if e.is_timeout() {
        NavError::RoutingEngineTimeout { timeout_ms }
    } else {
        NavError::RoutingEngineUnavailable(e.to_string())
    }
}

/// Spoken to the user when no path exists
const NO_ROUTE_MESSAGE: &str = "경로를 찾을 수 없습니다";

// ─── Wire format ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    distance: f64,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    modifier: Option<String>,
    /// `[lng, lat]`
    location: [f64; 2],
}

/// Decode an OSRM route service body
///
/// Only the first route and its first leg are used; the request carries
/// exactly two coordinates so there is never more than one leg.
pub fn parse_route(body: &str) -> Result<RawRoute> {
    let response: OsrmResponse = serde_json::from_str(body).map_err(|e| {
        NavError::RoutingEngineUnavailable(format!("Undecodable OSRM response: {}", e))
    })?;

    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => {
            tracing::warn!(code = %response.code, message = ?response.message, "OSRM found no route");
            return Err(NavError::RouteNotFound(NO_ROUTE_MESSAGE.into()));
        }
        other => {
            tracing::warn!(code = %other, message = ?response.message, "OSRM rejected request");
            return Err(NavError::RoutingEngineUnavailable(format!(
                "OSRM error {}: {}",
                other,
                response.message.unwrap_or_default()
            )));
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| NavError::RouteNotFound(NO_ROUTE_MESSAGE.into()))?;

    let steps = route
        .legs
        .into_iter()
        .next()
        .map(|leg| leg.steps)
        .unwrap_or_default()
        .into_iter()
        .map(|step| RawStep {
            maneuver_type: step.maneuver.kind,
            modifier: step.maneuver.modifier,
            name: step.name,
            distance: step.distance,
            location: Coordinate::new(step.maneuver.location[1], step.maneuver.location[0]),
        })
        .collect();

    Ok(RawRoute {
        distance: route.distance,
        duration: route.duration,
        steps,
    })
}
