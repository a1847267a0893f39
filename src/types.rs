//! Core route and guidance types for a3s-nav
//!
//! All types use camelCase JSON serialization for wire compatibility.

use crate::error::{NavError, Result};
use crate::session::{NavigationSession, SessionStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject non-finite or out-of-range coordinates
    pub fn validate(&self, field: &str) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(NavError::InvalidArgument(format!(
                "{field}: latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(NavError::InvalidArgument(format!(
                "{field}: longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// A point of interest along the route (typically a maneuver location)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Kind of spoken guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionType {
    Depart,
    Turn,
    Arrive,
    ContinueStraight,
    Crosswalk,
}

/// Direction of a turn; only meaningful for `InstructionType::Turn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnModifier {
    Left,
    Right,
    Straight,
    SlightLeft,
    SlightRight,
    Uturn,
}

/// One spoken-guidance unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// 0-based position in the route
    pub step: u32,

    #[serde(rename = "type")]
    pub kind: InstructionType,

    pub modifier: TurnModifier,

    /// Localized sentence ready for text-to-speech
    pub text: String,

    /// Meters to travel for this step
    pub distance: u32,

    pub location: Waypoint,
}

/// Outcome of one routing-engine invocation after translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub distance: u32,
    pub duration: u32,
    pub waypoints: Vec<Waypoint>,
    pub instructions: Vec<Instruction>,
}

/// Response returned from `calculate_route` and `reroute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub session_id: Uuid,
    pub distance: u32,
    pub duration: u32,
    pub waypoints: Vec<Waypoint>,
    pub instructions: Vec<Instruction>,
}

impl RouteResponse {
    pub fn new(session_id: Uuid, result: RouteResult) -> Self {
        Self {
            session_id,
            distance: result.distance,
            duration: result.duration,
            waypoints: result.waypoints,
            instructions: result.instructions,
        }
    }
}

/// Request to start guidance to a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_name: Option<String>,
}

impl RouteRequest {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            dest_name: None,
        }
    }

    pub fn with_dest_name(mut self, name: impl Into<String>) -> Self {
        self.dest_name = Some(name.into());
        self
    }
}

/// Request to recompute the remaining route after the user left it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerouteRequest {
    pub session_id: Uuid,
    pub current: Coordinate,
}

/// Compact session view for history listings and status updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: Uuid,
    pub dest_name: String,
    pub status: SessionStatus,
    pub distance: u32,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub reroute_count: u32,
}

impl From<&NavigationSession> for SessionSummary {
    fn from(session: &NavigationSession) -> Self {
        Self {
            id: session.id,
            dest_name: session.dest_name.clone(),
            status: session.status,
            distance: session.distance_meters,
            started_at: session.started_at.to_rfc3339(),
            completed_at: session.completed_at.map(|t| t.to_rfc3339()),
            reroute_count: session.reroute_count,
        }
    }
}

/// One page of a user's navigation history, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub sessions: Vec<SessionSummary>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}
