//! Navigation session model and its lifecycle state machine
//!
//! Sessions are plain values. Every lifecycle change goes through
//! [`transition`], which takes the current session and one event and
//! returns the next session, so the state machine can be exercised
//! without any store.
//!
//! ```text
//!            create
//!              │
//!              ▼
//!     ┌──── ACTIVE ◄──┐ reroute-success
//!     │      │  │     │
//!     │      │  └─────┘
//!  complete cancel fail
//!     ▼      ▼      ▼
//! COMPLETED CANCELLED FAILED   (terminal)
//! ```

use crate::error::{NavError, Result};
use crate::types::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a navigation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "ACTIVE",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
            SessionStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ACTIVE" => Ok(SessionStatus::Active),
            "COMPLETED" => Ok(SessionStatus::Completed),
            "CANCELLED" => Ok(SessionStatus::Cancelled),
            "FAILED" => Ok(SessionStatus::Failed),
            other => Err(NavError::InvalidArgument(format!("Invalid status: {other}"))),
        }
    }
}

/// Events that drive a session out of (or within) `ACTIVE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Complete,
    Cancel,
    Fail,
    RerouteSuccess { distance_meters: u32 },
}

impl SessionEvent {
    fn action(&self) -> &'static str {
        match self {
            SessionEvent::Complete => "complete",
            SessionEvent::Cancel => "cancel",
            SessionEvent::Fail => "fail",
            SessionEvent::RerouteSuccess { .. } => "reroute",
        }
    }
}

/// One instance of guided travel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub dest_name: String,
    pub status: SessionStatus,

    /// Length of the latest computed route
    pub distance_meters: u32,

    pub reroute_count: u32,
    pub started_at: DateTime<Utc>,

    /// Set exactly once, when the session enters a terminal status
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl NavigationSession {
    /// The `create` transition: a fresh `ACTIVE` session
    pub fn create(
        user_id: Uuid,
        origin: Coordinate,
        destination: Coordinate,
        dest_name: impl Into<String>,
        distance_meters: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            origin,
            destination,
            dest_name: dest_name.into(),
            status: SessionStatus::Active,
            distance_meters,
            reroute_count: 0,
            started_at: now,
            completed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// Apply one event to a session
///
/// Returns the next session value; the input is never modified. Any event
/// on a terminal session yields `InvalidSessionState`.
pub fn transition(
    session: &NavigationSession,
    event: SessionEvent,
    now: DateTime<Utc>,
) -> Result<NavigationSession> {
    let mut next = session.clone();
    match (session.status, event) {
        (SessionStatus::Active, SessionEvent::Complete) => {
            next.status = SessionStatus::Completed;
            next.completed_at = Some(now);
        }
        (SessionStatus::Active, SessionEvent::Cancel) => {
            next.status = SessionStatus::Cancelled;
            next.completed_at = Some(now);
        }
        (SessionStatus::Active, SessionEvent::Fail) => {
            next.status = SessionStatus::Failed;
            next.completed_at = Some(now);
        }
        (SessionStatus::Active, SessionEvent::RerouteSuccess { distance_meters }) => {
            next.reroute_count = session.reroute_count.saturating_add(1);
            next.distance_meters = distance_meters;
        }
        (
            SessionStatus::Completed | SessionStatus::Cancelled | SessionStatus::Failed,
            event,
        ) => {
            return Err(NavError::InvalidSessionState {
                session: session.id,
                status: session.status.to_string(),
                action: event.action().to_string(),
            });
        }
    }
    Ok(next)
}
