//! Error types for a3s-nav

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while planning or guiding a trip
#[derive(Debug, Error)]
pub enum NavError {
    /// No user with this id is known to the user store
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Unknown session id, or a session owned by another user
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Transition or reroute attempted on a session that is not active
    #[error("Session {session} is {status}, cannot {action}")]
    InvalidSessionState {
        session: Uuid,
        status: String,
        action: String,
    },

    /// The routing engine found no path between the two points
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// The routing engine did not answer in time
    #[error("Routing engine timed out after {timeout_ms}ms")]
    RoutingEngineTimeout { timeout_ms: u64 },

    /// The routing engine could not be reached or answered garbage
    #[error("Routing engine unavailable: {0}")]
    RoutingEngineUnavailable(String),

    /// Malformed coordinates or an unrecognized status value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Session or user store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NavError {
    /// Stable machine-readable code for an outer API layer
    pub fn code(&self) -> &'static str {
        match self {
            NavError::UserNotFound(_) => "USER_NOT_FOUND",
            NavError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            NavError::InvalidSessionState { .. } => "INVALID_STATE",
            NavError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            NavError::RoutingEngineTimeout { .. } => "ROUTING_TIMEOUT",
            NavError::RoutingEngineUnavailable(_) => "ROUTING_UNAVAILABLE",
            NavError::InvalidArgument(_) => "BAD_REQUEST",
            NavError::Storage(_) | NavError::Serialization(_) | NavError::Config(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Whether the failure came from the routing engine rather than the caller
    pub fn is_routing_failure(&self) -> bool {
        matches!(
            self,
            NavError::RouteNotFound(_)
                | NavError::RoutingEngineTimeout { .. }
                | NavError::RoutingEngineUnavailable(_)
        )
    }

    /// Build a caller-facing error body
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            NavError::Storage(_) | NavError::Serialization(_) | NavError::Config(_) => {
                "서버 오류가 발생했습니다".to_string()
            }
            other => other.to_string(),
        };
        ErrorResponse {
            error: self.code().to_string(),
            message,
        }
    }
}

/// Uniform error body handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Result type alias for navigation operations
pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(NavError::RouteNotFound("x".into()).code(), "ROUTE_NOT_FOUND");
        assert_eq!(
            NavError::InvalidSessionState {
                session: Uuid::nil(),
                status: "COMPLETED".into(),
                action: "reroute".into(),
            }
            .code(),
            "INVALID_STATE"
        );
        assert_eq!(NavError::Storage("disk".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_route_not_found_display() {
        let err = NavError::RouteNotFound("경로를 찾을 수 없습니다".into());
        assert_eq!(err.to_string(), "Route not found: 경로를 찾을 수 없습니다");
        assert_eq!(err.to_response().message, "Route not found: 경로를 찾을 수 없습니다");
    }

    #[test]
    fn test_routing_failure_classification() {
        assert!(NavError::RoutingEngineTimeout { timeout_ms: 10 }.is_routing_failure());
        assert!(NavError::RoutingEngineUnavailable("down".into()).is_routing_failure());
        assert!(!NavError::SessionNotFound(Uuid::nil()).is_routing_failure());
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let resp = NavError::Storage("/var/lib/secret.json: permission denied".into()).to_response();
        assert_eq!(resp.error, "INTERNAL_ERROR");
        assert!(!resp.message.contains("secret"));

        let resp = NavError::InvalidArgument("lat out of range".into()).to_response();
        assert_eq!(resp.error, "BAD_REQUEST");
        assert!(resp.message.contains("lat out of range"));
    }
}
