//! Route orchestration — the top-level navigation use cases
//!
//! `RouteOrchestrator` composes the session manager, a routing engine and
//! the instruction translator. Engine failures never leave partial session
//! state behind: a session is only created or updated after the engine has
//! answered successfully.

use crate::config::NavConfig;
use crate::error::{NavError, Result};
use crate::manager::{NewSession, SessionManager};
use crate::routing::RoutingEngine;
use crate::session::{NavigationSession, SessionEvent, SessionStatus};
use crate::store::{SessionStore, UserStore};
use crate::translator;
use crate::types::{HistoryPage, RerouteRequest, RouteRequest, RouteResponse, SessionSummary};
use std::sync::Arc;
use uuid::Uuid;

/// Entry point for route calculation, rerouting and session status updates
pub struct RouteOrchestrator {
    engine: Box<dyn RoutingEngine>,
    users: Arc<dyn UserStore>,
    sessions: SessionManager,
    config: NavConfig,
}

impl RouteOrchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new(
        engine: impl RoutingEngine + 'static,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self::with_config(engine, users, sessions, NavConfig::default())
    }

    pub fn with_config(
        engine: impl RoutingEngine + 'static,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: NavConfig,
    ) -> Self {
        Self {
            engine: Box::new(engine),
            users,
            sessions: SessionManager::new(sessions),
            config,
        }
    }

    /// Get the routing engine name
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Get the session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Plan a new trip and make it the user's active session
    ///
    /// Any previously active session is cancelled before the engine is
    /// asked, and stays cancelled even if the engine then fails.
    pub async fn calculate_route(&self, user_id: Uuid, request: RouteRequest) -> Result<RouteResponse> {
        request.origin.validate("origin")?;
        request.destination.validate("destination")?;

        tracing::info!(
            user = %user_id,
            origin_lat = request.origin.lat,
            origin_lng = request.origin.lng,
            dest_lat = request.destination.lat,
            dest_lng = request.destination.lng,
            "Calculating route"
        );

        if self.users.find_by_id(user_id).await?.is_none() {
            tracing::warn!(user = %user_id, "Route requested for unknown user");
            return Err(NavError::UserNotFound(user_id));
        }

        self.sessions.cancel_active(user_id).await?;

        let raw = self
            .engine
            .route(request.origin, request.destination)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    user = %user_id,
                    engine = self.engine.name(),
                    error = %e,
                    "Route calculation failed"
                );
            })?;
        let result = translator::translate(&raw);

        let dest_name = request
            .dest_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.config.default_dest_name.clone());

        let started = self
            .sessions
            .start_session(NewSession {
                user_id,
                origin: request.origin,
                destination: request.destination,
                dest_name,
                distance_meters: result.distance,
            })
            .await?;

        Ok(RouteResponse::new(started.session.id, result))
    }

    /// Recompute the remaining route from the user's current position
    ///
    /// The session is only touched after the engine succeeds; if it was
    /// completed or cancelled while the engine was working, the reroute
    /// is rejected with `InvalidSessionState`.
    pub async fn reroute(&self, user_id: Uuid, request: RerouteRequest) -> Result<RouteResponse> {
        request.current.validate("current")?;

        tracing::info!(
            user = %user_id,
            session = %request.session_id,
            current_lat = request.current.lat,
            current_lng = request.current.lng,
            "Rerouting"
        );

        let session = self
            .sessions
            .find_for_user(user_id, request.session_id)
            .await?;
        ensure_active(&session, "reroute")?;

        let raw = self
            .engine
            .route(request.current, session.destination)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    session = %session.id,
                    engine = self.engine.name(),
                    error = %e,
                    "Reroute failed, session left unchanged"
                );
            })?;
        let result = translator::translate(&raw);

        let updated = self
            .sessions
            .record_reroute(user_id, session.id, result.distance)
            .await?;

        tracing::info!(
            session = %updated.id,
            reroute_count = updated.reroute_count,
            "Reroute complete"
        );

        Ok(RouteResponse::new(updated.id, result))
    }

    /// Apply a caller-requested status change (`COMPLETED` or `CANCELLED`)
    pub async fn update_session_status(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        target: &str,
    ) -> Result<SessionSummary> {
        let event = match target {
            "COMPLETED" => SessionEvent::Complete,
            "CANCELLED" => SessionEvent::Cancel,
            other => {
                return Err(NavError::InvalidArgument(format!("Invalid status: {}", other)));
            }
        };

        let updated = self.sessions.apply(user_id, session_id, event).await?;
        Ok(SessionSummary::from(&updated))
    }

    /// The session currently guiding the user, if any
    pub async fn active_session(&self, user_id: Uuid) -> Result<Option<NavigationSession>> {
        self.sessions.active_session(user_id).await
    }

    /// The user's past and present sessions, newest first
    ///
    /// `offset` is rounded down to a whole page of `limit` sessions.
    pub async fn history(&self, user_id: Uuid, offset: usize, limit: usize) -> Result<HistoryPage> {
        let limit = self.config.history_limit(limit);
        let page = offset / limit.max(1);

        let (sessions, total) = self
            .sessions
            .store()
            .list_history(user_id, page, limit)
            .await?;

        Ok(HistoryPage {
            sessions: sessions.iter().map(SessionSummary::from).collect(),
            total,
            limit,
            offset,
        })
    }

    /// How many trips the user finished at their destination
    pub async fn completed_count(&self, user_id: Uuid) -> Result<u64> {
        self.sessions
            .store()
            .count_by_status(user_id, SessionStatus::Completed)
            .await
    }
}

fn ensure_active(session: &NavigationSession, action: &str) -> Result<()> {
    if session.is_active() {
        Ok(())
    } else {
        Err(NavError::InvalidSessionState {
            session: session.id,
            status: session.status.to_string(),
            action: action.to_string(),
        })
    }
}
