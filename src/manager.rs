//! Session manager — owns session transitions and the one-active-trip rule
//!
//! Every read-check-write sequence on a user's sessions runs while holding
//! that user's lock, so two concurrent requests from the same user can
//! never both observe "no active session". Users never contend with each
//! other. The lock is only held around store calls, never around a
//! routing-engine request.

use crate::error::{NavError, Result};
use crate::session::{transition, NavigationSession, SessionEvent};
use crate::store::SessionStore;
use crate::types::Coordinate;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Lock table entries are pruned once it grows past this many users
const LOCK_TABLE_PRUNE_THRESHOLD: usize = 1024;

/// Parameters for a new session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub dest_name: String,
    pub distance_meters: u32,
}

/// Result of starting a session
#[derive(Debug, Clone)]
pub struct StartedSession {
    /// The freshly created `ACTIVE` session
    pub session: NavigationSession,
    /// A previously active session that was cancelled to make room
    pub cancelled: Option<NavigationSession>,
}

/// Owner of the navigation session state machine
pub struct SessionManager {
    store: Arc<dyn SessionStore>,

    /// Per-user serialization (user_id → lock)
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    async fn lock_user(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() > LOCK_TABLE_PRUNE_THRESHOLD {
                locks.retain(|_, l| Arc::strong_count(l) > 1);
            }
            locks
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// The user's current active session, if any
    pub async fn active_session(&self, user_id: Uuid) -> Result<Option<NavigationSession>> {
        self.store.find_active(user_id).await
    }

    /// Load a session owned by `user_id`
    pub async fn find_for_user(&self, user_id: Uuid, session_id: Uuid) -> Result<NavigationSession> {
        self.store
            .find_by_id_for_user(user_id, session_id)
            .await?
            .ok_or(NavError::SessionNotFound(session_id))
    }

    /// Cancel the user's active session; no-op if there is none
    pub async fn cancel_active(&self, user_id: Uuid) -> Result<Option<NavigationSession>> {
        let _guard = self.lock_user(user_id).await;
        self.cancel_active_locked(user_id).await
    }

    async fn cancel_active_locked(&self, user_id: Uuid) -> Result<Option<NavigationSession>> {
        let Some(active) = self.store.find_active(user_id).await? else {
            return Ok(None);
        };

        let cancelled = transition(&active, SessionEvent::Cancel, Utc::now())?;
        self.store.save(&cancelled).await?;

        tracing::info!(
            session = %cancelled.id,
            user = %user_id,
            "Cancelled existing active session"
        );
        Ok(Some(cancelled))
    }

    /// Create a new `ACTIVE` session, cancelling any active one first
    ///
    /// Both steps happen under the user's lock, so the user never has two
    /// active sessions even when requests race.
    pub async fn start_session(&self, params: NewSession) -> Result<StartedSession> {
        let _guard = self.lock_user(params.user_id).await;

        let cancelled = self.cancel_active_locked(params.user_id).await?;

        let session = NavigationSession::create(
            params.user_id,
            params.origin,
            params.destination,
            params.dest_name,
            params.distance_meters,
            Utc::now(),
        );
        self.store.create(&session).await?;

        tracing::info!(
            session = %session.id,
            user = %session.user_id,
            distance = session.distance_meters,
            "Created navigation session"
        );

        Ok(StartedSession { session, cancelled })
    }

    /// Apply one lifecycle event to a session the user owns and persist it
    pub async fn apply(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        event: SessionEvent,
    ) -> Result<NavigationSession> {
        let _guard = self.lock_user(user_id).await;

        let current = self.find_for_user(user_id, session_id).await?;
        let next = transition(&current, event, Utc::now())?;
        self.store.save(&next).await?;

        tracing::info!(
            session = %session_id,
            user = %user_id,
            from = %current.status,
            to = %next.status,
            reroute_count = next.reroute_count,
            "Session transition applied"
        );
        Ok(next)
    }

    pub async fn complete(&self, user_id: Uuid, session_id: Uuid) -> Result<NavigationSession> {
        self.apply(user_id, session_id, SessionEvent::Complete).await
    }

    pub async fn cancel(&self, user_id: Uuid, session_id: Uuid) -> Result<NavigationSession> {
        self.apply(user_id, session_id, SessionEvent::Cancel).await
    }

    /// Mark a session as failed
    ///
    /// Not reachable from the caller-facing status update; reserved for
    /// integrations that detect an unrecoverable trip.
    pub async fn fail(&self, user_id: Uuid, session_id: Uuid) -> Result<NavigationSession> {
        self.apply(user_id, session_id, SessionEvent::Fail).await
    }

    /// Record a successful reroute
    pub async fn record_reroute(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        distance_meters: u32,
    ) -> Result<NavigationSession> {
        self.apply(
            user_id,
            session_id,
            SessionEvent::RerouteSuccess { distance_meters },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use crate::store::memory::MemorySessionStore;

    fn new_session(user_id: Uuid, distance: u32) -> NewSession {
        NewSession {
            user_id,
            origin: Coordinate::new(37.123, 127.456),
            destination: Coordinate::new(37.130, 127.460),
            dest_name: "목적지".to_string(),
            distance_meters: distance,
        }
    }

    fn manager() -> (SessionManager, MemorySessionStore) {
        let store = MemorySessionStore::new();
        (SessionManager::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_start_session_cancels_previous() {
        let (manager, store) = manager();
        let user = Uuid::new_v4();

        let first = manager.start_session(new_session(user, 850)).await.unwrap();
        assert!(first.cancelled.is_none());

        let second = manager.start_session(new_session(user, 400)).await.unwrap();
        let cancelled = second.cancelled.unwrap();
        assert_eq!(cancelled.id, first.session.id);
        assert_eq!(cancelled.status, SessionStatus::Cancelled);
        assert!(cancelled.completed_at.is_some());

        let active = manager.active_session(user).await.unwrap().unwrap();
        assert_eq!(active.id, second.session.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_cancel_active_without_session_is_noop() {
        let (manager, store) = manager();
        assert!(manager.cancel_active(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_apply_checks_ownership() {
        let (manager, _) = manager();
        let owner = Uuid::new_v4();
        let started = manager.start_session(new_session(owner, 850)).await.unwrap();

        let err = manager
            .complete(Uuid::new_v4(), started.session.id)
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::SessionNotFound(id) if id == started.session.id));
    }

    #[tokio::test]
    async fn test_terminal_session_is_immutable() {
        let (manager, store) = manager();
        let user = Uuid::new_v4();
        let id = manager.start_session(new_session(user, 850)).await.unwrap().session.id;

        let done = manager.complete(user, id).await.unwrap();
        assert_eq!(done.status, SessionStatus::Completed);

        for result in [
            manager.cancel(user, id).await,
            manager.fail(user, id).await,
            manager.record_reroute(user, id, 10).await,
        ] {
            assert!(matches!(result, Err(NavError::InvalidSessionState { .. })));
        }

        let stored = store.find_by_id_for_user(user, id).await.unwrap().unwrap();
        assert_eq!(stored, done);
    }

    #[tokio::test]
    async fn test_record_reroute() {
        let (manager, _) = manager();
        let user = Uuid::new_v4();
        let id = manager.start_session(new_session(user, 850)).await.unwrap().session.id;

        let updated = manager.record_reroute(user, id, 600).await.unwrap();
        assert_eq!(updated.reroute_count, 1);
        assert_eq!(updated.distance_meters, 600);
        assert_eq!(updated.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_concurrent_starts_leave_one_active() {
        let store = MemorySessionStore::new();
        let manager = Arc::new(SessionManager::new(Arc::new(store.clone())));
        let user = Uuid::new_v4();

        let mut handles = Vec::new();
        for i in 0..20 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager.start_session(new_session(user, 100 + i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let sessions = store.all().await;
        assert_eq!(sessions.len(), 20);
        assert_eq!(sessions.iter().filter(|s| s.is_active()).count(), 1);
    }
}
