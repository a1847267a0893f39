//! In-memory session and user stores
//!
//! Lost on drop, but useful for tests and single-process deployments.

use crate::error::{NavError, Result};
use crate::session::{NavigationSession, SessionStatus};
use crate::store::{SessionStore, UserRecord, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session rows keyed by id, with the queries every store needs
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionTable {
    rows: HashMap<Uuid, NavigationSession>,
}

impl SessionTable {
    pub(crate) fn from_sessions(sessions: Vec<NavigationSession>) -> Self {
        Self {
            rows: sessions.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// All rows, oldest first
    pub(crate) fn to_sessions(&self) -> Vec<NavigationSession> {
        let mut sessions: Vec<NavigationSession> = self.rows.values().cloned().collect();
        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.id.cmp(&b.id)));
        sessions
    }

    pub(crate) fn insert_new(&mut self, session: &NavigationSession) -> Result<()> {
        if self.rows.contains_key(&session.id) {
            return Err(NavError::Storage(format!(
                "Session {} already exists",
                session.id
            )));
        }
        self.rows.insert(session.id, session.clone());
        Ok(())
    }

    /// Replace an existing row, returning the previous value
    pub(crate) fn replace(&mut self, session: &NavigationSession) -> Result<NavigationSession> {
        match self.rows.get_mut(&session.id) {
            Some(row) => Ok(std::mem::replace(row, session.clone())),
            None => Err(NavError::Storage(format!(
                "Cannot save unknown session {}",
                session.id
            ))),
        }
    }

    pub(crate) fn remove(&mut self, session_id: Uuid) {
        self.rows.remove(&session_id);
    }

    pub(crate) fn restore(&mut self, previous: NavigationSession) {
        self.rows.insert(previous.id, previous);
    }

    pub(crate) fn find_active(&self, user_id: Uuid) -> Option<NavigationSession> {
        self.rows
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .max_by_key(|s| s.started_at)
            .cloned()
    }

    pub(crate) fn find_for_user(&self, user_id: Uuid, session_id: Uuid) -> Option<NavigationSession> {
        self.rows
            .get(&session_id)
            .filter(|s| s.user_id == user_id)
            .cloned()
    }

    pub(crate) fn history(&self, user_id: Uuid, page: usize, size: usize) -> (Vec<NavigationSession>, u64) {
        let mut owned: Vec<&NavigationSession> =
            self.rows.values().filter(|s| s.user_id == user_id).collect();
        owned.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));

        let total = owned.len() as u64;
        let sessions = owned
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .cloned()
            .collect();
        (sessions, total)
    }

    pub(crate) fn count_by_status(&self, user_id: Uuid, status: SessionStatus) -> u64 {
        self.rows
            .values()
            .filter(|s| s.user_id == user_id && s.status == status)
            .count() as u64
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

/// In-memory session store
#[derive(Default, Clone)]
pub struct MemorySessionStore {
    table: Arc<RwLock<SessionTable>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored sessions across all users
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored session, oldest first
    pub async fn all(&self) -> Vec<NavigationSession> {
        self.table.read().await.to_sessions()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &NavigationSession) -> Result<()> {
        self.table.write().await.insert_new(session)
    }

    async fn find_active(&self, user_id: Uuid) -> Result<Option<NavigationSession>> {
        Ok(self.table.read().await.find_active(user_id))
    }

    async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<NavigationSession>> {
        Ok(self.table.read().await.find_for_user(user_id, session_id))
    }

    async fn save(&self, session: &NavigationSession) -> Result<()> {
        self.table.write().await.replace(session).map(|_| ())
    }

    async fn list_history(
        &self,
        user_id: Uuid,
        page: usize,
        size: usize,
    ) -> Result<(Vec<NavigationSession>, u64)> {
        Ok(self.table.read().await.history(user_id, page, size))
    }

    async fn count_by_status(&self, user_id: Uuid, status: SessionStatus) -> Result<u64> {
        Ok(self.table.read().await.count_by_status(user_id, status))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// In-memory user directory
#[derive(Default, Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a user
    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
