//! Storage traits for sessions and users
//!
//! The navigation core consumes these; it never reaches into a backend
//! directly. Each call is expected to be a short local transaction.
//! Compound read-check-write sequences are serialized per user by
//! `SessionManager`, so a backend only has to make single calls atomic.
//! A backend shared by several processes must additionally provide its
//! own per-user isolation (e.g. `SELECT … FOR UPDATE` on the user row).

use crate::error::Result;
use crate::session::{NavigationSession, SessionStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod file;
pub mod memory;

/// Durable storage for navigation sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session; fails if the id already exists
    async fn create(&self, session: &NavigationSession) -> Result<()>;

    /// The user's `ACTIVE` session, if any
    async fn find_active(&self, user_id: Uuid) -> Result<Option<NavigationSession>>;

    /// Look up a session only if it belongs to `user_id`
    async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<NavigationSession>>;

    /// Overwrite an existing session
    async fn save(&self, session: &NavigationSession) -> Result<()>;

    /// One page of the user's sessions, newest `started_at` first,
    /// together with the user's total session count
    async fn list_history(
        &self,
        user_id: Uuid,
        page: usize,
        size: usize,
    ) -> Result<(Vec<NavigationSession>, u64)>;

    /// Number of the user's sessions in `status`
    async fn count_by_status(&self, user_id: Uuid, status: SessionStatus) -> Result<u64>;

    /// Store name (e.g., "memory", "file")
    fn name(&self) -> &str;
}

/// Identity as seen by the navigation core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserRecord {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Identity lookup
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>>;
}
