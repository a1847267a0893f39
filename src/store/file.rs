//! JSON file-backed session store
//!
//! Keeps every session in memory and rewrites the whole file after each
//! change. Atomic writes via temp file + rename prevent corruption; a
//! failed write rolls the in-memory row back so the store never reports
//! state it could not persist.

use crate::error::{NavError, Result};
use crate::session::{NavigationSession, SessionStatus};
use crate::store::memory::SessionTable;
use crate::store::SessionStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session store persisted as a pretty-printed JSON array
pub struct FileSessionStore {
    path: PathBuf,
    table: RwLock<SessionTable>,
}

impl FileSessionStore {
    /// Open the store, loading existing sessions if the file exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sessions = load_sessions(&path).await?;

        tracing::debug!(
            path = %path.display(),
            count = sessions.len(),
            "Session file loaded"
        );

        Ok(Self {
            path,
            table: RwLock::new(SessionTable::from_sessions(sessions)),
        })
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &SessionTable) -> Result<()> {
        let json = serde_json::to_string_pretty(&table.to_sessions())?;

        let tmp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                NavError::Storage(format!(
                    "Failed to create session directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        write_synced(&tmp_path, json.as_bytes()).await.map_err(|e| {
            NavError::Storage(format!(
                "Failed to write session file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            NavError::Storage(format!(
                "Failed to rename session file {} → {}: {}",
                tmp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "Sessions saved");
        Ok(())
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn load_sessions(path: &Path) -> Result<Vec<NavigationSession>> {
    let json = match fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(NavError::Storage(format!(
                "Failed to read session file {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_str(&json).map_err(|e| {
        NavError::Storage(format!(
            "Failed to parse session file {}: {}",
            path.display(),
            e
        ))
    })
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn create(&self, session: &NavigationSession) -> Result<()> {
        let mut table = self.table.write().await;
        table.insert_new(session)?;
        if let Err(e) = self.persist(&table).await {
            table.remove(session.id);
            return Err(e);
        }
        Ok(())
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
        let mut table = self.table.write().await;
        let previous = table.replace(session)?;
        if let Err(e) = self.persist(&table).await {
            table.restore(previous);
            return Err(e);
        }
        Ok(())
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
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{transition, SessionEvent};
    use crate::types::Coordinate;
    use chrono::Utc;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("a3s-nav-test-{}", Uuid::new_v4()))
    }

    fn sample_session(user_id: Uuid) -> NavigationSession {
        NavigationSession::create(
            user_id,
            Coordinate::new(37.123, 127.456),
            Coordinate::new(37.130, 127.460),
            "서울역",
            850,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = temp_dir();
        let path = dir.join("sessions.json");
        let user = Uuid::new_v4();
        let session = sample_session(user);

        {
            let store = FileSessionStore::open(&path).await.unwrap();
            store.create(&session).await.unwrap();
            let done = transition(&session, SessionEvent::Complete, Utc::now()).unwrap();
            store.save(&done).await.unwrap();
        }

        let reopened = FileSessionStore::open(&path).await.unwrap();
        let loaded = reopened
            .find_by_id_for_user(user, session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, SessionStatus::Completed);
        assert_eq!(loaded.dest_name, "서울역");
        assert!(loaded.completed_at.is_some());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"COMPLETED\""));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let store = FileSessionStore::open("/tmp/nonexistent-a3s-nav-sessions.json")
            .await
            .unwrap();
        let (sessions, total) = store.list_history(Uuid::new_v4(), 0, 10).await.unwrap();
        assert!(sessions.is_empty());
        assert_eq!(total, 0);
        assert_eq!(store.name(), "file");
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dirs_and_cleans_tmp() {
        let dir = temp_dir();
        let path = dir.join("nested/deep/sessions.json");
        let store = FileSessionStore::open(&path).await.unwrap();

        store.create(&sample_session(Uuid::new_v4())).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sessions.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileSessionStore::open(&path).await,
            Err(NavError::Storage(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let dir = temp_dir();
        let path = dir.join("blocked/sessions.json");
        let store = FileSessionStore::open(&path).await.unwrap();

        // A regular file where the parent directory should be
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("blocked"), "").unwrap();

        let user = Uuid::new_v4();
        let session = sample_session(user);
        assert!(matches!(
            store.create(&session).await,
            Err(NavError::Storage(_))
        ));
        assert!(store
            .find_by_id_for_user(user, session.id)
            .await
            .unwrap()
            .is_none());
        assert!(store.find_active(user).await.unwrap().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
