//! Durable per-user storage for notification records.
//!
//! The store talks to a repository so the backing medium is swappable.
//! Writes are full-list serializations keyed by the user identifier;
//! lists of different users never mix.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;

use speakhub_core::error::AppError;
use speakhub_core::result::AppResult;
use speakhub_core::types::UserId;

use super::record::NotificationRecord;

/// Repository contract for per-user notification lists.
#[async_trait]
pub trait NotificationRepository: Send + Sync + 'static {
    /// Load the stored list for a user. An unknown user yields an empty
    /// list, not an error.
    async fn load(&self, user_id: UserId) -> AppResult<Vec<NotificationRecord>>;

    /// Replace the stored list for a user.
    async fn save(&self, user_id: UserId, records: &[NotificationRecord]) -> AppResult<()>;
}

/// In-memory repository for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    lists: DashMap<UserId, Vec<NotificationRecord>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemoryRepository {
    async fn load(&self, user_id: UserId) -> AppResult<Vec<NotificationRecord>> {
        Ok(self
            .lists
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn save(&self, user_id: UserId, records: &[NotificationRecord]) -> AppResult<()> {
        self.lists.insert(user_id, records.to_vec());
        Ok(())
    }
}

/// File-backed repository: one JSON document per user under a data
/// directory.
#[derive(Debug)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository rooted at `dir`. The directory is created on
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, user_id: UserId) -> PathBuf {
        self.dir.join(format!("notifications-{user_id}.json"))
    }
}

#[async_trait]
impl NotificationRepository for JsonFileRepository {
    async fn load(&self, user_id: UserId) -> AppResult<Vec<NotificationRecord>> {
        let path = self.path_for(user_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::with_source(
                    speakhub_core::error::ErrorKind::Serialization,
                    format!("corrupt notification file {}", path.display()),
                    e,
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::with_source(
                speakhub_core::error::ErrorKind::Storage,
                format!("failed to read {}", path.display()),
                e,
            )),
        }
    }

    async fn save(&self, user_id: UserId, records: &[NotificationRecord]) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(user_id);
        let json = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&path, json).await.map_err(|e| {
            AppError::with_source(
                speakhub_core::error::ErrorKind::Storage,
                format!("failed to write {}", path.display()),
                e,
            )
        })
    }
}
