//! Persisted notification store.
//!
//! Append-only per user (individual removal, clear by type, clear visible,
//! and clear all are the only shrinking operations). The in-memory list is
//! authoritative for the session; every mutation fires a non-blocking save
//! through the repository, and a storage failure is logged without
//! retrying mid-session.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use speakhub_core::config::NotificationsConfig;
use speakhub_core::events::EventType;
use speakhub_core::result::AppResult;
use speakhub_core::types::UserId;

use super::dedup::DedupGate;
use super::filter::FilterState;
use super::persistence::NotificationRepository;
use super::record::NotificationRecord;

#[derive(Debug)]
struct StoreState {
    user_id: Option<UserId>,
    /// Newest first.
    records: Vec<NotificationRecord>,
}

/// Per-session store of notification records, keyed by the current user.
pub struct NotificationStore {
    filters: Arc<FilterState>,
    /// Store-boundary dedup gate. The toast queue owns its own; one gate
    /// must never serve two boundaries.
    dedup: DedupGate,
    repo: Arc<dyn NotificationRepository>,
    max_stored: usize,
    inner: Mutex<StoreState>,
}

impl NotificationStore {
    /// Create a store over the given repository.
    pub fn new(
        filters: Arc<FilterState>,
        repo: Arc<dyn NotificationRepository>,
        config: &NotificationsConfig,
    ) -> Self {
        Self {
            filters,
            dedup: DedupGate::new(config.dedup_window_ms),
            repo,
            max_stored: config.max_stored_per_user,
            inner: Mutex::new(StoreState {
                user_id: None,
                records: Vec::new(),
            }),
        }
    }

    /// Switch the store to a user, replacing the in-memory list with what
    /// the repository holds for that identifier. `None` clears the store
    /// (logout).
    pub async fn set_user(&self, user_id: Option<UserId>) -> AppResult<()> {
        let loaded = match user_id {
            Some(uid) => self.repo.load(uid).await?,
            None => Vec::new(),
        };
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.user_id = user_id;
        state.records = loaded;
        Ok(())
    }

    /// The user the store is currently keyed by.
    pub fn current_user(&self) -> Option<UserId> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .user_id
    }

    /// Append a record.
    ///
    /// The role allow-list runs first; the store-boundary dedup gate runs
    /// second. Everything that passes is appended regardless of whether a
    /// toast was also shown. Returns whether the record was appended.
    pub fn add(&self, record: NotificationRecord) -> bool {
        if !self.filters.role_allows(record.event_type) {
            tracing::debug!(event_type = %record.event_type, "record dropped by role allow-list");
            return false;
        }

        let key = record_key(&record);
        if !self.dedup.should_process(&key) {
            tracing::trace!(key = %key, "record deduplicated");
            return false;
        }

        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            state.records.insert(0, record);
            if state.records.len() > self.max_stored {
                state.records.truncate(self.max_stored);
            }
        }
        self.persist();
        true
    }

    /// Remove one record by id.
    pub fn remove(&self, id: Uuid) {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            state.records.retain(|r| r.id != id);
        }
        self.persist();
    }

    /// Remove every record.
    pub fn clear_all(&self) {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            state.records.clear();
        }
        self.persist();
    }

    /// Remove records of one type only.
    pub fn clear_by_type(&self, event_type: EventType) {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            state.records.retain(|r| r.event_type != event_type);
        }
        self.persist();
    }

    /// Remove records whose type is currently tray-visible. Hidden-type
    /// records stay: hiding a category is not deleting its history.
    pub fn clear_visible(&self) {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let filters = &self.filters;
            state
                .records
                .retain(|r| !filters.tray_visible(r.event_type));
        }
        self.persist();
    }

    /// Snapshot of every stored record, newest first.
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .clone()
    }

    /// Snapshot of the records the tray should show: role allow-list and
    /// tray-visibility applied, newest first.
    pub fn visible_records(&self) -> Vec<NotificationRecord> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .iter()
            .filter(|r| {
                self.filters.role_allows(r.event_type) && self.filters.tray_visible(r.event_type)
            })
            .cloned()
            .collect()
    }

    /// Count shown on the tray badge (total stored records).
    pub fn unread_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .len()
    }

    /// Await a durable write of the current list (used at logout).
    pub async fn flush(&self) -> AppResult<()> {
        let (user_id, snapshot) = {
            let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            (state.user_id, state.records.clone())
        };
        match user_id {
            Some(uid) => self.repo.save(uid, &snapshot).await,
            None => Ok(()),
        }
    }

    /// Evict expired dedup entries.
    pub fn cleanup_dedup(&self) {
        self.dedup.cleanup();
    }

    /// Fire-and-forget save of the current list. Rendering never waits on
    /// storage; a failure leaves the in-memory list authoritative.
    fn persist(&self) {
        let (user_id, snapshot) = {
            let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            (state.user_id, state.records.clone())
        };
        let Some(uid) = user_id else {
            return;
        };
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            if let Err(e) = repo.save(uid, &snapshot).await {
                tracing::error!(user_id = %uid, error = %e, "notification save failed");
            }
        });
    }
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("user_id", &self.current_user())
            .field("records", &self.unread_count())
            .finish()
    }
}

/// Dedup key for the store boundary: type, primary correlation id, summary.
fn record_key(record: &NotificationRecord) -> String {
    let correlation = record
        .submission_id
        .map(|id| id.into_inner())
        .or_else(|| record.exercise_id.map(|id| id.into_inner()))
        .unwrap_or(0);
    DedupGate::make_key(record.event_type, correlation, &record.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakhub_core::types::{ExerciseId, Severity, UserRole};

    use crate::notification::persistence::MemoryRepository;

    fn store_with(filters: Arc<FilterState>) -> NotificationStore {
        NotificationStore::new(
            filters,
            Arc::new(MemoryRepository::new()),
            &NotificationsConfig::default(),
        )
    }

    fn published_record(exercise: i64) -> NotificationRecord {
        NotificationRecord::new(Severity::Info, "New exercise", EventType::ExercisePublished)
            .with_correlation(None, Some(ExerciseId::new(exercise)), None)
    }

    #[tokio::test]
    async fn test_add_requires_role() {
        let filters = Arc::new(FilterState::new());
        let store = store_with(Arc::clone(&filters));

        assert!(!store.add(published_record(1)), "no role set yet");

        filters.set_role(Some(UserRole::Therapist));
        assert!(!store.add(published_record(1)), "wrong role");

        filters.set_role(Some(UserRole::Student));
        assert!(store.add(published_record(1)));
        assert_eq!(store.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_record_is_suppressed() {
        let filters = Arc::new(FilterState::new());
        filters.set_role(Some(UserRole::Student));
        let store = store_with(filters);

        assert!(store.add(published_record(42)));
        assert!(!store.add(published_record(42)));
        assert_eq!(store.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_disabled_tray_hides_but_keeps_records() {
        let filters = Arc::new(FilterState::new());
        filters.set_role(Some(UserRole::Student));
        let store = store_with(Arc::clone(&filters));

        store.add(published_record(1));
        filters.toggle_tray(EventType::ExercisePublished);

        assert!(store.visible_records().is_empty());
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_visible_spares_hidden_types() {
        let filters = Arc::new(FilterState::new());
        filters.set_role(Some(UserRole::Student));
        let store = store_with(Arc::clone(&filters));

        store.add(published_record(1));
        let deleted =
            NotificationRecord::new(Severity::Warn, "Exercise removed", EventType::ExerciseDeleted)
                .with_correlation(None, Some(ExerciseId::new(2)), None);
        store.add(deleted);

        filters.toggle_tray(EventType::ExerciseDeleted); // hide deletions
        store.clear_visible();

        let remaining = store.records();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].event_type, EventType::ExerciseDeleted);
    }

    #[tokio::test]
    async fn test_set_user_replaces_not_merges() {
        let filters = Arc::new(FilterState::new());
        filters.set_role(Some(UserRole::Student));
        let repo = Arc::new(MemoryRepository::new());
        let store = NotificationStore::new(
            Arc::clone(&filters),
            Arc::clone(&repo) as Arc<dyn NotificationRepository>,
            &NotificationsConfig::default(),
        );

        store.set_user(Some(UserId::new(1))).await.unwrap();
        store.add(published_record(1));
        store.flush().await.unwrap();

        store.set_user(Some(UserId::new(2))).await.unwrap();
        assert_eq!(store.unread_count(), 0, "user B must not see user A's list");

        store.set_user(Some(UserId::new(1))).await.unwrap();
        assert_eq!(store.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_cap_trims_oldest() {
        let filters = Arc::new(FilterState::new());
        filters.set_role(Some(UserRole::Student));
        let config = NotificationsConfig {
            max_stored_per_user: 2,
            ..Default::default()
        };
        let store = NotificationStore::new(
            filters,
            Arc::new(MemoryRepository::new()),
            &config,
        );

        for i in 0..4 {
            let mut record = published_record(i);
            record.summary = format!("exercise {i}");
            assert!(store.add(record));
        }
        let records = store.records();
        assert_eq!(records.len(), 2);
        // Newest first; the oldest two were trimmed.
        assert_eq!(records[0].summary, "exercise 3");
        assert_eq!(records[1].summary, "exercise 2");
    }
}
