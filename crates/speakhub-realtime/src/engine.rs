//! Session engine — explicit construction and lifecycle for the
//! notification singletons.
//!
//! One engine per session owns the filter state, the persisted store, the
//! toast queue, the reconciler registry, and the router. Nothing here is
//! ambient module state; whoever owns the UI tree root constructs the
//! engine and passes it down.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use speakhub_core::config::RealtimeConfig;
use speakhub_core::result::AppResult;
use speakhub_core::types::{UserId, UserRole};

use crate::channel::{ChannelAuth, CourseChannel, spawn_forwarder};
use crate::notification::filter::FilterState;
use crate::notification::persistence::NotificationRepository;
use crate::notification::store::NotificationStore;
use crate::notification::toast::ToastQueue;
use crate::reconciler::ViewReconcilers;
use crate::router::EventRouter;

/// The per-session notification engine.
pub struct SessionEngine {
    filters: Arc<FilterState>,
    store: Arc<NotificationStore>,
    toasts: Arc<ToastQueue>,
    reconcilers: Arc<ViewReconcilers>,
    router: Arc<EventRouter>,
    forwarders: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionEngine {
    /// Build the engine over a repository.
    pub fn new(config: &RealtimeConfig, repo: Arc<dyn NotificationRepository>) -> Self {
        let filters = Arc::new(FilterState::new());
        let store = Arc::new(NotificationStore::new(
            Arc::clone(&filters),
            repo,
            &config.notifications,
        ));
        let toasts = Arc::new(ToastQueue::new(
            Arc::clone(&filters),
            &config.notifications,
        ));
        let reconcilers = Arc::new(ViewReconcilers::new());
        let router = Arc::new(EventRouter::new(
            Arc::clone(&store),
            Arc::clone(&toasts),
            Arc::clone(&reconcilers),
        ));
        Self {
            filters,
            store,
            toasts,
            reconcilers,
            router,
            forwarders: Mutex::new(Vec::new()),
        }
    }

    /// Session filter state (role, per-type switches, mute).
    pub fn filters(&self) -> &Arc<FilterState> {
        &self.filters
    }

    /// The persisted notification store.
    pub fn store(&self) -> &Arc<NotificationStore> {
        &self.store
    }

    /// The toast presentation queue.
    pub fn toasts(&self) -> &Arc<ToastQueue> {
        &self.toasts
    }

    /// The view-reconciler registry.
    pub fn reconcilers(&self) -> &Arc<ViewReconcilers> {
        &self.reconcilers
    }

    /// The event router, for driving subscriptions manually.
    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    /// Start a session: fix the role and load the user's persisted list.
    pub async fn login(&self, user_id: UserId, role: UserRole) -> AppResult<()> {
        tracing::info!(user_id = %user_id, role = %role, "session start");
        self.filters.set_role(Some(role));
        self.store.set_user(Some(user_id)).await
    }

    /// Open a channel subscription for one course and forward it into the
    /// router until the channel closes or the session ends.
    pub async fn follow_course(
        &self,
        channel: &dyn CourseChannel,
        auth: &ChannelAuth,
    ) -> AppResult<()> {
        let subscription = channel.open(auth).await?;
        let handle = spawn_forwarder(subscription, Arc::clone(&self.router));
        self.forwarders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
        Ok(())
    }

    /// End the session: flush the store, stop forwarders, and reset every
    /// singleton to its pre-login state.
    pub async fn logout(&self) -> AppResult<()> {
        tracing::info!("session end");
        let flush_result = self.store.flush().await;

        for handle in self
            .forwarders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
        {
            handle.abort();
        }
        self.store.set_user(None).await?;
        self.filters.reset();
        self.toasts.reset();
        self.reconcilers.clear();
        flush_result
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("user_id", &self.store.current_user())
            .field("role", &self.filters.role())
            .finish()
    }
}
