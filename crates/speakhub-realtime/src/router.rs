//! Event router — fans one envelope out to reconcilers, the persisted
//! store, and the toast queue.
//!
//! The store boundary and the toast boundary each run their own dedup
//! gate (inside the store and the queue respectively), so independent
//! subscribers calling in arbitrary relative order still converge on
//! exactly one persisted record and exactly one shown toast.

use std::sync::Arc;

use speakhub_core::events::EventEnvelope;

use crate::notification::formatter;
use crate::notification::store::NotificationStore;
use crate::notification::toast::{Toast, ToastQueue};
use crate::reconciler::ViewReconcilers;

/// Routes envelopes from any number of channel subscriptions.
pub struct EventRouter {
    store: Arc<NotificationStore>,
    toasts: Arc<ToastQueue>,
    reconcilers: Arc<ViewReconcilers>,
}

impl EventRouter {
    /// Create a router over the session singletons.
    pub fn new(
        store: Arc<NotificationStore>,
        toasts: Arc<ToastQueue>,
        reconcilers: Arc<ViewReconcilers>,
    ) -> Self {
        Self {
            store,
            toasts,
            reconcilers,
        }
    }

    /// Route one envelope.
    ///
    /// The raw envelope goes to the reconcilers first, unconditionally.
    /// The persisted record and the toast request are then driven
    /// independently; a type with its toast switch off still persists.
    pub fn ingest(&self, envelope: &EventEnvelope) {
        tracing::debug!(
            event_type = %envelope.payload.event_type(),
            course_id = %envelope.payload.course_id(),
            "routing envelope"
        );

        self.reconcilers.notify(envelope);

        let rendered = formatter::format_event(&envelope.payload);

        // Store boundary.
        let record = rendered.clone().into_record(&envelope.payload);
        self.store.add(record);

        // Toast boundary.
        let toast = Toast::from_formatted(
            rendered,
            envelope.payload.primary_correlation_id(),
            self.toasts.default_life(),
        );
        self.toasts.request(toast);
    }

    /// Evict expired dedup entries at both boundaries.
    pub fn cleanup_dedup(&self) {
        self.store.cleanup_dedup();
        self.toasts.cleanup_dedup();
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("reconcilers", &self.reconcilers.len())
            .finish()
    }
}
