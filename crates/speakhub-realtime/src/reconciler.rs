//! View reconcilers: page-level refresh callbacks.
//!
//! A page registers a callback, optionally scoped to one course, and is
//! handed every raw envelope that matches — not deduped, not filtered —
//! so it can decide on its own whether to refetch. The router never waits
//! on a reconciler.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use speakhub_core::events::EventEnvelope;
use speakhub_core::types::CourseId;

/// A registered reconciler callback.
pub type ReconcilerFn = Arc<dyn Fn(&EventEnvelope) + Send + Sync>;

/// Opaque handle returned by [`ViewReconcilers::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReconcilerId(u64);

/// Registry of page-level reconciler callbacks.
#[derive(Default)]
pub struct ViewReconcilers {
    handlers: DashMap<ReconcilerId, (Option<CourseId>, ReconcilerFn)>,
    next_id: AtomicU64,
}

impl ViewReconcilers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. With `course` set, only envelopes for that
    /// course are forwarded; with `None`, every envelope is.
    pub fn register(
        &self,
        course: Option<CourseId>,
        callback: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> ReconcilerId {
        let id = ReconcilerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.insert(id, (course, Arc::new(callback)));
        id
    }

    /// Remove a callback (page unmount).
    pub fn unregister(&self, id: ReconcilerId) {
        self.handlers.remove(&id);
    }

    /// Forward a raw envelope to every matching callback.
    pub fn notify(&self, envelope: &EventEnvelope) {
        let course_id = envelope.payload.course_id();
        for entry in self.handlers.iter() {
            let (scope, callback) = entry.value();
            if scope.is_none() || *scope == Some(course_id) {
                callback(envelope);
            }
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Remove every callback (logout).
    pub fn clear(&self) {
        self.handlers.clear();
    }
}

impl std::fmt::Debug for ViewReconcilers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewReconcilers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
