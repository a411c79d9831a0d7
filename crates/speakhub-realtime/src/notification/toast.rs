//! Ephemeral toast presentation queue.
//!
//! Requests to show a toast are filtered, deduplicated, and serialized:
//! one show operation is in flight at a time and the FIFO drains with a
//! short inter-item delay so event bursts do not overlap or get lost.
//! Requests that arrive before the consumer is ready, or while no
//! rendering surface is attached, are parked in the readiness buffer
//! instead of being dropped.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use speakhub_core::config::NotificationsConfig;
use speakhub_core::events::EventType;
use speakhub_core::result::AppResult;
use speakhub_core::types::Severity;

use super::dedup::DedupGate;
use super::filter::FilterState;
use super::formatter::FormattedNotification;
use super::readiness::ReadinessBuffer;

/// One ephemeral notification to display.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Display severity.
    pub severity: Severity,
    /// Short headline.
    pub summary: String,
    /// Longer body text.
    pub detail: Option<String>,
    /// The originating event type.
    pub event_type: EventType,
    /// The identifier that makes the underlying event semantically unique.
    pub correlation_id: i64,
    /// Visible duration.
    pub life: Duration,
}

impl Toast {
    /// Build a toast from rendered notification text.
    pub fn from_formatted(
        rendered: FormattedNotification,
        correlation_id: i64,
        life: Duration,
    ) -> Self {
        Self {
            severity: rendered.severity,
            summary: rendered.summary,
            detail: Some(rendered.detail),
            event_type: rendered.event_type,
            correlation_id,
            life,
        }
    }

    fn dedup_key(&self) -> String {
        DedupGate::make_key(self.event_type, self.correlation_id, &self.summary)
    }
}

/// The rendering surface that actually displays a toast.
///
/// `show` is fire-and-forget from the queue's point of view; an `Err`
/// means the surface could not take the request right now and the item is
/// retried on the next drain cycle.
pub trait ToastSurface: Send + Sync + 'static {
    /// Display one toast.
    fn show(&self, toast: &Toast) -> AppResult<()>;
}

struct QueueItem {
    toast: Toast,
    /// Set on the first failed show; bounds retries to the dedup window.
    first_failure: Option<Instant>,
}

/// Single-flight FIFO queue of toast requests.
pub struct ToastQueue {
    filters: Arc<FilterState>,
    /// Toast-boundary dedup gate, independent from the store's.
    dedup: DedupGate,
    readiness: ReadinessBuffer<Toast>,
    surface: RwLock<Option<Arc<dyn ToastSurface>>>,
    fifo: Mutex<VecDeque<QueueItem>>,
    draining: AtomicBool,
    drain_delay: Duration,
    default_life: Duration,
}

impl ToastQueue {
    /// Create a queue in the not-ready state with no surface attached.
    pub fn new(filters: Arc<FilterState>, config: &NotificationsConfig) -> Self {
        Self {
            filters,
            dedup: DedupGate::new(config.dedup_window_ms),
            readiness: ReadinessBuffer::new(),
            surface: RwLock::new(None),
            fifo: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            drain_delay: Duration::from_millis(config.toast_drain_delay_ms),
            default_life: Duration::from_millis(config.toast_life_ms),
        }
    }

    /// The default visible duration for toasts built by the router.
    pub fn default_life(&self) -> Duration {
        self.default_life
    }

    /// Request that a toast be shown.
    ///
    /// Applies, in order: the role allow-list, the per-type toast switch,
    /// the global mute, and the dedup gate. A request that fails any check
    /// still marks the dedup key as seen so an identical request within
    /// the window is suppressed consistently. Returns whether the request
    /// was accepted for display.
    pub fn request(self: &Arc<Self>, toast: Toast) -> bool {
        let key = toast.dedup_key();

        if !self.filters.role_allows(toast.event_type) {
            tracing::debug!(key = %key, "toast dropped by role allow-list");
            self.dedup.mark_seen(&key);
            return false;
        }
        if !self.filters.toast_enabled(toast.event_type) {
            tracing::debug!(key = %key, "toast disabled for type");
            self.dedup.mark_seen(&key);
            return false;
        }
        if self.filters.is_muted() {
            tracing::debug!(key = %key, "toasts muted");
            self.dedup.mark_seen(&key);
            return false;
        }
        if !self.dedup.should_process(&key) {
            tracing::trace!(key = %key, "toast deduplicated");
            return false;
        }

        // Logical readiness first; surface availability second. Both
        // defer into the same buffer so nothing is dropped during
        // startup-order races.
        match self.readiness.defer(toast) {
            Ok(()) => true,
            Err(toast) => {
                self.deliver_or_park(toast);
                true
            }
        }
    }

    /// Signal that the consuming component finished mounting. Buffered
    /// requests are replayed in arrival order; they have already passed
    /// the filter and dedup checks.
    pub fn mark_ready(self: &Arc<Self>) {
        for toast in self.readiness.mark_ready() {
            self.deliver_or_park(toast);
        }
    }

    /// Whether readiness has been signaled.
    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Attach the rendering surface (mount) and replay anything parked
    /// while it was unavailable.
    pub fn attach_surface(self: &Arc<Self>, surface: Arc<dyn ToastSurface>) {
        *self.surface.write().unwrap_or_else(|e| e.into_inner()) = Some(surface);
        if self.readiness.is_ready() {
            for toast in self.readiness.take_pending() {
                self.deliver_or_park(toast);
            }
        }
    }

    /// Detach the rendering surface (unmount). Queued items park in the
    /// readiness buffer on the next drain attempt.
    pub fn detach_surface(&self) {
        *self.surface.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Number of items waiting in the FIFO (excluding parked items).
    pub fn queued_len(&self) -> usize {
        self.fifo.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of items parked for readiness or a missing surface.
    pub fn parked_len(&self) -> usize {
        self.readiness.pending_len()
    }

    /// Drop queued and parked items and return to the not-ready state
    /// (logout).
    pub fn reset(&self) {
        self.fifo.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.readiness.reset();
    }

    /// Evict expired dedup entries.
    pub fn cleanup_dedup(&self) {
        self.dedup.cleanup();
    }

    fn surface_handle(&self) -> Option<Arc<dyn ToastSurface>> {
        self.surface
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn deliver_or_park(self: &Arc<Self>, toast: Toast) {
        if self.surface_handle().is_none() {
            self.readiness.defer_anyway(toast);
            // A concurrent attach_surface may have replayed the buffer
            // between the check and the park; re-check so the item is not
            // stranded until the next attach.
            if self.surface_handle().is_some() {
                for toast in self.readiness.take_pending() {
                    self.enqueue(toast);
                }
            }
            return;
        }
        self.enqueue(toast);
    }

    fn enqueue(self: &Arc<Self>, toast: Toast) {
        self.fifo
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(QueueItem {
                toast,
                first_failure: None,
            });
        self.trigger_drain();
    }

    fn trigger_drain(self: &Arc<Self>) {
        if self.draining.swap(true, Ordering::AcqRel) {
            return; // a drain task is already in flight
        }
        let queue = Arc::clone(self);
        tokio::spawn(async move {
            queue.drain().await;
        });
    }

    async fn drain(self: Arc<Self>) {
        loop {
            let item = self
                .fifo
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front();
            let Some(mut item) = item else {
                break;
            };

            match self.surface_handle() {
                None => {
                    // Surface went away mid-drain; park instead of drop.
                    self.readiness.defer_anyway(item.toast);
                    continue;
                }
                Some(surface) => {
                    if let Err(e) = surface.show(&item.toast) {
                        let first = *item.first_failure.get_or_insert_with(Instant::now);
                        if first.elapsed() < self.dedup.window() {
                            tracing::warn!(error = %e, "surface rejected toast, will retry");
                            self.fifo
                                .lock()
                                .unwrap_or_else(|e| e.into_inner())
                                .push_front(item);
                        } else {
                            tracing::warn!(error = %e, "surface kept failing, dropping toast");
                        }
                    }
                }
            }

            tokio::time::sleep(self.drain_delay).await;
        }

        self.draining.store(false, Ordering::Release);
        // An item may have been enqueued between the final pop and the
        // flag reset; make sure it is not stranded.
        let stranded = !self
            .fifo
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty();
        if stranded {
            self.trigger_drain();
        }
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("ready", &self.is_ready())
            .field("queued", &self.queued_len())
            .field("parked", &self.parked_len())
            .finish()
    }
}
