//! Suppression of duplicate events within a trailing time window.
//!
//! Independent UI regions may observe the same logical event through their
//! own subscriptions. Each surfacing boundary (toast queue, persisted
//! store) owns its own gate; sharing one instance across boundaries would
//! suppress the second boundary's legitimate first occurrence.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use speakhub_core::events::EventType;

/// Deduplication key
type DedupKey = String;

/// Per-boundary event dedup gate with a fixed trailing window.
#[derive(Debug)]
pub struct DedupGate {
    /// Window duration
    window: Duration,
    /// Last seen time per key
    seen: Mutex<HashMap<DedupKey, Instant>>,
}

impl DedupGate {
    /// Create a new gate with the given window.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// The configured window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check whether an event should be processed at this boundary.
    ///
    /// Returns `true` and marks the key as seen if the key has not been
    /// seen within the window; returns `false` if it is a duplicate. An
    /// entry that has outlived the window is treated as new again — a slow
    /// reconnect replay after the window is re-surfaced by design.
    pub fn should_process(&self, key: &str) -> bool {
        let mut map = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if let Some(last) = map.get(key) {
            if now.duration_since(*last) < self.window {
                return false; // Too recent — suppress
            }
        }

        map.insert(key.to_string(), now);
        true
    }

    /// Mark a key as seen without asking whether to process it.
    ///
    /// Used when a later filter check fails: the key must still count as
    /// seen so an identical request inside the window is suppressed
    /// consistently.
    pub fn mark_seen(&self, key: &str) {
        let mut map = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), Instant::now());
    }

    /// Build a boundary dedup key from the event type, the correlation
    /// identifier, and the summary text, so deliveries that differ only by
    /// observer collapse to the same key. Every boundary builds its key
    /// through here; the format must not drift between boundaries.
    pub fn make_key(event_type: EventType, correlation_id: i64, summary: &str) -> String {
        format!("{event_type}:{correlation_id}:{summary}")
    }

    /// Evict entries that have outlived the window.
    pub fn cleanup(&self) {
        let mut map = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let window = self.window;
        map.retain(|_, v| now.duration_since(*v) < window);
    }
}
