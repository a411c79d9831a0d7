//! Startup-race guard: buffer items that arrive before a consumer mounts.
//!
//! A channel can start delivering before the consuming component has
//! finished mounting. While not ready, routing requests are queued; once
//! readiness is signaled the queue is drained in arrival order and each
//! item is processed as if it had just arrived. The consumer may defer
//! again after readiness (the rendering surface can become available
//! strictly later than logical readiness), so `defer_anyway` stays usable
//! after `mark_ready`.

use std::collections::VecDeque;
use std::sync::Mutex;

/// A queue of deferred items plus a readiness flag.
#[derive(Debug)]
pub struct ReadinessBuffer<T> {
    inner: Mutex<State<T>>,
}

#[derive(Debug)]
struct State<T> {
    ready: bool,
    pending: VecDeque<T>,
}

impl<T> ReadinessBuffer<T> {
    /// Create a buffer in the not-ready state.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(State {
                ready: false,
                pending: VecDeque::new(),
            }),
        }
    }

    /// Whether readiness has been signaled.
    pub fn is_ready(&self) -> bool {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).ready
    }

    /// Defer `item` if readiness has not been signaled yet.
    ///
    /// Returns `Err(item)` when already ready, handing the item back to the
    /// caller for immediate processing.
    pub fn defer(&self, item: T) -> Result<(), T> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if state.ready {
            return Err(item);
        }
        state.pending.push_back(item);
        Ok(())
    }

    /// Defer `item` unconditionally (the consumer is ready but its
    /// rendering surface is not).
    pub fn defer_anyway(&self, item: T) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.pending.push_back(item);
    }

    /// Signal readiness and take everything buffered so far, in arrival
    /// order. Idempotent: a second call returns whatever accumulated since
    /// the first.
    pub fn mark_ready(&self) -> Vec<T> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.ready = true;
        state.pending.drain(..).collect()
    }

    /// Take everything buffered without touching the readiness flag.
    pub fn take_pending(&self) -> Vec<T> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.pending.drain(..).collect()
    }

    /// Number of buffered items.
    pub fn pending_len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending
            .len()
    }

    /// Reset to the not-ready state, dropping anything buffered.
    pub fn reset(&self) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.ready = false;
        state.pending.clear();
    }
}

impl<T> Default for ReadinessBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
