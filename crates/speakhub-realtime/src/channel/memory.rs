//! In-memory course channel for tests and single-process demos.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::sync::broadcast;

use speakhub_core::error::AppError;
use speakhub_core::events::{EventEnvelope, EventPayload};
use speakhub_core::result::AppResult;
use speakhub_core::types::CourseId;

use super::channel::{CourseChannel, Subscription};
use super::types::ChannelAuth;

/// In-memory channel implementation.
///
/// Frames published to a course topic are fanned out to every open
/// subscription for that course, matching the one-callback-per-message
/// contract of the real transport.
#[derive(Debug)]
pub struct MemoryChannel {
    /// Course → broadcast sender
    topics: RwLock<HashMap<CourseId, broadcast::Sender<EventEnvelope>>>,
    /// Buffer size for topics
    buffer_size: usize,
}

impl MemoryChannel {
    /// Create a new in-memory channel.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Publish an already-typed payload to a course topic.
    pub async fn publish(&self, course_id: CourseId, payload: EventPayload) {
        let topics = self.topics.read().await;
        if let Some(tx) = topics.get(&course_id) {
            let _ = tx.send(EventEnvelope::new(payload));
        }
    }

    /// Publish a raw wire frame to a course topic.
    ///
    /// Malformed frames are logged and dropped — subscribers never see
    /// them.
    pub async fn publish_frame(&self, course_id: CourseId, frame: &str) {
        match EventEnvelope::parse(frame) {
            Ok(envelope) => {
                let topics = self.topics.read().await;
                if let Some(tx) = topics.get(&course_id) {
                    let _ = tx.send(envelope);
                }
            }
            Err(e) => {
                tracing::warn!(course_id = %course_id, error = %e, "dropping malformed frame");
            }
        }
    }
}

#[async_trait]
impl CourseChannel for MemoryChannel {
    async fn open(&self, auth: &ChannelAuth) -> AppResult<Subscription> {
        if auth.token.is_empty() {
            return Err(AppError::authentication(
                "course channel requires a bearer token",
            ));
        }
        let mut topics = self.topics.write().await;
        let tx = topics
            .entry(auth.course_id)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        Ok(Subscription::new(auth.course_id, tx.subscribe()))
    }
}
